//! Hamiltonian cycle construction for rectangular grids.
//!
//! A grid is cut into small blocks, each block gets a closed tour from an
//! exhaustive search, and neighbouring tours are spliced together with 2x2
//! edge swaps until a single cycle covers the grid. The result is exposed as a
//! successor graph: O(1) "where next" lookups for anything that walks the grid,
//! such as a snake that must never trap itself.
//!
//! ```
//! use hamcycle_core::{Cell, CycleConfig, HamiltonianCycle};
//!
//! let cycle = HamiltonianCycle::build(&CycleConfig::new(6, 8).seed(7)).unwrap();
//! assert_eq!(cycle.len(), 48);
//! let next = cycle.successor(Cell::new(2, 3)).unwrap();
//! assert!(next.is_adjacent(Cell::new(2, 3)));
//! ```

pub mod cell;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod merge;
pub mod partition;
pub mod subcycle;
pub mod successor;

pub use cell::{Cell, Edge};
pub use config::{CycleConfig, OddGridPolicy, DEFAULT_MAX_BLOCK_SIZE};
pub use engine::{CycleEngine, HamiltonianCycle};
pub use error::{CycleError, ErrorKind, Result};
pub use grid::{Adjacency, Shape, ShapeCache};
pub use merge::{merge_subcycles, EdgeNetworks, Kernel, MergeStats, Orientation};
#[cfg(feature = "corner-exclusion")]
pub use partition::partition_excluding_corner;
pub use partition::{partition, Block};
pub use subcycle::{solve_block, solve_shape, SEARCH_STEP_LIMIT};
pub use successor::SuccessorGraph;
