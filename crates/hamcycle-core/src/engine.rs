//! Cycle construction: partition, solve each block, merge, orient.

use crate::config::CycleConfig;
use crate::error::Result;
use crate::grid::ShapeCache;
use crate::merge::{merge_subcycles, MergeStats};
use crate::partition::{partition, Block};
use crate::subcycle::solve_block;
use crate::successor::SuccessorGraph;
use crate::{Cell, Edge};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Builds Hamiltonian cycles, reusing solved block shapes across builds.
#[derive(Debug, Default)]
pub struct CycleEngine {
    cache: ShapeCache,
}

impl CycleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing cache, e.g. one shared by several engines in turn
    pub fn with_cache(cache: ShapeCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ShapeCache {
        &self.cache
    }

    pub fn into_cache(self) -> ShapeCache {
        self.cache
    }

    /// Build a cycle, shuffling kernels with the configured seed or fresh entropy
    pub fn build(&mut self, config: &CycleConfig) -> Result<HamiltonianCycle> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.build_with_rng(config, &mut rng)
    }

    /// Build a cycle drawing the kernel shuffle from `rng`
    pub fn build_with_rng<R: Rng + ?Sized>(
        &mut self,
        config: &CycleConfig,
        rng: &mut R,
    ) -> Result<HamiltonianCycle> {
        config.validate()?;
        let (rows, cols) = (config.rows, config.cols);
        let excluded = config.excludes_corner().then_some(Cell::ORIGIN);

        let blocks = layout(config);
        debug!(rows, cols, blocks = blocks.len(), "subdivided grid");

        let mut subcycles = Vec::with_capacity(blocks.len());
        for (i, block) in blocks.iter().enumerate() {
            debug!(
                block = i + 1,
                of = blocks.len(),
                rows = block.rows(),
                cols = block.cols(),
                "solving block"
            );
            subcycles.push(solve_block(block, &mut self.cache)?);
        }

        let (edges, stats) = merge_subcycles(rows, cols, &subcycles, config.shuffle, rng)?;

        debug!(edges = edges.len(), "building successor graph");
        let graph = SuccessorGraph::from_edges(rows, cols, &edges, excluded)?;
        let detour = corner_detour(&graph, excluded.is_some())?;

        info!(
            rows,
            cols,
            cells = graph.len(),
            blocks = stats.blocks,
            swaps = stats.swaps,
            "hamiltonian cycle complete"
        );

        Ok(HamiltonianCycle {
            config: config.clone(),
            blocks,
            subcycles,
            edges,
            graph,
            detour,
            excluded,
            stats,
        })
    }
}

#[cfg(feature = "corner-exclusion")]
fn layout(config: &CycleConfig) -> Vec<Block> {
    if config.excludes_corner() {
        crate::partition::partition_excluding_corner(config.rows, config.cols, config.max_block_size)
    } else {
        partition(config.rows, config.cols, config.max_block_size)
    }
}

#[cfg(not(feature = "corner-exclusion"))]
fn layout(config: &CycleConfig) -> Vec<Block> {
    partition(config.rows, config.cols, config.max_block_size)
}

#[cfg(feature = "corner-exclusion")]
fn corner_detour(graph: &SuccessorGraph, excluded: bool) -> Result<Option<SuccessorGraph>> {
    if !excluded {
        return Ok(None);
    }
    match graph.detour_corner() {
        Some(detour) => Ok(Some(detour)),
        None => Err(crate::error::CycleError::CornerDetourMissing {
            rows: graph.rows(),
            cols: graph.cols(),
        }),
    }
}

#[cfg(not(feature = "corner-exclusion"))]
fn corner_detour(_graph: &SuccessorGraph, _excluded: bool) -> Result<Option<SuccessorGraph>> {
    Ok(None)
}

/// A finished cycle together with the intermediate results that produced it
#[derive(Debug, Clone)]
pub struct HamiltonianCycle {
    config: CycleConfig,
    blocks: Vec<Block>,
    subcycles: Vec<Vec<Cell>>,
    edges: Vec<Edge>,
    graph: SuccessorGraph,
    detour: Option<SuccessorGraph>,
    excluded: Option<Cell>,
    stats: MergeStats,
}

impl HamiltonianCycle {
    /// One-shot build with a throwaway cache
    pub fn build(config: &CycleConfig) -> Result<Self> {
        CycleEngine::new().build(config)
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn cols(&self) -> usize {
        self.config.cols
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Closed per-block tours in grid coordinates, in block order
    pub fn subcycles(&self) -> &[Vec<Cell>] {
        &self.subcycles
    }

    /// Sorted edges of the merged cycle
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn graph(&self) -> &SuccessorGraph {
        &self.graph
    }

    pub fn successor(&self, cell: Cell) -> Option<Cell> {
        self.graph.successor(cell)
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// The cell left out of the cycle, if any
    pub fn excluded(&self) -> Option<Cell> {
        self.excluded
    }

    /// Sibling cycle through the excluded corner, present only when a corner is excluded
    pub fn corner_detour(&self) -> Option<&SuccessorGraph> {
        self.detour.as_ref()
    }

    pub fn stats(&self) -> MergeStats {
        self.stats
    }
}
