//! Grid adjacency for block shapes, plus the per-engine cache that keeps it.
//!
//! Adjacency is a pure function of the block shape, so every block of the same
//! size shares one neighbour table. The cache also holds each shape's solved
//! subcycle (see [`crate::subcycle`]), which is just as offset-independent.

use crate::Cell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Footprint of a block in local coordinates.
///
/// A notched shape has its top-left cell (0, 0) removed; it is only used for the
/// corner block of an odd x odd grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
    pub notched: bool,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            notched: false,
        }
    }

    pub fn notched(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            notched: true,
        }
    }

    /// Number of cells actually present
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols - usize::from(self.notched)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols && !(self.notched && cell == Cell::ORIGIN)
    }

    /// First present cell in row-major order; the subgrid search starts here
    pub fn start(&self) -> Cell {
        if self.notched {
            Cell::new(0, 1)
        } else {
            Cell::ORIGIN
        }
    }
}

/// 4-neighbour adjacency of one shape.
///
/// Neighbour lists keep the order in which a row-major sweep discovers them:
/// up, left, right, down. The subgrid search explores in exactly this order.
#[derive(Debug, Clone)]
pub struct Adjacency {
    shape: Shape,
    neighbors: Vec<Vec<usize>>,
}

impl Adjacency {
    pub fn build(shape: Shape) -> Self {
        let cols = shape.cols;
        let mut neighbors = vec![Vec::with_capacity(4); shape.rows * cols];

        for row in 0..shape.rows {
            for col in 0..cols {
                let node = Cell::new(row, col);
                if !shape.contains(node) {
                    continue;
                }
                let idx = node.index(cols);
                if row > 0 {
                    let up = Cell::new(row - 1, col);
                    if shape.contains(up) {
                        let up_idx = up.index(cols);
                        neighbors[idx].push(up_idx);
                        neighbors[up_idx].push(idx);
                    }
                }
                if col > 0 {
                    let left = Cell::new(row, col - 1);
                    if shape.contains(left) {
                        let left_idx = left.index(cols);
                        neighbors[idx].push(left_idx);
                        neighbors[left_idx].push(idx);
                    }
                }
            }
        }

        Self { shape, neighbors }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Neighbour indices of the cell at linear index `idx`
    #[inline]
    pub fn neighbor_indices(&self, idx: usize) -> &[usize] {
        &self.neighbors[idx]
    }

    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.shape.cols;
        self.neighbors[cell.index(cols)]
            .iter()
            .map(move |&idx| Cell::from_index(idx, cols))
    }

    pub fn degree(&self, cell: Cell) -> usize {
        self.neighbors[cell.index(self.shape.cols)].len()
    }
}

/// Shape-keyed cache owned by one engine.
///
/// Nothing here is process-global: two engines never share entries unless the
/// caller hands the same cache to both.
#[derive(Debug, Default)]
pub struct ShapeCache {
    adjacency: HashMap<Shape, Arc<Adjacency>>,
    subcycles: HashMap<Shape, Arc<[Cell]>>,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjacency for `shape`, built on first request
    pub fn adjacency(&mut self, shape: Shape) -> Arc<Adjacency> {
        Arc::clone(
            self.adjacency
                .entry(shape)
                .or_insert_with(|| Arc::new(Adjacency::build(shape))),
        )
    }

    pub(crate) fn subcycle(&self, shape: &Shape) -> Option<Arc<[Cell]>> {
        self.subcycles.get(shape).cloned()
    }

    pub(crate) fn store_subcycle(&mut self, shape: Shape, cycle: Arc<[Cell]>) {
        self.subcycles.insert(shape, cycle);
    }

    /// Number of distinct shapes with a solved subcycle
    pub fn solved_shapes(&self) -> usize {
        self.subcycles.len()
    }

    pub fn clear(&mut self) {
        self.adjacency.clear();
        self.subcycles.clear();
    }
}
