//! Exhaustive search for one Hamiltonian cycle inside a single block.
//!
//! The search is a depth-first walk from the block's first cell that explores
//! neighbours in adjacency order and keeps the first closed tour it meets. The
//! visited array and path are mutated in place and undone on backtrack.
//!
//! Two prunes cut the walk short: a neighbour of the cell just left that can no
//! longer be entered and exited, and an unvisited remainder that is split off
//! from the head or from the start. Both only discard branches without a
//! solution, so the tour found is the same one an unpruned walk would find.

use crate::error::{CycleError, Result};
use crate::grid::{Adjacency, Shape, ShapeCache};
use crate::partition::Block;
use crate::Cell;
use std::sync::Arc;
use tracing::trace;

/// Node expansions allowed per shape before the search gives up
pub const SEARCH_STEP_LIMIT: u64 = 50_000_000;

/// Closed tour of `block` in grid coordinates. The first cell is repeated at the end.
pub fn solve_block(block: &Block, cache: &mut ShapeCache) -> Result<Vec<Cell>> {
    let local = solve_shape(block.shape(), cache)?;
    Ok(local
        .iter()
        .map(|cell| cell.offset(block.row_start, block.col_start))
        .collect())
}

/// Closed tour of `shape` in local coordinates, memoized in `cache`.
pub fn solve_shape(shape: Shape, cache: &mut ShapeCache) -> Result<Arc<[Cell]>> {
    solve_shape_within(shape, cache, SEARCH_STEP_LIMIT)
}

pub(crate) fn solve_shape_within(
    shape: Shape,
    cache: &mut ShapeCache,
    budget: u64,
) -> Result<Arc<[Cell]>> {
    if let Some(cycle) = cache.subcycle(&shape) {
        return Ok(cycle);
    }

    let adjacency = cache.adjacency(shape);
    let search = CycleSearch::new(&adjacency, budget);
    let order = search.run()?;

    let cols = shape.cols;
    let mut cycle: Vec<Cell> = order.iter().map(|&idx| Cell::from_index(idx, cols)).collect();
    cycle.push(shape.start());
    trace!(rows = shape.rows, cols = shape.cols, "solved block shape");

    let cycle: Arc<[Cell]> = cycle.into();
    cache.store_subcycle(shape, Arc::clone(&cycle));
    Ok(cycle)
}

struct CycleSearch<'a> {
    adjacency: &'a Adjacency,
    visited: Vec<bool>,
    path: Vec<usize>,
    start: usize,
    target: usize,
    steps: u64,
    budget: u64,
    // Flood-fill scratch, reset by bumping the epoch
    mark: Vec<u32>,
    epoch: u32,
    stack: Vec<usize>,
}

impl<'a> CycleSearch<'a> {
    fn new(adjacency: &'a Adjacency, budget: u64) -> Self {
        let shape = adjacency.shape();
        let slots = shape.rows * shape.cols;
        let target = shape.cell_count();
        Self {
            adjacency,
            visited: vec![false; slots],
            path: Vec::with_capacity(target),
            start: shape.start().index(shape.cols),
            target,
            steps: 0,
            budget,
            mark: vec![0; slots],
            epoch: 0,
            stack: Vec::with_capacity(slots),
        }
    }

    fn run(mut self) -> Result<Vec<usize>> {
        let shape = self.adjacency.shape();
        self.visited[self.start] = true;
        self.path.push(self.start);

        if self.extend(self.start)? {
            Ok(self.path)
        } else {
            Err(CycleError::SearchExhausted {
                rows: shape.rows,
                cols: shape.cols,
            })
        }
    }

    /// Try to complete the tour from `head`; depth never exceeds the cell count.
    fn extend(&mut self, head: usize) -> Result<bool> {
        let adjacency = self.adjacency;
        if self.path.len() == self.target {
            return Ok(adjacency.neighbor_indices(head).contains(&self.start));
        }

        self.steps += 1;
        if self.steps > self.budget {
            let shape = adjacency.shape();
            return Err(CycleError::SearchBudgetExceeded {
                rows: shape.rows,
                cols: shape.cols,
                budget: self.budget,
            });
        }

        for &next in adjacency.neighbor_indices(head) {
            if self.visited[next] {
                continue;
            }
            self.visited[next] = true;
            self.path.push(next);

            let dead = self.strands_neighbor(head, next) || self.splits_remainder(next);
            if !dead && self.extend(next)? {
                return Ok(true);
            }

            self.path.pop();
            self.visited[next] = false;
        }

        Ok(false)
    }

    /// True if leaving `prev` for `next` leaves a neighbour of `prev` unable to
    /// be threaded: an unvisited cell needs two usable sides, the start needs one.
    fn strands_neighbor(&self, prev: usize, next: usize) -> bool {
        let adjacency = self.adjacency;
        let usable = |side: usize| !self.visited[side] || side == next;

        adjacency.neighbor_indices(prev).iter().any(|&cell| {
            if cell == self.start {
                return !adjacency.neighbor_indices(cell).iter().any(|&side| usable(side));
            }
            if self.visited[cell] {
                return false;
            }
            let open = adjacency
                .neighbor_indices(cell)
                .iter()
                .filter(|&&side| usable(side) || side == self.start)
                .count();
            open < 2
        })
    }

    /// True if some unvisited cell can no longer be reached from `head`, or the
    /// reachable part no longer touches the start.
    fn splits_remainder(&mut self, head: usize) -> bool {
        let adjacency = self.adjacency;
        self.epoch += 1;
        let epoch = self.epoch;

        self.stack.clear();
        self.stack.push(head);
        self.mark[head] = epoch;
        let mut reached = 0;
        let mut touches_start = false;

        while let Some(cell) = self.stack.pop() {
            for &side in adjacency.neighbor_indices(cell) {
                if side == self.start {
                    touches_start = true;
                    continue;
                }
                if self.visited[side] || self.mark[side] == epoch {
                    continue;
                }
                self.mark[side] = epoch;
                reached += 1;
                self.stack.push(side);
            }
        }

        reached != self.target - self.path.len() || !touches_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_closed_tour(cycle: &[Cell], block: &Block) {
        assert_eq!(cycle.len(), block.cell_count() + 1);
        assert_eq!(cycle.first(), cycle.last());
        let distinct: HashSet<Cell> = cycle[..cycle.len() - 1].iter().copied().collect();
        assert_eq!(distinct.len(), block.cell_count(), "tour revisits a cell");
        for cell in &distinct {
            assert!(block.contains(*cell), "{cell} outside {:?}", block);
        }
        for pair in cycle.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{} -> {} is not a step", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_two_by_two() {
        let mut cache = ShapeCache::new();
        let cycle = solve_shape(Shape::new(2, 2), &mut cache).unwrap();
        assert_eq!(
            &cycle[..],
            &[
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 1),
                Cell::new(1, 0),
                Cell::new(0, 0),
            ]
        );
    }

    #[test]
    fn test_even_blocks_have_tours() {
        let mut cache = ShapeCache::new();
        for rows in 2..=6 {
            for cols in 2..=6 {
                if (rows * cols) % 2 == 1 {
                    continue;
                }
                let block = Block::new(0, 0, rows - 1, cols - 1);
                let cycle = solve_block(&block, &mut cache).unwrap();
                assert_closed_tour(&cycle, &block);
            }
        }
    }

    #[test]
    fn test_offset_into_grid() {
        let mut cache = ShapeCache::new();
        let block = Block::new(4, 6, 7, 8);
        let cycle = solve_block(&block, &mut cache).unwrap();
        assert_eq!(cycle[0], Cell::new(4, 6));
        assert_closed_tour(&cycle, &block);
    }

    #[test]
    fn test_odd_block_is_exhausted() {
        let mut cache = ShapeCache::new();
        let err = solve_shape(Shape::new(3, 3), &mut cache).unwrap_err();
        assert_eq!(err, CycleError::SearchExhausted { rows: 3, cols: 3 });
    }

    #[test]
    fn test_search_gives_up_at_budget() {
        let mut cache = ShapeCache::new();
        let err = solve_shape_within(Shape::new(6, 6), &mut cache, 1).unwrap_err();
        assert_eq!(
            err,
            CycleError::SearchBudgetExceeded {
                rows: 6,
                cols: 6,
                budget: 1
            }
        );
        assert_eq!(err.kind(), crate::error::ErrorKind::Internal);
        assert_eq!(cache.solved_shapes(), 0, "failed search must not be cached");

        solve_shape_within(Shape::new(6, 6), &mut cache, SEARCH_STEP_LIMIT).unwrap();
        assert_eq!(cache.solved_shapes(), 1);
    }

    #[test]
    fn test_result_is_memoized_by_shape() {
        let mut cache = ShapeCache::new();
        let first = solve_shape(Shape::new(4, 4), &mut cache).unwrap();
        let second = solve_shape(Shape::new(4, 4), &mut cache).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.solved_shapes(), 1);
    }

    #[test]
    fn test_same_shape_same_tour() {
        let first = solve_shape(Shape::new(4, 5), &mut ShapeCache::new()).unwrap();
        let second = solve_shape(Shape::new(4, 5), &mut ShapeCache::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_notched_corner_keeps_elbow() {
        let mut cache = ShapeCache::new();
        let block = Block::notched_corner();
        let cycle = solve_block(&block, &mut cache).unwrap();
        assert_closed_tour(&cycle, &block);
        assert_eq!(cycle[0], Cell::new(0, 1));

        // (0, 1) and (1, 0) have only two sides each, so (1, 1) sits between them
        let pos = cycle[..8].iter().position(|&c| c == Cell::new(1, 1)).unwrap();
        let before = if pos == 0 { cycle[7] } else { cycle[pos - 1] };
        let after = cycle[pos + 1];
        let ends: HashSet<Cell> = [before, after].into_iter().collect();
        assert_eq!(ends, [Cell::new(0, 1), Cell::new(1, 0)].into_iter().collect());
    }
}
