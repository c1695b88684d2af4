//! Directed view of the merged cycle.
//!
//! The walk starts at the first present cell in row-major order and heads to the
//! smaller of its two neighbours, so the orientation of a given edge set is
//! always the same.

use crate::error::{CycleError, Result};
use crate::{Cell, Edge};

/// Successor/predecessor lookup over every cell of a Hamiltonian cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessorGraph {
    rows: usize,
    cols: usize,
    next: Vec<Option<Cell>>,
    prev: Vec<Option<Cell>>,
    position: Vec<Option<usize>>,
    order: Vec<Cell>,
}

impl SuccessorGraph {
    /// Orient `edges`, which must form one cycle through every cell of the grid
    /// other than `excluded`.
    pub fn from_edges(
        rows: usize,
        cols: usize,
        edges: &[Edge],
        excluded: Option<Cell>,
    ) -> Result<Self> {
        let expected = rows * cols - usize::from(excluded.is_some());
        let broken = |visited: usize| CycleError::BrokenCycle { visited, expected };

        let mut ends: Vec<Vec<Cell>> = vec![Vec::with_capacity(2); rows * cols];
        for edge in edges {
            for (from, to) in [(edge.a(), edge.b()), (edge.b(), edge.a())] {
                if from.row >= rows || from.col >= cols || Some(from) == excluded {
                    return Err(broken(0));
                }
                let slot = &mut ends[from.index(cols)];
                if slot.len() == 2 {
                    return Err(broken(0));
                }
                slot.push(to);
            }
        }

        let start = if excluded == Some(Cell::ORIGIN) {
            Cell::new(0, 1)
        } else {
            Cell::ORIGIN
        };
        let first = match ends[start.index(cols)].as_slice() {
            [x, y] => (*x).min(*y),
            _ => return Err(broken(0)),
        };

        let mut order = Vec::with_capacity(expected);
        order.push(start);
        let (mut prev, mut current) = (start, first);
        while current != start {
            if order.len() == expected {
                return Err(broken(order.len()));
            }
            order.push(current);
            let step = match ends[current.index(cols)].as_slice() {
                [x, y] if *x == prev => *y,
                [x, y] if *y == prev => *x,
                _ => return Err(broken(order.len())),
            };
            prev = current;
            current = step;
        }
        if order.len() != expected {
            return Err(broken(order.len()));
        }

        Ok(Self::from_order(rows, cols, order))
    }

    /// Index a closed walk given as its cells in visiting order.
    fn from_order(rows: usize, cols: usize, order: Vec<Cell>) -> Self {
        let mut next = vec![None; rows * cols];
        let mut prev = vec![None; rows * cols];
        let mut position = vec![None; rows * cols];
        let len = order.len();
        for (i, &cell) in order.iter().enumerate() {
            let after = order[(i + 1) % len];
            next[cell.index(cols)] = Some(after);
            prev[after.index(cols)] = Some(cell);
            position[cell.index(cols)] = Some(i);
        }
        Self {
            rows,
            cols,
            next,
            prev,
            position,
            order,
        }
    }

    fn slot(&self, cell: Cell) -> Option<usize> {
        (cell.row < self.rows && cell.col < self.cols).then(|| cell.index(self.cols))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell visited right after `cell`; `None` for cells off the cycle
    pub fn successor(&self, cell: Cell) -> Option<Cell> {
        self.next[self.slot(cell)?]
    }

    pub fn predecessor(&self, cell: Cell) -> Option<Cell> {
        self.prev[self.slot(cell)?]
    }

    /// Position of `cell` along the walk, counted from the start cell
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.position[self.slot(cell)?]
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index_of(cell).is_some()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Cells in visiting order
    pub fn order(&self) -> &[Cell] {
        &self.order
    }

    /// One full lap starting at `cell`; empty if `cell` is off the cycle
    pub fn iter_from(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let offset = self.index_of(cell);
        let len = if offset.is_some() { self.len() } else { 0 };
        let offset = offset.unwrap_or(0);
        (0..len).map(move |i| self.order[(offset + i) % len])
    }

    /// `(cell, successor)` pairs in visiting order
    pub fn pairs(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        let len = self.len();
        (0..len).map(move |i| (self.order[i], self.order[(i + 1) % len]))
    }

    /// Sibling cycle that visits (0, 0) in place of (1, 1).
    ///
    /// Only defined for a cycle that skips the origin and threads (1, 1) between
    /// (1, 0) and (0, 1), which is always the case for the corner-excluding
    /// layout. The sibling starts at (0, 0) and keeps the same direction.
    #[cfg(feature = "corner-exclusion")]
    pub fn detour_corner(&self) -> Option<SuccessorGraph> {
        let elbow = Cell::new(1, 1);
        let entry = Cell::new(0, 1);
        if self.contains(Cell::ORIGIN)
            || self.predecessor(elbow) != Some(Cell::new(1, 0))
            || self.successor(elbow) != Some(entry)
        {
            return None;
        }
        let mut order = Vec::with_capacity(self.len());
        order.push(Cell::ORIGIN);
        order.extend(self.iter_from(entry).take(self.len() - 1));
        Some(Self::from_order(self.rows, self.cols, order))
    }
}
