//! Recursive bisection of the grid into blocks small enough for exhaustive search.
//!
//! Every leaf has an even cell count and is at least 2x2. A block is kept whole
//! once it fits `max_block_size`, or once its longer side is under
//! [`MIN_SPLIT_SIDE`]: 2x2, 2x3 and 3x2 blocks cannot be halved without producing
//! a one-wide strip, which has no closed tour.

use crate::grid::Shape;
use crate::Cell;
use serde::{Deserialize, Serialize};

/// Shortest side that can still be split into two halves of at least two
pub const MIN_SPLIT_SIDE: usize = 4;

/// Rectangular region of the grid with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
    /// Whether the block's top-left cell is left out (odd x odd corner block)
    #[serde(default)]
    pub notched: bool,
}

impl Block {
    pub fn new(row_start: usize, col_start: usize, row_end: usize, col_end: usize) -> Self {
        debug_assert!(row_start <= row_end && col_start <= col_end);
        Self {
            row_start,
            col_start,
            row_end,
            col_end,
            notched: false,
        }
    }

    /// The 3x3 block at the grid origin with (0, 0) cut away
    pub fn notched_corner() -> Self {
        Self {
            notched: true,
            ..Self::new(0, 0, 2, 2)
        }
    }

    pub fn rows(&self) -> usize {
        self.row_end - self.row_start + 1
    }

    pub fn cols(&self) -> usize {
        self.col_end - self.col_start + 1
    }

    pub fn origin(&self) -> Cell {
        Cell::new(self.row_start, self.col_start)
    }

    pub fn shape(&self) -> Shape {
        if self.notched {
            Shape::notched(self.rows(), self.cols())
        } else {
            Shape::new(self.rows(), self.cols())
        }
    }

    pub fn cell_count(&self) -> usize {
        self.shape().cell_count()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= self.row_start
            && cell.row <= self.row_end
            && cell.col >= self.col_start
            && cell.col <= self.col_end
            && !(self.notched && cell == self.origin())
    }

    /// Present cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.row_start..=self.row_end)
            .flat_map(move |row| (self.col_start..=self.col_end).map(move |col| Cell::new(row, col)))
            .filter(move |&cell| self.contains(cell))
    }
}

/// Split a `rows` x `cols` grid (not both odd, both at least 2) into blocks.
///
/// An empty grid has no blocks. Other shapes outside the precondition are
/// rejected by [`CycleConfig::validate`](crate::CycleConfig::validate) before
/// the engine gets here.
pub fn partition(rows: usize, cols: usize, max_block_size: usize) -> Vec<Block> {
    let mut blocks = Vec::new();
    if rows == 0 || cols == 0 {
        return blocks;
    }
    bisect(Block::new(0, 0, rows - 1, cols - 1), max_block_size, &mut blocks);
    blocks
}

/// Split an odd x odd grid (both sides at least 3) into blocks that cover every
/// cell except (0, 0).
///
/// The notched 3x3 corner and the strip to its right form the top band; the band
/// and everything below it are the two halves of the outermost split.
#[cfg(feature = "corner-exclusion")]
pub fn partition_excluding_corner(rows: usize, cols: usize, max_block_size: usize) -> Vec<Block> {
    debug_assert!(rows % 2 == 1 && cols % 2 == 1 && rows >= 3 && cols >= 3);
    let mut blocks = vec![Block::notched_corner()];
    if cols > 3 {
        bisect(Block::new(0, 3, 2, cols - 1), max_block_size, &mut blocks);
    }
    if rows > 3 {
        bisect(Block::new(3, 0, rows - 1, cols - 1), max_block_size, &mut blocks);
    }
    blocks
}

fn bisect(block: Block, max_block_size: usize, out: &mut Vec<Block>) {
    let rows = block.rows();
    let cols = block.cols();
    debug_assert!(rows >= 2 && cols >= 2 && (rows * cols) % 2 == 0);

    if rows * cols <= max_block_size || rows.max(cols) < MIN_SPLIT_SIDE {
        out.push(block);
        return;
    }

    if rows > cols {
        let cut = block.row_start + split_length(rows, cols) - 1;
        bisect(
            Block::new(block.row_start, block.col_start, cut, block.col_end),
            max_block_size,
            out,
        );
        bisect(
            Block::new(cut + 1, block.col_start, block.row_end, block.col_end),
            max_block_size,
            out,
        );
    } else {
        let cut = block.col_start + split_length(cols, rows) - 1;
        bisect(
            Block::new(block.row_start, block.col_start, block.row_end, cut),
            max_block_size,
            out,
        );
        bisect(
            Block::new(block.row_start, cut + 1, block.row_end, block.col_end),
            max_block_size,
            out,
        );
    }
}

/// Length of the first half when splitting a side of `len` cells.
///
/// With an odd perpendicular side both halves need an even length; `len` is then
/// even itself, so nudging an odd midpoint down by one fixes both halves.
fn split_length(len: usize, across: usize) -> usize {
    let half = len / 2;
    if across % 2 == 1 && half % 2 == 1 {
        half - 1
    } else {
        half
    }
}
