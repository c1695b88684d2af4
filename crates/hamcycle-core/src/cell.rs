use serde::{Deserialize, Serialize};

/// A grid cell addressed by (row, col)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { row: 0, col: 0 };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Shift this cell by a block origin
    pub fn offset(self, row: usize, col: usize) -> Self {
        Self::new(self.row + row, self.col + col)
    }

    /// True if the two cells share a side
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// Linear index in a grid with `cols` columns
    #[inline]
    pub fn index(self, cols: usize) -> usize {
        self.row * cols + self.col
    }

    /// Inverse of [`Cell::index`]
    #[inline]
    pub fn from_index(idx: usize, cols: usize) -> Self {
        Self::new(idx / cols, idx % cols)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Undirected edge between two side-adjacent cells.
///
/// Endpoints are stored sorted, so `Edge::new(a, b) == Edge::new(b, a)` and the
/// edge can key hash maps directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    a: Cell,
    b: Cell,
}

impl Edge {
    pub fn new(a: Cell, b: Cell) -> Self {
        debug_assert!(a.is_adjacent(b), "edge endpoints {a} and {b} are not adjacent");
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// The smaller endpoint
    pub fn a(&self) -> Cell {
        self.a
    }

    /// The larger endpoint
    pub fn b(&self) -> Cell {
        self.b
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.a == cell || self.b == cell
    }

    /// Endpoint opposite `cell`, if `cell` is on this edge
    pub fn other(&self, cell: Cell) -> Option<Cell> {
        if cell == self.a {
            Some(self.b)
        } else if cell == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.a.col == self.b.col
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}
