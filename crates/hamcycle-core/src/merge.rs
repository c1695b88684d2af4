//! Merging per-block subcycles into one grid-spanning cycle.
//!
//! Each subcycle's edges start out as one network in a union-find keyed by edge.
//! A kernel is a 2x2 window whose two parallel edges (both vertical or both
//! horizontal) belong to different networks; swapping them for the two
//! perpendicular edges of the window splices the two cycles into one.
//!
//! Every network is exactly one closed cycle, so a swap always joins two
//! cycles and never splits one.
//!
//! Termination: every block is at least 2x2, so its corner cells carry forced
//! edges. Each split of the partition has a kernel between the corner edges of
//! the two leaves that hold the first cells on either side of the split line,
//! and only that kernel can remove those edges. These kernels link the leaves
//! like a spanning tree, so while two networks remain at least one of them is
//! still in the list and mergeable.

use crate::error::{CycleError, Result};
use crate::{Cell, Edge};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Union-find over edges, with edges removable once swapped out.
///
/// Removing an edge only drops its key; its node stays in the forest so the
/// group identity of the remaining edges is untouched.
#[derive(Debug, Default)]
pub struct EdgeNetworks {
    ids: HashMap<Edge, usize>,
    parent: Vec<usize>,
    rank: Vec<u8>,
    groups: usize,
}

impl EdgeNetworks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `edge` as its own network, or return its id if already present
    pub fn insert(&mut self, edge: Edge) -> usize {
        if let Some(&id) = self.ids.get(&edge) {
            return id;
        }
        let id = self.parent.len();
        self.parent.push(id);
        self.rank.push(0);
        self.ids.insert(edge, id);
        self.groups += 1;
        id
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.ids.contains_key(edge)
    }

    /// Drop `edge` from the active set
    pub fn remove(&mut self, edge: &Edge) -> bool {
        self.ids.remove(edge).is_some()
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            let grandparent = self.parent[self.parent[x]];
            self.parent[x] = grandparent;
            x = grandparent;
        }
        x
    }

    /// Join the networks of two node ids; false if already joined
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        self.groups -= 1;
        true
    }

    /// Network id of an active edge
    pub fn group(&mut self, edge: &Edge) -> Option<usize> {
        let id = *self.ids.get(edge)?;
        Some(self.find(id))
    }

    /// Number of distinct networks
    pub fn groups(&self) -> usize {
        self.groups
    }

    /// Number of active edges
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Active edges, sorted
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.ids.keys().copied().collect();
        edges.sort_unstable();
        edges
    }
}

/// 2x2 window with its top-left cell at (row, col)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    pub row: usize,
    pub col: usize,
}

/// Which parallel pair of a kernel joins two networks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Kernel {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn corners(&self) -> [Cell; 4] {
        let (i, j) = (self.row, self.col);
        [
            Cell::new(i, j),
            Cell::new(i, j + 1),
            Cell::new(i + 1, j),
            Cell::new(i + 1, j + 1),
        ]
    }

    /// Left and right sides of the window
    pub fn vertical(&self) -> (Edge, Edge) {
        let [tl, tr, bl, br] = self.corners();
        (Edge::new(tl, bl), Edge::new(tr, br))
    }

    /// Top and bottom sides of the window
    pub fn horizontal(&self) -> (Edge, Edge) {
        let [tl, tr, bl, br] = self.corners();
        (Edge::new(tl, tr), Edge::new(bl, br))
    }

    /// The pair whose edges are both active and in different networks; the
    /// vertical pair is checked first.
    pub fn mergeable(&self, networks: &mut EdgeNetworks) -> Option<Orientation> {
        let split = |networks: &mut EdgeNetworks, (p, q): (Edge, Edge)| {
            match (networks.group(&p), networks.group(&q)) {
                (Some(gp), Some(gq)) => gp != gq,
                _ => false,
            }
        };
        if split(networks, self.vertical()) {
            Some(Orientation::Vertical)
        } else if split(networks, self.horizontal()) {
            Some(Orientation::Horizontal)
        } else {
            None
        }
    }

    /// Replace the mergeable pair with the perpendicular one, joining the networks.
    /// Returns false, leaving `networks` untouched, if the pair is not active.
    fn swap(&self, orientation: Orientation, networks: &mut EdgeNetworks) -> bool {
        let (old, new) = match orientation {
            Orientation::Vertical => (self.vertical(), self.horizontal()),
            Orientation::Horizontal => (self.horizontal(), self.vertical()),
        };
        // Look up ids before anything is removed
        let (Some(&first), Some(&second)) = (networks.ids.get(&old.0), networks.ids.get(&old.1))
        else {
            return false;
        };
        let a = networks.insert(new.0);
        let b = networks.insert(new.1);
        networks.union(a, first);
        networks.union(b, second);
        networks.union(a, b);
        networks.remove(&old.0);
        networks.remove(&old.1);
        true
    }
}

/// Counters describing one merge run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Subcycles fed into the merge
    pub blocks: usize,
    /// Kernels that were mergeable before any swap
    pub kernels: usize,
    /// Swaps actually performed
    pub swaps: usize,
}

/// Splice closed `subcycles` (first cell repeated at the end) on a `rows` x
/// `cols` grid into one cycle, returned as its sorted edge list.
pub fn merge_subcycles<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    subcycles: &[Vec<Cell>],
    shuffle: bool,
    rng: &mut R,
) -> Result<(Vec<Edge>, MergeStats)> {
    let mut networks = EdgeNetworks::new();
    for subcycle in subcycles {
        let ids: Vec<usize> = subcycle
            .windows(2)
            .map(|step| networks.insert(Edge::new(step[0], step[1])))
            .collect();
        for pair in ids.windows(2) {
            networks.union(pair[0], pair[1]);
        }
    }

    let mut kernels = Vec::new();
    for row in 0..rows.saturating_sub(1) {
        for col in 0..cols.saturating_sub(1) {
            let kernel = Kernel::new(row, col);
            if kernel.mergeable(&mut networks).is_some() {
                kernels.push(kernel);
            }
        }
    }
    if shuffle {
        kernels.shuffle(rng);
    }

    let mut stats = MergeStats {
        blocks: subcycles.len(),
        kernels: kernels.len(),
        swaps: 0,
    };
    debug!(
        networks = networks.groups(),
        kernels = stats.kernels,
        "merging subcycles"
    );

    while networks.groups() > 1 {
        let Some(kernel) = kernels.pop() else {
            return Err(CycleError::MergeExhausted {
                groups: networks.groups(),
            });
        };
        if let Some(orientation) = kernel.mergeable(&mut networks) {
            if kernel.swap(orientation, &mut networks) {
                stats.swaps += 1;
                trace!(row = kernel.row, col = kernel.col, ?orientation, "swapped kernel");
            }
        }
    }

    Ok((networks.edges(), stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ShapeCache;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::partition::{partition, Block};
    use crate::subcycle::solve_block;
    use std::collections::HashSet;

    fn square(row: usize, col: usize) -> Vec<Cell> {
        vec![
            Cell::new(row, col),
            Cell::new(row, col + 1),
            Cell::new(row + 1, col + 1),
            Cell::new(row + 1, col),
            Cell::new(row, col),
        ]
    }

    #[test]
    fn test_networks_track_groups() {
        let mut networks = EdgeNetworks::new();
        let a = networks.insert(Edge::new(Cell::new(0, 0), Cell::new(0, 1)));
        let b = networks.insert(Edge::new(Cell::new(0, 1), Cell::new(1, 1)));
        let c = networks.insert(Edge::new(Cell::new(5, 5), Cell::new(5, 6)));
        assert_eq!(networks.groups(), 3);
        assert!(networks.union(a, b));
        assert!(!networks.union(b, a));
        assert_eq!(networks.groups(), 2);
        assert!(networks.union(c, a));
        assert_eq!(networks.groups(), 1);
    }

    #[test]
    fn test_removed_edge_keeps_group_of_others() {
        let mut networks = EdgeNetworks::new();
        let e1 = Edge::new(Cell::new(0, 0), Cell::new(0, 1));
        let e2 = Edge::new(Cell::new(0, 1), Cell::new(1, 1));
        let e3 = Edge::new(Cell::new(1, 1), Cell::new(1, 0));
        let (a, b, c) = (networks.insert(e1), networks.insert(e2), networks.insert(e3));
        networks.union(a, b);
        networks.union(b, c);
        let before = networks.group(&e3);

        assert!(networks.remove(&e2));
        assert!(!networks.contains(&e2));
        assert_eq!(networks.group(&e2), None);
        assert_eq!(networks.group(&e1), networks.group(&e3));
        assert_eq!(networks.group(&e3), before);
        assert_eq!(networks.len(), 2);
    }

    #[test]
    fn test_two_squares_become_the_perimeter() {
        let subcycles = vec![square(0, 0), square(0, 2)];
        let mut rng = StdRng::seed_from_u64(0);
        let (edges, stats) = merge_subcycles(2, 4, &subcycles, false, &mut rng).unwrap();

        assert_eq!(stats, MergeStats { blocks: 2, kernels: 1, swaps: 1 });
        let expected: HashSet<Edge> = square_ring(2, 4);
        assert_eq!(edges.into_iter().collect::<HashSet<_>>(), expected);
    }

    fn square_ring(rows: usize, cols: usize) -> HashSet<Edge> {
        let mut ring = HashSet::new();
        for col in 0..cols - 1 {
            ring.insert(Edge::new(Cell::new(0, col), Cell::new(0, col + 1)));
            ring.insert(Edge::new(Cell::new(rows - 1, col), Cell::new(rows - 1, col + 1)));
        }
        for row in 0..rows - 1 {
            ring.insert(Edge::new(Cell::new(row, 0), Cell::new(row + 1, 0)));
            ring.insert(Edge::new(Cell::new(row, cols - 1), Cell::new(row + 1, cols - 1)));
        }
        ring
    }

    #[test]
    fn test_kernel_orientation() {
        let mut networks = EdgeNetworks::new();
        for subcycle in [square(0, 0), square(2, 0)] {
            let ids: Vec<usize> = subcycle
                .windows(2)
                .map(|s| networks.insert(Edge::new(s[0], s[1])))
                .collect();
            for pair in ids.windows(2) {
                networks.union(pair[0], pair[1]);
            }
        }
        // Squares stacked vertically meet across rows 1 and 2
        assert_eq!(Kernel::new(1, 0).mergeable(&mut networks), Some(Orientation::Horizontal));
        assert_eq!(Kernel::new(0, 0).mergeable(&mut networks), None);
    }

    #[test]
    fn test_swap_without_active_pair_changes_nothing() {
        let mut networks = EdgeNetworks::new();
        networks.insert(Edge::new(Cell::new(0, 0), Cell::new(1, 0)));
        assert!(!Kernel::new(0, 0).swap(Orientation::Vertical, &mut networks));
        assert_eq!(networks.len(), 1);
        assert_eq!(networks.groups(), 1);

        let mut networks = EdgeNetworks::new();
        for subcycle in [square(0, 0), square(0, 2)] {
            let ids: Vec<usize> = subcycle
                .windows(2)
                .map(|s| networks.insert(Edge::new(s[0], s[1])))
                .collect();
            for pair in ids.windows(2) {
                networks.union(pair[0], pair[1]);
            }
        }
        assert!(Kernel::new(0, 1).swap(Orientation::Vertical, &mut networks));
        assert_eq!(networks.groups(), 1);
        assert_eq!(networks.len(), 8);
    }

    #[test]
    fn test_disconnected_subcycles_exhaust_kernels() {
        let subcycles = vec![square(0, 0), square(0, 4)];
        let mut rng = StdRng::seed_from_u64(0);
        let err = merge_subcycles(2, 6, &subcycles, true, &mut rng).unwrap_err();
        assert_eq!(err, CycleError::MergeExhausted { groups: 2 });
    }

    #[test]
    fn test_merged_partition_has_degree_two_everywhere() {
        for (rows, cols, max) in [(6, 4, 8), (8, 8, 6), (10, 7, 12), (5, 6, 4)] {
            let mut cache = ShapeCache::new();
            let blocks: Vec<Block> = partition(rows, cols, max);
            let subcycles: Vec<Vec<Cell>> = blocks
                .iter()
                .map(|b| solve_block(b, &mut cache).unwrap())
                .collect();
            let mut rng = StdRng::seed_from_u64(99);
            let (edges, stats) = merge_subcycles(rows, cols, &subcycles, true, &mut rng).unwrap();

            assert_eq!(edges.len(), rows * cols);
            assert_eq!(stats.swaps, blocks.len() - 1);
            let mut degree: HashMap<Cell, usize> = HashMap::new();
            for edge in &edges {
                *degree.entry(edge.a()).or_default() += 1;
                *degree.entry(edge.b()).or_default() += 1;
            }
            assert_eq!(degree.len(), rows * cols);
            assert!(degree.values().all(|&d| d == 2));
        }
    }
}
