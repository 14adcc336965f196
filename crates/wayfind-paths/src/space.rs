use std::collections::BinaryHeap;

use wayfind_core::{Coord, Grid, GridError};

/// A found route: the visited cells from start to goal, inclusive, and the
/// summed cost of every step taken.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub cells: Vec<Coord>,
    pub cost: i32,
}

impl Path {
    /// Number of cells, endpoints included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves (cells minus one).
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Coord> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Coord> {
        self.cells.last().copied()
    }

    /// Whether every consecutive pair of cells is one orthogonal step apart.
    pub fn is_contiguous(&self) -> bool {
        self.cells.windows(2).all(|w| w[0].is_adjacent(w[1]))
    }
}

/// Counters from the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped and finalized.
    pub expanded: usize,
    /// Frontier entries pushed, the start node included.
    pub pushed: usize,
    /// Frontier entries discarded because their cell was already finalized.
    pub stale: usize,
}

// ---------------------------------------------------------------------------
// Internal node arena for A* searches
// ---------------------------------------------------------------------------

/// One discovery of a cell. A cell discovered twice gets two nodes, so
/// parent links always form a tree rooted at the start.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchNode {
    pub(crate) pos: Coord,
    pub(crate) parent: Option<usize>,
    pub(crate) g: i32,
    pub(crate) h: i32,
    pub(crate) f: i32,
}

/// Reference into the node arena, ordered by `f` for use in `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) f: i32,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first; equal f
        // pops the earlier-pushed node first.
        other.f.cmp(&self.f).then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// SearchSpace
// ---------------------------------------------------------------------------

/// Reusable workspace for searches over grids of a given size.
///
/// `SearchSpace` owns the node arena, the frontier heap, the visited marks
/// and a neighbour scratch buffer, so that repeated queries incur no
/// allocations after the first use. One `SearchSpace` serves one search at
/// a time; give each worker thread its own.
pub struct SearchSpace {
    pub(crate) rows: i32,
    pub(crate) cols: i32,
    pub(crate) nodes: Vec<SearchNode>,
    pub(crate) open: BinaryHeap<NodeRef>,
    // A cell is visited when its mark equals the current generation.
    pub(crate) visited: Vec<u32>,
    pub(crate) generation: u32,
    pub(crate) nbuf: Vec<Coord>,
    pub(crate) stats: SearchStats,
}

impl SearchSpace {
    /// Create a new `SearchSpace` for a `rows` x `cols` grid.
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.max(0);
        let cols = cols.max(0);
        Self {
            rows,
            cols,
            nodes: Vec::new(),
            open: BinaryHeap::new(),
            visited: vec![0; (rows * cols) as usize],
            generation: 0,
            nbuf: Vec::with_capacity(4),
            stats: SearchStats::default(),
        }
    }

    /// Create a `SearchSpace` sized for `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.rows(), grid.cols())
    }

    /// Change the grid size, reallocating the visited marks only when the
    /// new size exceeds their capacity.
    pub fn resize(&mut self, rows: i32, cols: i32) {
        let rows = rows.max(0);
        let cols = cols.max(0);
        if rows == self.rows && cols == self.cols {
            return;
        }
        self.rows = rows;
        self.cols = cols;
        let new_len = (rows * cols) as usize;

        if new_len <= self.visited.len() {
            // Old marks belong to a different layout; a new generation
            // makes them all stale.
            self.next_generation();
            return;
        }

        self.visited.clear();
        self.visited.resize(new_len, 0);
        self.generation = 0;
    }

    /// Grid size as `(rows, cols)`.
    #[inline]
    pub fn size(&self) -> (i32, i32) {
        (self.rows, self.cols)
    }

    /// Counters from the most recent search.
    #[inline]
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Convert a `Coord` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, c: Coord) -> Option<usize> {
        if c.row < 0 || c.row >= self.rows || c.col < 0 || c.col >= self.cols {
            return None;
        }
        Some((c.row * self.cols + c.col) as usize)
    }

    /// Like [`idx`](Self::idx), but reports a coordinate outside the space.
    pub(crate) fn check(&self, c: Coord) -> Result<usize, GridError> {
        self.idx(c).ok_or(GridError::OutOfBounds {
            coord: c,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Start a new generation, invalidating every visited mark.
    pub(crate) fn next_generation(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.visited.fill(0);
            self.generation = 1;
        }
        self.generation
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn path_round_trip() {
        let p = Path {
            cells: vec![Coord::new(3, 7), Coord::new(3, 8)],
            cost: 42,
        };
        let json = serde_json::to_string(&p).unwrap();
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
