use log::trace;
use wayfind_core::{Coord, Grid, GridError};

use crate::cost::CostModel;
use crate::pather::GridPather;
use crate::space::{NodeRef, Path, SearchNode, SearchSpace, SearchStats};
use crate::traits::AstarPather;

impl SearchSpace {
    /// Compute the cheapest path from `from` to `to` using A*.
    ///
    /// Returns the full path (including both endpoints) and its cost, or
    /// `Ok(None)` if no path exists. An endpoint outside the space is
    /// [`GridError::OutOfBounds`].
    ///
    /// A route whose cost would overflow `i32` is treated as blocked.
    ///
    /// Every discovery pushes a fresh frontier entry; an entry whose cell
    /// has already been finalized is skipped when popped. The first pop of
    /// a cell therefore carries its minimum cost.
    pub fn astar_path<P: AstarPather>(
        &mut self,
        pather: &P,
        from: Coord,
        to: Coord,
    ) -> Result<Option<Path>, GridError> {
        self.check(from)?;
        self.check(to)?;

        self.stats = SearchStats::default();
        if from == to {
            return Ok(Some(Path {
                cells: vec![from],
                cost: 0,
            }));
        }

        let cur_gen = self.next_generation();
        self.nodes.clear();
        self.open.clear();

        let h = pather.estimate(from, to);
        self.nodes.push(SearchNode {
            pos: from,
            parent: None,
            g: 0,
            h,
            f: h,
        });
        self.open.push(NodeRef { idx: 0, f: h });
        self.stats.pushed = 1;

        let mut nbuf = std::mem::take(&mut self.nbuf);

        let found = 'search: loop {
            let Some(current) = self.open.pop() else {
                break 'search None;
            };

            let node = self.nodes[current.idx];
            debug_assert_eq!(node.f, node.g + node.h);
            let Some(ci) = self.idx(node.pos) else {
                continue;
            };

            // Skip stale entries.
            if self.visited[ci] == cur_gen {
                self.stats.stale += 1;
                continue;
            }
            self.visited[ci] = cur_gen;
            self.stats.expanded += 1;

            if node.pos == to {
                break 'search Some(current.idx);
            }

            nbuf.clear();
            pather.neighbors(node.pos, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if self.visited[ni] == cur_gen {
                    continue;
                }
                let Some(g) = pather.cost(node.pos, np).and_then(|c| node.g.checked_add(c)) else {
                    continue;
                };
                let h = pather.estimate(np, to);
                let Some(f) = g.checked_add(h) else {
                    continue;
                };
                let idx = self.nodes.len();
                self.nodes.push(SearchNode {
                    pos: np,
                    parent: Some(current.idx),
                    g,
                    h,
                    f,
                });
                self.open.push(NodeRef { idx, f });
                self.stats.pushed += 1;
            }
        };

        self.nbuf = nbuf;
        self.open.clear();

        trace!(
            "astar {} -> {}: expanded={} pushed={} stale={} found={}",
            from,
            to,
            self.stats.expanded,
            self.stats.pushed,
            self.stats.stale,
            found.is_some()
        );

        let Some(goal) = found else {
            return Ok(None);
        };

        // Reconstruct path.
        let cost = self.nodes[goal].g;
        let mut cells = Vec::new();
        let mut cursor = Some(goal);
        while let Some(i) = cursor {
            let n = &self.nodes[i];
            cells.push(n.pos);
            cursor = n.parent;
        }
        cells.reverse();
        Ok(Some(Path { cells, cost }))
    }

    /// Validate `start` and `goal` against `grid`, then search it under
    /// `costs`.
    ///
    /// `Ok(None)` means the goal is unreachable, which is a normal outcome.
    /// `Err` is reserved for coordinates outside the grid.
    pub fn search<C: CostModel>(
        &mut self,
        grid: &Grid,
        costs: &C,
        start: Coord,
        goal: Coord,
    ) -> Result<Option<Path>, GridError> {
        grid.check(start)?;
        grid.check(goal)?;
        self.resize(grid.rows(), grid.cols());
        self.astar_path(&GridPather::new(grid, costs), start, goal)
    }
}

/// One-shot search of `grid` under `costs` using a fresh [`SearchSpace`].
///
/// Callers running many searches should keep a [`SearchSpace`] around and
/// use [`SearchSpace::search`] instead.
pub fn search<C: CostModel>(
    grid: &Grid,
    costs: &C,
    start: Coord,
    goal: Coord,
) -> Result<Option<Path>, GridError> {
    SearchSpace::for_grid(grid).search(grid, costs, start, goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{MapCosts, TerrainCosts, WallCosts};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BinaryHeap;

    fn one(row: i32, col: i32) -> Coord {
        Coord::from_one_based(row, col)
    }

    /// Sum of step costs along `path`, the start cell excluded.
    fn walk_cost<C: CostModel>(grid: &Grid, costs: &C, path: &Path) -> i32 {
        path.cells[1..]
            .iter()
            .map(|&c| costs.cost(grid.at(c).unwrap()).unwrap())
            .sum()
    }

    /// Plain Dijkstra over every cell, used as the optimality reference.
    fn reference_cost<C: CostModel>(grid: &Grid, costs: &C, from: Coord, to: Coord) -> Option<i32> {
        let mut dist = vec![i32::MAX; grid.len()];
        let mut heap = BinaryHeap::new();
        dist[grid.index(from).unwrap()] = 0;
        heap.push(std::cmp::Reverse((0, from)));
        while let Some(std::cmp::Reverse((d, c))) = heap.pop() {
            if c == to {
                return Some(d);
            }
            if d > dist[grid.index(c).unwrap()] {
                continue;
            }
            for n in c.neighbors_4() {
                let Some(step) = grid.at(n).and_then(|s| costs.cost(s)) else {
                    continue;
                };
                let ni = grid.index(n).unwrap();
                if d + step < dist[ni] {
                    dist[ni] = d + step;
                    heap.push(std::cmp::Reverse((d + step, n)));
                }
            }
        }
        None
    }

    fn random_terrain(rng: &mut StdRng, rows: usize, cols: usize) -> Grid {
        const SYMBOLS: [char; 7] = ['G', 'G', 'A', 'F', 'M', 'W', '?'];
        let rows: Vec<Vec<char>> = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| SYMBOLS[rng.random_range(0..SYMBOLS.len())])
                    .collect::<Vec<char>>()
            })
            .collect();
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn detour_around_walls() {
        let grid = Grid::parse("...\n#.#\n...").unwrap();
        let path = search(&grid, &WallCosts::default(), one(1, 1), one(3, 3))
            .unwrap()
            .unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.cost, 40);
        assert_eq!(
            path.cells,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(1, 1),
                Coord::new(2, 1),
                Coord::new(2, 2),
            ]
        );
    }

    #[test]
    fn start_equals_goal() {
        let grid = Grid::parse("G").unwrap();
        let path = search(&grid, &TerrainCosts::default(), one(1, 1), one(1, 1))
            .unwrap()
            .unwrap();
        assert_eq!(path.cells, vec![Coord::new(0, 0)]);
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let grid = Grid::parse(
            "\
.....
..#..
.#.#.
..#..
.....",
        )
        .unwrap();
        let costs = WallCosts::default();
        for start in [Coord::new(0, 0), Coord::new(4, 4), Coord::new(2, 0)] {
            let res = search(&grid, &costs, start, Coord::new(2, 2)).unwrap();
            assert_eq!(res, None);
        }
    }

    #[test]
    fn unmapped_terrain_blocks() {
        // The only gap in the river is an unknown symbol, not a free cell.
        let grid = Grid::parse("GGG\n???\nGGG").unwrap();
        let res = search(&grid, &TerrainCosts::default(), Coord::new(0, 0), Coord::new(2, 2));
        assert_eq!(res, Ok(None));
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let grid = Grid::parse("..\n..").unwrap();
        let costs = WallCosts::default();
        assert!(matches!(
            search(&grid, &costs, Coord::new(0, 0), one(3, 1)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(search(&grid, &costs, one(0, 1), Coord::new(0, 0)).is_err());
    }

    #[test]
    fn space_reports_endpoints_outside_it() {
        let grid = Grid::parse("..\n..").unwrap();
        let costs = WallCosts::default();
        let mut space = SearchSpace::for_grid(&grid);
        let res = space.astar_path(&GridPather::new(&grid, &costs), Coord::new(0, 0), Coord::new(2, 0));
        assert_eq!(
            res,
            Err(GridError::OutOfBounds {
                coord: Coord::new(2, 0),
                rows: 2,
                cols: 2,
            })
        );
    }

    #[test]
    fn overflowing_route_is_blocked() {
        let table = [('G', 1_500_000_000)].into_iter().collect();
        let costs = TerrainCosts::new(table).unwrap();

        let short = Grid::parse("GG").unwrap();
        let path = search(&short, &costs, Coord::new(0, 0), Coord::new(0, 1))
            .unwrap()
            .unwrap();
        assert_eq!(path.cost, 1_500_000_000);

        // A second step would exceed i32::MAX.
        let long = Grid::parse("GGG").unwrap();
        assert_eq!(search(&long, &costs, Coord::new(0, 0), Coord::new(0, 2)), Ok(None));
    }

    #[test]
    fn prefers_cheap_terrain_over_short_route() {
        // Straight across the mountain costs 150; around it costs 4 * 10.
        let grid = Grid::parse("GGG\nGMG\nGGG").unwrap();
        let costs = TerrainCosts::default();
        let path = search(&grid, &costs, Coord::new(1, 0), Coord::new(1, 2))
            .unwrap()
            .unwrap();
        assert_eq!(path.cost, 40);
        assert!(!path.cells.contains(&Coord::new(1, 1)));
        assert_eq!(walk_cost(&grid, &costs, &path), path.cost);
    }

    #[test]
    fn detours_below_expensive_row() {
        let grid = Grid::parse("GFFG\nGGGG").unwrap();
        let costs = TerrainCosts::default();
        let mut space = SearchSpace::for_grid(&grid);
        let path = space
            .search(&grid, &costs, Coord::new(0, 0), Coord::new(0, 3))
            .unwrap()
            .unwrap();
        assert_eq!(path.cost, 50);
        assert_eq!(walk_cost(&grid, &costs, &path), 50);
        assert!(path.is_contiguous());
    }

    #[test]
    fn stats_record_stale_entries() {
        let grid = Grid::parse("GGG\nGGG\nGGG").unwrap();
        let mut space = SearchSpace::for_grid(&grid);
        space
            .search(&grid, &TerrainCosts::default(), Coord::new(0, 0), Coord::new(2, 2))
            .unwrap()
            .unwrap();
        let stats = space.last_stats();
        assert!(stats.expanded >= 5);
        assert!(stats.pushed >= stats.expanded + stats.stale);
        assert!(stats.pushed > stats.expanded);
    }

    #[test]
    fn space_is_reusable_across_grids() {
        let small = Grid::parse("...\n#.#\n...").unwrap();
        let large = Grid::parse("GGGGG\nGMMMG\nGGGGG").unwrap();
        let mut space = SearchSpace::new(1, 1);

        let a = space
            .search(&small, &WallCosts::default(), Coord::new(0, 0), Coord::new(2, 2))
            .unwrap()
            .unwrap();
        let b = space
            .search(&large, &TerrainCosts::default(), Coord::new(1, 0), Coord::new(1, 4))
            .unwrap()
            .unwrap();
        let c = space
            .search(&small, &WallCosts::default(), Coord::new(0, 0), Coord::new(2, 2))
            .unwrap()
            .unwrap();
        assert_eq!(a, c);
        assert_eq!(b.cost, 60);
    }

    #[test]
    fn repeated_searches_are_deterministic() {
        let grid = Grid::parse("GGGG\nGGGG\nGGGG\nGGGG").unwrap();
        let costs = MapCosts::default();
        let first = search(&grid, &costs, Coord::new(0, 0), Coord::new(3, 3)).unwrap();
        let mut space = SearchSpace::for_grid(&grid);
        for _ in 0..10 {
            let again = space
                .search(&grid, &costs, Coord::new(0, 0), Coord::new(3, 3))
                .unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn matches_reference_on_random_terrain() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let costs = TerrainCosts::default();
        let mut space = SearchSpace::new(1, 1);
        for _ in 0..200 {
            let rows: usize = rng.random_range(1..12);
            let cols: usize = rng.random_range(1..12);
            let grid = random_terrain(&mut rng, rows, cols);
            let from = Coord::new(rng.random_range(0..rows as i32), rng.random_range(0..cols as i32));
            let to = Coord::new(rng.random_range(0..rows as i32), rng.random_range(0..cols as i32));

            let got = space.search(&grid, &costs, from, to).unwrap();
            let want = reference_cost(&grid, &costs, from, to);
            match got {
                Some(path) => {
                    assert_eq!(Some(path.cost), want, "grid:\n{grid}\n{from} -> {to}");
                    assert_eq!(path.start(), Some(from));
                    assert_eq!(path.goal(), Some(to));
                    assert!(path.is_contiguous());
                    assert_eq!(walk_cost(&grid, &costs, &path), path.cost);
                }
                None => assert_eq!(want, None, "grid:\n{grid}\n{from} -> {to}"),
            }
        }
    }
}
