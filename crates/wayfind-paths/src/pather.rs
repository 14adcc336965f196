use wayfind_core::{Coord, Grid};

use crate::cost::CostModel;
use crate::distance::manhattan;
use crate::traits::{AstarPather, Pather, WeightedPather};

/// Adapts a [`Grid`] and a [`CostModel`] to the pather traits.
///
/// Neighbours are the in-bounds, passable orthogonal cells in the order
/// up, down, left, right. Stepping onto a cell costs whatever the cost
/// model charges for its symbol. The estimate is Manhattan distance, which
/// stays admissible because every cost model rejects costs below 1.
#[derive(Debug, Clone, Copy)]
pub struct GridPather<'a, C: CostModel> {
    grid: &'a Grid,
    costs: &'a C,
}

impl<'a, C: CostModel> GridPather<'a, C> {
    pub fn new(grid: &'a Grid, costs: &'a C) -> Self {
        Self { grid, costs }
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Step cost onto `c`, or `None` if out of bounds or impassable.
    #[inline]
    pub fn step_cost(&self, c: Coord) -> Option<i32> {
        self.grid.at(c).and_then(|s| self.costs.cost(s))
    }
}

impl<C: CostModel> Pather for GridPather<'_, C> {
    fn neighbors(&self, c: Coord, buf: &mut Vec<Coord>) {
        for n in c.neighbors_4() {
            if self.step_cost(n).is_some() {
                buf.push(n);
            }
        }
    }
}

impl<C: CostModel> WeightedPather for GridPather<'_, C> {
    fn cost(&self, _from: Coord, to: Coord) -> Option<i32> {
        self.step_cost(to)
    }
}

impl<C: CostModel> AstarPather for GridPather<'_, C> {
    fn estimate(&self, from: Coord, to: Coord) -> i32 {
        manhattan(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{TerrainCosts, WallCosts};

    #[test]
    fn neighbors_skip_walls_and_edges() {
        let grid = Grid::parse("...\n#.#\n...").unwrap();
        let costs = WallCosts::default();
        let p = GridPather::new(&grid, &costs);
        let mut buf = Vec::new();
        p.neighbors(Coord::new(0, 0), &mut buf);
        // Up and left are off-grid, down is a wall.
        assert_eq!(buf, vec![Coord::new(0, 1)]);

        buf.clear();
        p.neighbors(Coord::new(1, 1), &mut buf);
        assert_eq!(buf, vec![Coord::new(0, 1), Coord::new(2, 1)]);
    }

    #[test]
    fn neighbor_order_is_fixed() {
        let grid = Grid::parse("GGG\nGGG\nGGG").unwrap();
        let costs = TerrainCosts::default();
        let p = GridPather::new(&grid, &costs);
        let mut buf = Vec::new();
        p.neighbors(Coord::new(1, 1), &mut buf);
        assert_eq!(buf, Coord::new(1, 1).neighbors_4().to_vec());
    }

    #[test]
    fn cost_is_destination_symbol() {
        let grid = Grid::parse("GM\nWA").unwrap();
        let costs = TerrainCosts::default();
        let p = GridPather::new(&grid, &costs);
        assert_eq!(p.cost(Coord::new(0, 0), Coord::new(0, 1)), Some(150));
        assert_eq!(p.cost(Coord::new(0, 1), Coord::new(0, 0)), Some(10));
        assert_eq!(p.cost(Coord::new(0, 0), Coord::new(1, 0)), Some(180));
        assert_eq!(p.estimate(Coord::new(0, 0), Coord::new(1, 1)), 2);
    }

    #[test]
    fn unmapped_terrain_is_not_a_neighbor() {
        let grid = Grid::parse("G?G").unwrap();
        let costs = TerrainCosts::default();
        let p = GridPather::new(&grid, &costs);
        let mut buf = Vec::new();
        p.neighbors(Coord::new(0, 0), &mut buf);
        assert!(buf.is_empty());
        assert_eq!(p.step_cost(Coord::new(0, 1)), None);
        assert_eq!(p.cost(Coord::new(0, 0), Coord::new(0, 1)), None);
        assert_eq!(p.cost(Coord::new(0, 0), Coord::new(5, 5)), None);
    }
}
