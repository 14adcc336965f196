use wayfind_core::Coord;

/// A graph over grid cells, seen through its neighbour relation.
pub trait Pather {
    /// Push every cell reachable in one move from `c` onto `buf`, in a fixed
    /// order. `buf` arrives empty.
    fn neighbors(&self, c: Coord, buf: &mut Vec<Coord>);
}

/// Moves carry a cost.
pub trait WeightedPather: Pather {
    /// Price of the move `from` -> `to`, at least 1, or `None` if the move
    /// is not allowed. Searches only ask about cells yielded by
    /// [`Pather::neighbors`] for `from`.
    fn cost(&self, from: Coord, to: Coord) -> Option<i32>;
}

/// Adds the lower bound A* steers by.
pub trait AstarPather: WeightedPather {
    /// Lower bound on the cheapest route from `from` to `to`. Overestimating
    /// breaks optimality.
    fn estimate(&self, from: Coord, to: Coord) -> i32;
}
