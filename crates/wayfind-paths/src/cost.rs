//! Cost models: terrain symbol to step cost.
//!
//! A cost model never hands out a zero or default cost for a symbol it does
//! not know about. Unmapped symbols are impassable.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors raised when building a cost model from configuration data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostError {
    /// A symbol was mapped to a zero or negative cost.
    #[error("cost for symbol {symbol:?} must be positive, got {cost}")]
    NonPositive { symbol: char, cost: i32 },
}

/// Maps a terrain symbol to the cost of stepping onto it.
pub trait CostModel: Send + Sync {
    /// Cost of entering a cell holding `symbol`, or `None` if impassable.
    fn cost(&self, symbol: char) -> Option<i32>;

    /// Cheapest step cost this model can return, if any symbol is passable.
    fn min_cost(&self) -> Option<i32>;
}

impl<C: CostModel + ?Sized> CostModel for &C {
    fn cost(&self, symbol: char) -> Option<i32> {
        (**self).cost(symbol)
    }

    fn min_cost(&self) -> Option<i32> {
        (**self).min_cost()
    }
}

// ---------------------------------------------------------------------------
// TerrainCosts
// ---------------------------------------------------------------------------

/// Terrain-weighted costs for open-world maps.
///
/// Each passable symbol carries its own positive cost. Symbols absent from
/// the table are impassable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "BTreeMap<char, i32>", into = "BTreeMap<char, i32>")
)]
pub struct TerrainCosts {
    table: BTreeMap<char, i32>,
}

impl TerrainCosts {
    /// Build a cost table, rejecting any non-positive entry.
    pub fn new(table: BTreeMap<char, i32>) -> Result<Self, CostError> {
        if let Some((&symbol, &cost)) = table.iter().find(|&(_, &c)| c <= 0) {
            return Err(CostError::NonPositive { symbol, cost });
        }
        Ok(Self { table })
    }

    /// The underlying symbol table.
    pub fn table(&self) -> &BTreeMap<char, i32> {
        &self.table
    }
}

impl Default for TerrainCosts {
    /// The overworld table: grass 10, sand 20, forest 100, mountain 150,
    /// water 180; the start `S` and goal `L` markers cost 10 and the dungeon
    /// entrances `X`, `Y`, `Z` cost 20.
    fn default() -> Self {
        let table = [
            ('G', 10),
            ('A', 20),
            ('F', 100),
            ('M', 150),
            ('W', 180),
            ('S', 10),
            ('X', 20),
            ('Y', 20),
            ('Z', 20),
            ('L', 10),
        ]
        .into_iter()
        .collect();
        Self { table }
    }
}

impl TryFrom<BTreeMap<char, i32>> for TerrainCosts {
    type Error = CostError;

    fn try_from(table: BTreeMap<char, i32>) -> Result<Self, Self::Error> {
        Self::new(table)
    }
}

impl From<TerrainCosts> for BTreeMap<char, i32> {
    fn from(t: TerrainCosts) -> Self {
        t.table
    }
}

impl CostModel for TerrainCosts {
    fn cost(&self, symbol: char) -> Option<i32> {
        self.table.get(&symbol).copied()
    }

    fn min_cost(&self) -> Option<i32> {
        self.table.values().copied().min()
    }
}

// ---------------------------------------------------------------------------
// WallCosts
// ---------------------------------------------------------------------------

/// Binary passable/wall costs for confined maps such as dungeons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawWallCosts"))]
pub struct WallCosts {
    wall: char,
    step: i32,
}

impl WallCosts {
    /// `wall` is impassable; every other symbol costs `step`.
    pub fn new(wall: char, step: i32) -> Result<Self, CostError> {
        if step <= 0 {
            return Err(CostError::NonPositive { symbol: wall, cost: step });
        }
        Ok(Self { wall, step })
    }

    /// The wall symbol.
    pub fn wall(&self) -> char {
        self.wall
    }

    /// The uniform step cost.
    pub fn step(&self) -> i32 {
        self.step
    }
}

impl Default for WallCosts {
    fn default() -> Self {
        Self { wall: '#', step: 10 }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawWallCosts {
    wall: char,
    step: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawWallCosts> for WallCosts {
    type Error = CostError;

    fn try_from(raw: RawWallCosts) -> Result<Self, Self::Error> {
        Self::new(raw.wall, raw.step)
    }
}

impl CostModel for WallCosts {
    fn cost(&self, symbol: char) -> Option<i32> {
        (symbol != self.wall).then_some(self.step)
    }

    fn min_cost(&self) -> Option<i32> {
        Some(self.step)
    }
}

// ---------------------------------------------------------------------------
// MapCosts
// ---------------------------------------------------------------------------

/// The cost model selected for one map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MapCosts {
    Terrain(TerrainCosts),
    Walled(WallCosts),
}

impl Default for MapCosts {
    fn default() -> Self {
        Self::Terrain(TerrainCosts::default())
    }
}

impl From<TerrainCosts> for MapCosts {
    fn from(t: TerrainCosts) -> Self {
        Self::Terrain(t)
    }
}

impl From<WallCosts> for MapCosts {
    fn from(w: WallCosts) -> Self {
        Self::Walled(w)
    }
}

impl CostModel for MapCosts {
    fn cost(&self, symbol: char) -> Option<i32> {
        match self {
            Self::Terrain(t) => t.cost(symbol),
            Self::Walled(w) => w.cost(symbol),
        }
    }

    fn min_cost(&self) -> Option<i32> {
        match self {
            Self::Terrain(t) => t.min_cost(),
            Self::Walled(w) => w.min_cost(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_default_table() {
        let t = TerrainCosts::default();
        assert_eq!(t.cost('G'), Some(10));
        assert_eq!(t.cost('W'), Some(180));
        assert_eq!(t.cost('X'), Some(20));
        assert_eq!(t.min_cost(), Some(10));
    }

    #[test]
    fn unknown_terrain_is_impassable() {
        let t = TerrainCosts::default();
        assert_eq!(t.cost('?'), None);
        assert_eq!(t.cost('.'), None);
        assert_eq!(t.cost('g'), None);
    }

    #[test]
    fn terrain_rejects_non_positive() {
        let table = [('G', 10), ('Q', 0)].into_iter().collect();
        assert_eq!(
            TerrainCosts::new(table),
            Err(CostError::NonPositive { symbol: 'Q', cost: 0 })
        );
    }

    #[test]
    fn walled_costs() {
        let w = WallCosts::default();
        assert_eq!(w.cost('#'), None);
        assert_eq!(w.cost('.'), Some(10));
        assert_eq!(w.cost('E'), Some(10));
        assert_eq!(w.cost('P'), Some(10));
        assert!(WallCosts::new('#', 0).is_err());
        assert_eq!(WallCosts::new('X', 3).unwrap().cost('#'), Some(3));
    }

    #[test]
    fn map_costs_delegate() {
        let outer = MapCosts::default();
        let inner = MapCosts::from(WallCosts::default());
        assert_eq!(outer.cost('F'), Some(100));
        assert_eq!(outer.cost('#'), None);
        assert_eq!(inner.cost('F'), Some(10));
        assert_eq!(inner.cost('#'), None);
        assert_eq!(inner.min_cost(), Some(10));
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn terrain_from_json_table() {
        let t: TerrainCosts = serde_json::from_str(r#"{"G": 10, "M": 150}"#).unwrap();
        assert_eq!(t.cost('M'), Some(150));
        assert_eq!(t.cost('A'), None);
    }

    #[test]
    fn terrain_json_rejects_zero_cost() {
        let res: Result<TerrainCosts, _> = serde_json::from_str(r#"{"G": 0}"#);
        assert!(res.is_err());
    }

    #[test]
    fn walled_json_rejects_zero_step() {
        let res: Result<WallCosts, _> = serde_json::from_str(r##"{"wall": "#", "step": 0}"##);
        assert!(res.is_err());
    }

    #[test]
    fn map_costs_round_trip() {
        let m = MapCosts::from(WallCosts::default());
        let json = serde_json::to_string(&m).unwrap();
        let back: MapCosts = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
