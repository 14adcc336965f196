use std::fmt;

use wayfind_core::Coord;
use wayfind_paths::Path;

/// Which map a leg is searched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapRef {
    Outer,
    Group(usize),
}

/// The role a leg plays in an itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegKind {
    /// Outer-map travel to a group's entrance.
    Approach { group: usize },
    /// Inner-map travel from the entrance to the destination.
    Delve { group: usize },
    /// Inner-map travel from the destination back to the entrance.
    Return { group: usize },
    /// Outer-map travel to the final destination.
    Finish,
}

/// One point-to-point search the planner has to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegSpec {
    pub kind: LegKind,
    pub map: MapRef,
    pub from: Coord,
    pub to: Coord,
}

impl fmt::Display for LegSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fr, fc) = self.from.to_one_based();
        let (tr, tc) = self.to.to_one_based();
        match self.kind {
            LegKind::Approach { group } => write!(f, "approach to group {group}")?,
            LegKind::Delve { group } => write!(f, "delve into group {group}")?,
            LegKind::Return { group } => write!(f, "return from group {group}")?,
            LegKind::Finish => write!(f, "finish")?,
        }
        write!(f, " ({fr}, {fc}) -> ({tr}, {tc})")
    }
}

/// A leg of the winning itinerary with its path, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegReport {
    pub leg: LegSpec,
    pub path: Path,
    /// Running total including this leg.
    pub total: i32,
}
