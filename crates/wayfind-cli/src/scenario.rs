//! JSON scenario files.
//!
//! A scenario names the outer map, the start and destination on it, and
//! one entry per dungeon. Coordinates are 1-based `[row, col]` pairs. Map
//! paths are resolved against the directory holding the scenario file.
//!
//! ```json
//! {
//!   "map": "overworld.txt",
//!   "start": [11, 8],
//!   "destination": [2, 2],
//!   "dungeons": [
//!     { "name": "crypt", "entrance": [7, 2], "map": "crypt.txt" },
//!     { "name": "tower", "entrance": [2, 14], "map": "tower.txt",
//!       "inner_entrance": [8, 2], "destination": [2, 9] }
//!   ]
//! }
//! ```
//!
//! A dungeon that leaves out `inner_entrance` or `destination` has them read
//! off the `E` and `P` markers of its map.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use wayfind_core::{Coord, Grid, GridError};
use wayfind_paths::{CostError, TerrainCosts, WallCosts};
use wayfind_route::{Planner, PlannerConfig, RouteError, WaypointGroup};

/// Marker for a dungeon's inner entrance when the scenario omits it.
pub const ENTRANCE_MARKER: char = 'E';
/// Marker for a dungeon's destination when the scenario omits it.
pub const DESTINATION_MARKER: char = 'P';

#[derive(Debug, Error)]
pub enum CliError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parsing {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("map {}: {source}", path.display())]
    Grid { path: PathBuf, source: GridError },

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Cost(#[from] CostError),

    #[error("no path from {from} to {to}")]
    NoPath { from: OneBased, to: OneBased },
}

// ---------------------------------------------------------------------------
// OneBased
// ---------------------------------------------------------------------------

/// A user-facing 1-based `(row, col)` pair.
///
/// Deserializes from a JSON `[row, col]` array and parses from `"row,col"`
/// on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OneBased(pub i32, pub i32);

impl From<OneBased> for Coord {
    fn from(c: OneBased) -> Self {
        Coord::from_one_based(c.0, c.1)
    }
}

impl From<Coord> for OneBased {
    fn from(c: Coord) -> Self {
        let (row, col) = c.to_one_based();
        Self(row, col)
    }
}

impl fmt::Display for OneBased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coordinate {input:?}: expected ROW,COL")]
pub struct CoordParseError {
    input: String,
}

impl FromStr for OneBased {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CoordParseError { input: s.to_string() };
        let (row, col) = s.split_once(',').ok_or_else(err)?;
        let row = row.trim().parse().map_err(|_| err())?;
        let col = col.trim().parse().map_err(|_| err())?;
        Ok(Self(row, col))
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub map: PathBuf,
    pub start: OneBased,
    pub destination: OneBased,
    /// Outer map terrain table. Defaults to the overworld table.
    #[serde(default)]
    pub terrain: TerrainCosts,
    /// Cost model shared by every dungeon map.
    #[serde(default)]
    pub dungeon_costs: WallCosts,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
    pub dungeons: Vec<DungeonSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DungeonSpec {
    pub name: String,
    pub entrance: OneBased,
    pub map: PathBuf,
    #[serde(default)]
    pub inner_entrance: Option<OneBased>,
    #[serde(default)]
    pub destination: Option<OneBased>,
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Planner settings named by the scenario.
    pub fn config(&self) -> PlannerConfig {
        PlannerConfig {
            parallel: self.parallel,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }

    /// Load every map through `load` and build a planner.
    ///
    /// `load` receives map paths as written in the scenario; a map shared by
    /// several dungeons is loaded once.
    pub fn into_planner<F>(self, mut load: F) -> Result<Planner, CliError>
    where
        F: FnMut(&Path) -> Result<Grid, CliError>,
    {
        let config = self.config();
        let mut cache: HashMap<PathBuf, Arc<Grid>> = HashMap::new();
        let mut fetch = |path: &Path| -> Result<Arc<Grid>, CliError> {
            if let Some(grid) = cache.get(path) {
                return Ok(Arc::clone(grid));
            }
            let grid = Arc::new(load(path)?);
            cache.insert(path.to_path_buf(), Arc::clone(&grid));
            Ok(grid)
        };

        let outer = fetch(&self.map)?;
        let mut groups = Vec::with_capacity(self.dungeons.len());
        for d in self.dungeons {
            let grid = fetch(&d.map)?;
            let inner_entrance = locate(&d.name, &grid, d.inner_entrance, ENTRANCE_MARKER)?;
            let destination = locate(&d.name, &grid, d.destination, DESTINATION_MARKER)?;
            groups.push(
                WaypointGroup::new(d.name, d.entrance.into(), grid, inner_entrance, destination)
                    .with_costs(self.dungeon_costs),
            );
        }

        let planner = Planner::new(
            outer,
            self.terrain,
            self.start.into(),
            self.destination.into(),
            groups,
        )?;
        Ok(planner.with_config(config))
    }
}

fn locate(group: &str, grid: &Grid, given: Option<OneBased>, marker: char) -> Result<Coord, RouteError> {
    match given {
        Some(c) => Ok(c.into()),
        None => grid.find(marker).ok_or_else(|| RouteError::MissingMarker {
            group: group.to_string(),
            symbol: marker,
        }),
    }
}

/// Read a text map from disk.
pub fn load_grid(path: &Path) -> Result<Grid, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Grid::parse(&text).map_err(|source| CliError::Grid {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a scenario file and its maps, resolving map paths against the
/// scenario's directory.
pub fn load_planner(path: &Path) -> Result<Planner, CliError> {
    let scenario = Scenario::load(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    scenario.into_planner(|map| load_grid(&base.join(map)))
}
