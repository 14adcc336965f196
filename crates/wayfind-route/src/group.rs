use std::sync::Arc;

use wayfind_core::{Coord, Grid};
use wayfind_paths::{MapCosts, WallCosts};

use crate::error::RouteError;

/// One place that must be visited: an entrance on the outer map leading
/// into an inner map, with a destination inside it.
///
/// Visiting a group costs three legs: outer travel to `entrance`, inner
/// travel from `inner_entrance` to `destination`, and inner travel back.
#[derive(Debug, Clone)]
pub struct WaypointGroup {
    pub name: String,
    /// Entrance cell on the outer map.
    pub entrance: Coord,
    pub grid: Arc<Grid>,
    pub costs: MapCosts,
    /// Entrance cell on the inner map.
    pub inner_entrance: Coord,
    pub destination: Coord,
}

impl WaypointGroup {
    /// Create a group whose inner map uses the default wall costs.
    pub fn new(
        name: impl Into<String>,
        entrance: Coord,
        grid: Arc<Grid>,
        inner_entrance: Coord,
        destination: Coord,
    ) -> Self {
        Self {
            name: name.into(),
            entrance,
            grid,
            costs: WallCosts::default().into(),
            inner_entrance,
            destination,
        }
    }

    /// Create a group whose inner entrance and destination are read off
    /// marker symbols on its map (e.g. `E` and `P`).
    pub fn from_markers(
        name: impl Into<String>,
        entrance: Coord,
        grid: Arc<Grid>,
        entrance_marker: char,
        destination_marker: char,
    ) -> Result<Self, RouteError> {
        let name = name.into();
        let find = |symbol: char| {
            grid.find(symbol).ok_or_else(|| RouteError::MissingMarker {
                group: name.clone(),
                symbol,
            })
        };
        let inner_entrance = find(entrance_marker)?;
        let destination = find(destination_marker)?;
        Ok(Self::new(name, entrance, grid, inner_entrance, destination))
    }

    /// Replace the inner map's cost model.
    pub fn with_costs(mut self, costs: impl Into<MapCosts>) -> Self {
        self.costs = costs.into();
        self
    }

    /// Check every coordinate against the map it belongs to.
    pub(crate) fn validate(&self, outer: &Grid) -> Result<(), RouteError> {
        let ctx = |what: &str| format!("{what} of group {:?}", self.name);
        outer
            .check(self.entrance)
            .map_err(|e| RouteError::grid(ctx("outer entrance"), e))?;
        self.grid
            .check(self.inner_entrance)
            .map_err(|e| RouteError::grid(ctx("inner entrance"), e))?;
        self.grid
            .check(self.destination)
            .map_err(|e| RouteError::grid(ctx("destination"), e))?;
        Ok(())
    }
}
