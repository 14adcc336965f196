//! Itinerary optimization across an outer map and per-group inner maps.
//!
//! A [`Planner`] holds an outer map, a start and final destination, and a
//! list of [`WaypointGroup`]s. Every group must be visited once: travel to
//! its entrance on the outer map, walk its inner map from the inner
//! entrance to the destination, and walk back. [`Planner::optimize`] tries
//! every visiting order and keeps the cheapest; ties go to the first order
//! in lexicographic enumeration.
//!
//! The search is exhaustive, O(n! x legs x search) in the group count `n`.
//! It is meant for the handful of groups a single scenario holds.

mod error;
mod group;
mod leg;
mod permutations;
mod planner;

pub use error::RouteError;
pub use group::WaypointGroup;
pub use leg::{LegKind, LegReport, LegSpec, MapRef};
pub use permutations::Permutations;
pub use planner::{Candidate, Itinerary, Optimum, Planner, PlannerConfig};
