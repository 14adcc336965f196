//! Shortest-cost search over symbol grids.
//!
//! This crate provides the search engine used by the route planner:
//!
//! - **Cost models** mapping a terrain symbol to a step cost or impassable
//!   ([`TerrainCosts`], [`WallCosts`], unified by [`MapCosts`])
//! - **A\*** shortest-path search ([`SearchSpace::astar_path`], [`search`])
//!
//! Searches run through [`SearchSpace`], which owns and reuses its node
//! arena, frontier and visited marks so that repeated queries incur no
//! allocations after warm-up.
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | neighbour enumeration |
//! | [`WeightedPather`] : [`Pather`] | positive edge costs |
//! | [`AstarPather`] : [`WeightedPather`] | admissible estimate |
//!
//! [`GridPather`] implements all three for a [`Grid`](wayfind_core::Grid)
//! and a [`CostModel`].

mod astar;
mod cost;
mod distance;
mod pather;
mod space;
mod traits;

pub use astar::search;
pub use cost::{CostError, CostModel, MapCosts, TerrainCosts, WallCosts};
pub use distance::manhattan;
pub use pather::GridPather;
pub use space::{Path, SearchSpace, SearchStats};
pub use traits::{AstarPather, Pather, WeightedPather};
