//! **wayfind-core**: core types for grid route planning.
//!
//! This crate provides the foundational types used across the *wayfind*
//! crates: the [`Coord`] cell address and the immutable symbol [`Grid`]
//! that every search runs over.

pub mod geom;
pub mod grid;

pub use geom::Coord;
pub use grid::{Grid, GridError};
