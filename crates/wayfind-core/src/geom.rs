//! Geometry primitive: [`Coord`].
//!
//! Coordinates are 0-based `(row, col)` pairs internally. Public waypoint
//! coordinates are 1-based, and [`Coord::from_one_based`] /
//! [`Coord::to_one_based`] are the only places the two meet.

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// A grid cell address. Rows grow down, columns grow right.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    /// Create a new 0-based coordinate.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Convert a 1-based `(row, col)` pair into a 0-based coordinate.
    ///
    /// No bounds check happens here; a zero component produces a negative
    /// coordinate that [`Grid::check`](crate::Grid::check) rejects.
    #[inline]
    pub const fn from_one_based(row: i32, col: i32) -> Self {
        Self {
            row: row - 1,
            col: col - 1,
        }
    }

    /// The 1-based `(row, col)` pair for this coordinate.
    #[inline]
    pub const fn to_one_based(self) -> (i32, i32) {
        (self.row + 1, self.col + 1)
    }

    /// Return a coordinate shifted by (drow, dcol).
    #[inline]
    pub const fn shift(self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// The four orthogonal neighbours, in the fixed order up, down, left,
    /// right. Search tie-breaking depends on this order.
    #[inline]
    pub const fn neighbors_4(self) -> [Coord; 4] {
        [
            self.shift(-1, 0),
            self.shift(1, 0),
            self.shift(0, -1),
            self.shift(0, 1),
        ]
    }

    /// Whether `other` is exactly one orthogonal step away.
    #[inline]
    pub fn is_adjacent(self, other: Coord) -> bool {
        (self.row - other.row).abs() + (self.col - other.col).abs() == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl Add for Coord {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Coord {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.col - rhs.col)
    }
}
