//! An immutable grid of terrain symbols.
//!
//! A [`Grid`] stores one `char` per cell in row-major order. It is built
//! once, validated once, and never mutated afterwards, so it can be shared
//! freely between searches and worker threads.

use std::fmt;

use thiserror::Error;

use crate::geom::Coord;

/// Errors raised when building a grid or addressing a cell in it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid has no rows, or its rows have no columns.
    #[error("grid is empty")]
    Empty,
    /// A row's width differs from the first row's.
    #[error("grid row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A coordinate lies outside the grid.
    #[error("coordinate {coord} is outside a {rows}x{cols} grid")]
    OutOfBounds { coord: Coord, rows: i32, cols: i32 },
}

/// A 2D grid of terrain symbols.
///
/// Invariants: at least one row and one column, every row the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<String>", into = "Vec<String>"))]
pub struct Grid {
    cells: Vec<char>,
    rows: i32,
    cols: i32,
}

impl Grid {
    /// Build a grid from explicit rows.
    pub fn from_rows(rows: Vec<Vec<char>>) -> Result<Self, GridError> {
        let Some(first) = rows.first() else {
            return Err(GridError::Empty);
        };
        let width = first.len();
        if width == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: i,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self {
            cells,
            rows: rows.len() as i32,
            cols: width as i32,
        })
    }

    /// Parse a grid from text.
    ///
    /// Each line is trimmed and all inner spaces are removed, so both
    /// `"G G A"` and `"GGA"` describe the same row. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let rows = text
            .lines()
            .map(|line| line.trim().chars().filter(|&c| c != ' ').collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        Self::from_rows(rows)
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the grid contains the given coordinate.
    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.row >= 0 && c.row < self.rows && c.col >= 0 && c.col < self.cols
    }

    /// Fail with [`GridError::OutOfBounds`] unless `c` is inside the grid.
    pub fn check(&self, c: Coord) -> Result<(), GridError> {
        if self.contains(c) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                coord: c,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Flat row-major index of `c`, or `None` if out of bounds.
    #[inline]
    pub fn index(&self, c: Coord) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        Some((c.row * self.cols + c.col) as usize)
    }

    /// The coordinate at a flat row-major index.
    #[inline]
    pub fn coord(&self, idx: usize) -> Coord {
        let cols = self.cols as usize;
        Coord::new((idx / cols) as i32, (idx % cols) as i32)
    }

    /// The symbol at `c`, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, c: Coord) -> Option<char> {
        self.index(c).map(|i| self.cells[i])
    }

    /// First cell (row-major) holding `symbol`.
    pub fn find(&self, symbol: char) -> Option<Coord> {
        self.cells
            .iter()
            .position(|&s| s == symbol)
            .map(|i| self.coord(i))
    }

    /// Iterate over `(Coord, symbol)` pairs in row-major order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Coord, char)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &s)| (self.coord(i), s))
    }

    /// The symbols of one row.
    pub fn row(&self, row: i32) -> Option<&[char]> {
        if row < 0 || row >= self.rows {
            return None;
        }
        let start = (row * self.cols) as usize;
        Some(&self.cells[start..start + self.cols as usize])
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.cols as usize).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for &s in row {
                write!(f, "{s}")?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = GridError;

    fn try_from(lines: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_rows(lines.iter().map(|l| l.chars().collect()).collect())
    }
}

impl From<Grid> for Vec<String> {
    fn from(g: Grid) -> Self {
        g.cells
            .chunks(g.cols as usize)
            .map(|row| row.iter().collect())
            .collect()
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_as_lines() {
        let g = Grid::parse("#.\n.#").unwrap();
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, r##"["#.",".#"]"##);
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn ragged_lines_fail_to_deserialize() {
        let res: Result<Grid, _> = serde_json::from_str(r#"["...", ".."]"#);
        assert!(res.is_err());
    }
}
