//! Board coordinates.

use std::fmt;

/// Number of rows on the board.
pub const ROWS: i8 = 10;
/// Number of columns (files) on the board.
pub const COLS: i8 = 9;
/// Number of intersections on the board.
pub const SQUARES: usize = 90;

/// A point on the 10×9 board.
///
/// Row 0 is Black's back row (top), row 9 is Red's back row (bottom).
/// Columns run 0-8 from left to right as seen by Red.
///
/// Values outside the board can be constructed (they are useful as the
/// intermediate result of an offset); [`Position::is_valid`] tells them apart.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    /// Creates a position without bounds checking.
    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// Creates a position, returning `None` when it lies off the board.
    #[inline]
    pub const fn checked(row: i8, col: i8) -> Option<Self> {
        let pos = Position { row, col };
        if pos.is_valid() {
            Some(pos)
        } else {
            None
        }
    }

    /// Returns true if both coordinates are on the board.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.row >= 0 && self.row < ROWS && self.col >= 0 && self.col < COLS
    }

    /// Creates a position from a square index (0-89).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < SQUARES {
            Some(Position {
                row: (index / COLS as usize) as i8,
                col: (index % COLS as usize) as i8,
            })
        } else {
            None
        }
    }

    /// Returns the square index (`row * 9 + col`).
    ///
    /// Only meaningful for valid positions.
    #[inline]
    pub const fn index(self) -> usize {
        debug_assert!(self.is_valid());
        self.row as usize * COLS as usize + self.col as usize
    }

    /// Returns the position shifted by the given deltas, if it stays on the board.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        Self::checked(self.row + d_row, self.col + d_col)
    }

    /// Returns true if the position is inside the palace of `color`.
    #[inline]
    pub fn in_palace(self, color: crate::Color) -> bool {
        (3..=5).contains(&self.col) && color.palace_rows().contains(&self.row)
    }

    /// Returns true if the position is on the center files (columns 3-5).
    #[inline]
    pub const fn on_center_file(self) -> bool {
        self.col >= 3 && self.col <= 5
    }

    /// Mirrors the row (row `r` becomes `9 - r`).
    #[inline]
    pub const fn flip_row(self) -> Self {
        Position {
            row: ROWS - 1 - self.row,
            col: self.col,
        }
    }

    /// Parses the `"row,col"` coordinate form.
    pub fn parse(s: &str) -> Option<Self> {
        let (row, col) = s.split_once(',')?;
        let row = row.trim().parse::<i8>().ok()?;
        let col = col.trim().parse::<i8>().ok()?;
        Self::checked(row, col)
    }

    /// Iterates over every position on the board in index order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SQUARES).filter_map(Position::from_index)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({},{})", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}
