//! Player color representation.

use std::ops::RangeInclusive;

/// The two sides in xiangqi. Red sits at the bottom (rows 5-9) and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Black = 1,
}

impl Color {
    /// Both colors, Red first.
    pub const ALL: [Color; 2] = [Color::Red, Color::Black];

    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// Returns the index (0 for Red, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row delta of a forward step for this color (-1 for Red, +1 for Black).
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Red => -1,
            Color::Black => 1,
        }
    }

    /// Score sign from Red's point of view (+1 for Red, -1 for Black).
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Color::Red => 1,
            Color::Black => -1,
        }
    }

    /// Returns the back row for this color (9 for Red, 0 for Black).
    #[inline]
    pub const fn back_row(self) -> i8 {
        match self {
            Color::Red => 9,
            Color::Black => 0,
        }
    }

    /// Rows of this color's own half of the board.
    #[inline]
    pub const fn home_rows(self) -> RangeInclusive<i8> {
        match self {
            Color::Red => 5..=9,
            Color::Black => 0..=4,
        }
    }

    /// Rows of this color's palace.
    #[inline]
    pub const fn palace_rows(self) -> RangeInclusive<i8> {
        match self {
            Color::Red => 7..=9,
            Color::Black => 0..=2,
        }
    }

    /// Returns true if `row` lies beyond the river from this color's side.
    #[inline]
    pub const fn has_crossed_river(self, row: i8) -> bool {
        match self {
            Color::Red => row <= 4,
            Color::Black => row >= 5,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}
