//! Move representation.

use crate::{Color, Piece, PieceKind, Position};
use std::fmt;

/// A xiangqi move.
///
/// Carries the moving piece as it stood before the move and the piece it
/// captures, if any, so a move can be applied and displayed without looking
/// at the board again.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

impl Move {
    /// Creates a new move.
    #[inline]
    pub const fn new(from: Position, to: Position, piece: Piece, captured: Option<Piece>) -> Self {
        Move {
            from,
            to,
            piece,
            captured,
        }
    }

    /// Returns true if the move captures a piece.
    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns true if both moves go between the same two points.
    #[inline]
    pub fn same_squares(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to
    }

    /// Returns the coordinate key of this move (`"fr,fc,tr,tc"`).
    pub fn coordinate_key(&self) -> String {
        format!(
            "{},{},{},{}",
            self.from.row, self.from.col, self.to.row, self.to.col
        )
    }

    /// Parses a coordinate key into its `(from, to)` points.
    ///
    /// Only the coordinates can be recovered from text; the caller matches them
    /// against a legal move list to obtain a full [`Move`].
    pub fn parse_coordinates(s: &str) -> Option<(Position, Position)> {
        let mut parts = s.split(',').map(|p| p.trim().parse::<i8>());
        let mut next = || parts.next()?.ok();
        let from = Position::checked(next()?, next()?)?;
        let to = Position::checked(next()?, next()?)?;
        if parts.next().is_some() {
            return None;
        }
        Some((from, to))
    }

    /// A placeholder move used to fill fixed-size buffers; never legal.
    pub const NULL: Move = Move {
        from: Position::new(0, 0),
        to: Position::new(0, 0),
        piece: Piece::new(PieceKind::General, Color::Red, Position::new(0, 0)),
        captured: None,
    };
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) -> ({})",
            self.piece.kind.chinese_char(self.piece.color),
            self.from,
            self.to
        )?;
        if let Some(captured) = self.captured {
            write!(f, " x{}", captured.chinese_char())?;
        }
        Ok(())
    }
}
