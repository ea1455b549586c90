//! FEN parsing and serialization for xiangqi.
//!
//! The placement field lists the ten rows from Black's back row (row 0) to
//! Red's back row (row 9), nine points each:
//! `rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1`.

use thiserror::Error;

use crate::Color;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 2 or 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w', 'r' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// Parsed FEN data.
///
/// This struct holds the raw parsed FEN components. The engine
/// is responsible for converting this into its board representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Piece placement string, top row first.
    pub piece_placement: String,
    /// Side to move.
    pub active_color: Color,
    /// Halfmove clock (informational only).
    pub halfmove_clock: u32,
    /// Fullmove number.
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str =
        "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

    /// Parses a FEN string.
    ///
    /// Accepts the full six-field form and the short `placement side` form.
    /// The third and fourth fields are placeholders in xiangqi and are ignored.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 2 && parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let piece_placement = parts[0];
        Self::validate_piece_placement(piece_placement)?;

        let active_color = match parts[1] {
            "w" | "r" => Color::Red,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let (halfmove_clock, fullmove_number) = if parts.len() == 6 {
            let halfmove_clock = parts[4]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;
            let fullmove_number = parts[5]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;
            (halfmove_clock, fullmove_number)
        } else {
            (0, 1)
        };

        Ok(FenParser {
            piece_placement: piece_placement.to_string(),
            active_color,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn validate_piece_placement(placement: &str) -> Result<(), FenError> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 10 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 10 rows, got {}",
                rows.len()
            )));
        }

        for (i, row) in rows.iter().enumerate() {
            let mut points = 0;
            for c in row.chars() {
                if let Some(digit) = c.to_digit(10) {
                    points += digit;
                } else if crate::PieceKind::from_fen_char(c).is_some() {
                    points += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in row {}",
                        c, i
                    )));
                }
            }
            if points != 9 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "row {} has {} points, expected 9",
                    i, points
                )));
            }
        }

        Ok(())
    }

    /// Converts the parsed FEN back to a FEN string.
    pub fn to_fen(&self) -> String {
        let side = match self.active_color {
            Color::Red => 'w',
            Color::Black => 'b',
        };
        format!(
            "{} {} - - {} {}",
            self.piece_placement, side, self.halfmove_clock, self.fullmove_number
        )
    }
}

impl Default for FenParser {
    fn default() -> Self {
        FenParser {
            piece_placement: "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR"
                .to_string(),
            active_color: Color::Red,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}
