//! WXF move notation.
//!
//! A WXF move has four characters: piece letter, source file, action and
//! target. Files are numbered 1–9 from each player's own right-hand side.
//! The action is `+` (forward), `-` (backward) or `.` (sideways). The target
//! is the number of steps for a vertical move of an orthogonal mover, and
//! the destination file otherwise.
//!
//! Examples: `C2.5`, `H2+3`, `R1+1`. When two pieces of one kind share a
//! file, the file is replaced by a front/rear marker before the letter:
//! `+R.5`, `-C+2`.

use std::cmp::Reverse;

use thiserror::Error;
use xiangqi_core::{Color, Move, Piece, PieceKind, Position};

use crate::movegen::legal_moves;
use crate::Board;

/// Error type for WXF parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty WXF string")]
    Empty,

    #[error("invalid WXF format: {0}")]
    InvalidFormat(String),

    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),

    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// The file number (1–9) of `col` from `color`'s point of view.
pub const fn file_number(color: Color, col: i8) -> i8 {
    match color {
        Color::Red => 9 - col,
        Color::Black => col + 1,
    }
}

/// Converts a move to WXF notation.
///
/// The board must be the state BEFORE the move is made.
pub fn move_to_wxf(board: &Board, m: &Move) -> String {
    let piece = m.piece;
    let mut wxf = String::with_capacity(4);

    wxf.push_str(&designator(board, piece));

    let forward = piece.color.forward();
    let d_row = m.to.row - m.from.row;
    let action = if d_row == 0 {
        '.'
    } else if d_row * forward > 0 {
        '+'
    } else {
        '-'
    };
    wxf.push(action);

    let target = if piece.kind.moves_orthogonally() && d_row != 0 {
        d_row.abs()
    } else {
        file_number(piece.color, m.to.col)
    };
    wxf.push_str(&target.to_string());

    wxf
}

/// Piece letter plus source file, or a tandem marker plus letter.
fn designator(board: &Board, piece: Piece) -> String {
    let letter = piece.kind.wxf_char();
    if matches!(piece.kind, PieceKind::Advisor | PieceKind::Elephant) {
        return format!("{}{}", letter, file_number(piece.color, piece.position.col));
    }

    // Same kind and color on this file, frontmost first.
    let mut tandem: Vec<Position> = board
        .pieces_of(piece.color)
        .filter(|p| p.kind == piece.kind && p.position.col == piece.position.col)
        .map(|p| p.position)
        .collect();
    tandem.sort_by_key(|p| Reverse(p.row * piece.color.forward()));

    let rank = tandem.iter().position(|p| *p == piece.position).unwrap_or(0);
    match tandem.len() {
        0 | 1 => format!("{}{}", letter, file_number(piece.color, piece.position.col)),
        2 => {
            let marker = if rank == 0 { '+' } else { '-' };
            format!("{}{}", marker, letter)
        }
        _ => format!("{}{}", rank + 1, letter),
    }
}

/// Parses a WXF string against the legal moves on `board`.
///
/// Letters are matched case-insensitively.
pub fn wxf_to_move(board: &Board, wxf: &str) -> Result<Move, NotationError> {
    let wxf = wxf.trim();
    if wxf.is_empty() {
        return Err(NotationError::Empty);
    }
    if wxf.chars().count() != 4 {
        return Err(NotationError::InvalidFormat(wxf.to_string()));
    }
    let wanted = wxf.to_ascii_uppercase();

    let mut matches = legal_moves(board)
        .iter()
        .filter(|m| move_to_wxf(board, m) == wanted)
        .copied()
        .collect::<Vec<_>>();

    match matches.len() {
        0 => Err(NotationError::NoMatchingMove(wxf.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(NotationError::AmbiguousMove(wxf.to_string())),
    }
}
