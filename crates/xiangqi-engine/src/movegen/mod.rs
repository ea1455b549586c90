//! Move generation and legality.
//!
//! Moves are generated pseudo-legally per piece (see [`pieces`]) and then
//! filtered by simulating each move and rejecting those that leave the
//! mover's own general in check.

pub mod perft;
mod pieces;

use crate::Board;
use xiangqi_core::{Color, Move, Piece, Position};

pub use pieces::{PieceGenerator, GENERATORS};

/// A list of moves with a fixed maximum capacity.
///
/// One side never has more than about 120 pseudo-legal moves, so a
/// fixed-size array avoids heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Capacity of the list.
    pub const MAX_MOVES: usize = 160;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Returns a mutable slice of the moves, e.g. for ordering.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    /// Iterates over the moves.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }

    /// Finds the move going between `from` and `to`, if present.
    pub fn find(&self, from: Position, to: Position) -> Option<Move> {
        self.iter().find(|m| m.from == from && m.to == to).copied()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Appends the pseudo-legal moves of a single piece.
#[inline]
pub fn generate_piece_moves(board: &Board, piece: Piece, moves: &mut MoveList) {
    GENERATORS[piece.kind.index()](board, piece, moves);
}

/// Appends the pseudo-legal moves of every piece of `color`.
pub fn pseudo_moves(board: &Board, color: Color, moves: &mut MoveList) {
    for piece in board.pieces_of(color) {
        generate_piece_moves(board, piece, moves);
    }
}

/// Generates all legal moves for the side to move.
pub fn legal_moves(board: &Board) -> MoveList {
    let us = board.side_to_move();
    let mut moves = MoveList::new();
    pseudo_moves(board, us, &mut moves);

    // Filter out moves that leave our general in check
    moves.retain(|m| !is_in_check(&board.apply_move(m), us));
    moves
}

/// Generates the legal captures for the side to move.
pub fn legal_captures(board: &Board) -> MoveList {
    let mut moves = legal_moves(board);
    moves.retain(Move::is_capture);
    moves
}

/// Returns true if the side to move has at least one legal move.
///
/// Stops at the first legal move found.
pub fn has_legal_moves(board: &Board) -> bool {
    let us = board.side_to_move();
    let mut moves = MoveList::new();
    pseudo_moves(board, us, &mut moves);
    moves.iter().any(|m| !is_in_check(&board.apply_move(m), us))
}

/// Returns true if the two generals share a file with nothing between them.
pub fn generals_facing(board: &Board) -> bool {
    let (Some(red), Some(black)) = (board.general(Color::Red), board.general(Color::Black))
    else {
        return false;
    };
    if red.col != black.col {
        return false;
    }
    let (top, bottom) = (red.row.min(black.row), red.row.max(black.row));
    ((top + 1)..bottom).all(|row| !board.is_occupied(Position::new(row, red.col)))
}

/// Returns true if any pseudo-legal move of `by` lands on `target`.
pub fn is_square_attacked(board: &Board, target: Position, by: Color) -> bool {
    let mut moves = MoveList::new();
    for piece in board.pieces_of(by) {
        moves.clear();
        generate_piece_moves(board, piece, &mut moves);
        if moves.iter().any(|m| m.to == target) {
            return true;
        }
    }
    false
}

/// Returns true if `color`'s general is in check.
///
/// A missing general counts as in check, as do facing generals.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.general(color) {
        None => true,
        Some(general) => {
            generals_facing(board) || is_square_attacked(board, general, color.opposite())
        }
    }
}

/// Returns true if the side to move is checkmated.
pub fn is_checkmate(board: &Board) -> bool {
    is_in_check(board, board.side_to_move()) && !has_legal_moves(board)
}

/// Returns true if the side to move is stalemated.
pub fn is_stalemate(board: &Board) -> bool {
    !is_in_check(board, board.side_to_move()) && !has_legal_moves(board)
}

/// Counts the pseudo-legal moves available to `color`.
pub fn mobility(board: &Board, color: Color) -> usize {
    let mut moves = MoveList::new();
    pseudo_moves(board, color, &mut moves);
    moves.len()
}

/// Returns true if `m` is one of the legal moves on `board`.
///
/// Compares the full move, so a move with a stale piece or capture payload
/// is rejected.
pub fn is_legal(board: &Board, m: &Move) -> bool {
    legal_moves(board).iter().any(|legal| legal == m)
}
