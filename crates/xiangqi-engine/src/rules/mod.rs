//! Rule set abstraction.
//!
//! This module provides the [`RuleSet`] trait. The game record and the bot
//! delegate game-specific logic (initial layout, move legality, terminal
//! detection) to the active rule set.

mod standard;

pub use standard::StandardXiangqi;

use std::fmt;

use crate::{Board, MoveList};
use xiangqi_core::{Color, Move};

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// Red wins (Black is checkmated).
    RedWins,
    /// Black wins (Red is checkmated).
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

impl GameResult {
    /// The result of the side to move having no reply while in check.
    pub const fn checkmated(loser: Color) -> Self {
        match loser {
            Color::Red => GameResult::BlackWins,
            Color::Black => GameResult::RedWins,
        }
    }

    /// Returns the winning color, or `None` for a draw.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::RedWins => Some(Color::Red),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::RedWins => write!(f, "1-0"),
            GameResult::BlackWins => write!(f, "0-1"),
            GameResult::Draw(_) => write!(f, "1/2-1/2"),
        }
    }
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
}

/// Trait for implementing rule variants.
///
/// # Example
///
/// ```
/// use xiangqi_engine::rules::RuleSet;
/// use xiangqi_engine::StandardXiangqi;
///
/// let board = StandardXiangqi.initial_board();
/// let moves = StandardXiangqi.generate_moves(&board);
/// assert_eq!(moves.len(), 44);
/// ```
pub trait RuleSet {
    /// Returns the initial board for this variant.
    fn initial_board(&self) -> Board;

    /// Generates all legal moves for the side to move.
    fn generate_moves(&self, board: &Board) -> MoveList;

    /// Returns true if the given move is legal on the board.
    fn is_legal(&self, board: &Board, m: &Move) -> bool {
        self.generate_moves(board).iter().any(|legal| legal == m)
    }

    /// Makes a move, returning the new board with the turn passed.
    fn make_move(&self, board: &Board, m: &Move) -> Board;

    /// Attempts to make a move, returning `None` if illegal.
    fn try_make_move(&self, board: &Board, m: &Move) -> Option<Board> {
        if self.is_legal(board, m) {
            Some(self.make_move(board, m))
        } else {
            None
        }
    }

    /// Returns true if the side to move is in check.
    fn is_check(&self, board: &Board) -> bool;

    /// Returns the game result if the game is over, otherwise `None`.
    fn game_result(&self, board: &Board) -> Option<GameResult>;

    /// Returns true if the game is over.
    fn is_game_over(&self, board: &Board) -> bool {
        self.game_result(board).is_some()
    }
}
