//! Game record with history tracking.
//!
//! The [`Game`] struct owns the live board and provides:
//! - Move history with WXF notation
//! - Undo by replaying the history from the starting board
//! - Coordinate keys of the history for opening lookup
//! - Captured material per side

use thiserror::Error;
use xiangqi_core::{Color, Move, Position};

use crate::board::BoardError;
use crate::notation::{move_to_wxf, wxf_to_move, NotationError};
use crate::rules::{GameResult, RuleSet, StandardXiangqi};
use crate::{Board, MoveList};

/// A recorded move in game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move as played.
    pub mov: Move,
    /// WXF notation for the move.
    pub wxf: String,
    /// Zobrist hash of the board before the move.
    pub hash_before: u64,
}

/// Error type for game operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// The move is not legal on the current board.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// The WXF string could not be resolved.
    #[error("invalid WXF: {0}")]
    InvalidNotation(#[from] NotationError),

    /// The game has already ended.
    #[error("game has already ended")]
    GameAlreadyOver,
}

/// A xiangqi game with history tracking.
///
/// Unlike [`Board`], which represents a single placement, `Game` keeps the
/// starting board and every committed move, which is enough to rebuild any
/// earlier state.
#[derive(Debug, Clone)]
pub struct Game {
    /// Current board.
    board: Board,
    /// Starting board.
    start: Board,
    /// Committed moves.
    moves: Vec<GameMove>,
    /// Game result if the game has ended.
    result: Option<GameResult>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting layout.
    pub fn new() -> Self {
        Self::from_board(StandardXiangqi.initial_board())
    }

    /// Creates a game from a custom starting board.
    pub fn from_board(board: Board) -> Self {
        let mut game = Game {
            board: board.clone(),
            start: board,
            moves: Vec::new(),
            result: None,
        };
        // The starting board may already be terminal
        game.check_game_end();
        game
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        Ok(Self::from_board(Board::from_fen(fen)?))
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the starting board.
    pub fn start_board(&self) -> &Board {
        &self.start
    }

    /// Returns the side to move.
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// Returns all legal moves on the current board.
    pub fn legal_moves(&self) -> MoveList {
        StandardXiangqi.generate_moves(&self.board)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        StandardXiangqi.is_check(&self.board)
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Returns true if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Returns the move history.
    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the number of plies played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Returns the coordinate keys of the committed moves, oldest first.
    pub fn history_keys(&self) -> Vec<String> {
        self.moves.iter().map(|gm| gm.mov.coordinate_key()).collect()
    }

    /// Submits a move, returning `false` if it is not legal.
    pub fn try_move(&mut self, m: Move) -> bool {
        self.make_move(m).is_ok()
    }

    /// Makes a move given in internal format.
    ///
    /// The move must equal one of the legal moves, payload included.
    pub fn make_move(&mut self, m: Move) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        if !StandardXiangqi.is_legal(&self.board, &m) {
            return Err(GameError::IllegalMove(m.coordinate_key()));
        }

        self.apply_move(m);
        Ok(())
    }

    /// Makes the legal move going between two points.
    pub fn make_move_coords(&mut self, from: Position, to: Position) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        match self.legal_moves().find(from, to) {
            Some(legal_move) => {
                self.apply_move(legal_move);
                Ok(())
            }
            None => Err(GameError::IllegalMove(format!("{} -> {}", from, to))),
        }
    }

    /// Makes a move given in WXF notation.
    pub fn make_move_wxf(&mut self, wxf: &str) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        let m = wxf_to_move(&self.board, wxf)?;
        self.apply_move(m);
        Ok(())
    }

    /// Takes back the last `plies` moves.
    ///
    /// The board is rebuilt by replaying the remaining history from the
    /// starting board. Returns `false` (and changes nothing) if `plies` is
    /// zero or exceeds the number of moves played.
    pub fn undo(&mut self, plies: usize) -> bool {
        if plies == 0 || plies > self.moves.len() {
            return false;
        }

        let keep = self.moves.len() - plies;
        self.moves.truncate(keep);

        let mut board = self.start.clone();
        for gm in &self.moves {
            board.apply_move_in_place(&gm.mov);
        }
        self.board = board;
        self.result = None;
        self.check_game_end();
        true
    }

    /// Total base value of the pieces `color` has captured.
    pub fn captured_material(&self, color: Color) -> i32 {
        self.moves
            .iter()
            .filter(|gm| gm.mov.piece.color == color)
            .filter_map(|gm| gm.mov.captured)
            .map(|piece| piece.value())
            .sum()
    }

    /// Returns the current board as a FEN string.
    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Generates WXF for a move on the current board.
    pub fn move_to_wxf(&self, m: &Move) -> String {
        move_to_wxf(&self.board, m)
    }

    /// Internal method to commit a legal move.
    fn apply_move(&mut self, m: Move) {
        self.moves.push(GameMove {
            mov: m,
            wxf: move_to_wxf(&self.board, &m),
            hash_before: self.board.position_hash(),
        });

        self.board.apply_move_in_place(&m);
        self.check_game_end();
    }

    /// Checks if the game has ended and updates the result.
    fn check_game_end(&mut self) {
        self.result = StandardXiangqi.game_result(&self.board);
    }
}
