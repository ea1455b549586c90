//! Xiangqi rules engine.
//!
//! This crate provides:
//! - [`Board`] - 90-point mailbox with side to move and an incremental Zobrist hash
//! - [`Game`] - Game record with history, undo and captured material
//! - [`RuleSet`] - Trait for rule variants, implemented by [`StandardXiangqi`]
//! - Move generation, check, checkmate and stalemate detection
//! - WXF notation parsing and generation
//!
//! # Example
//!
//! ```
//! use xiangqi_engine::{legal_moves, Board, Game};
//!
//! // Using Board directly (stateless)
//! let board = Board::initial();
//! let moves = legal_moves(&board);
//! assert_eq!(moves.len(), 44);
//!
//! // Using Game for full game management
//! let mut game = Game::new();
//! game.make_move_wxf("C2.5").unwrap();
//! game.make_move_wxf("H8+7").unwrap();
//! println!("Board after C2.5 H8+7: {}", game.to_fen());
//! ```

mod board;
mod game;
pub mod movegen;
pub mod notation;
pub mod rules;
mod zobrist;

pub use board::{Board, BoardError};
pub use game::{Game, GameError, GameMove};
pub use movegen::{
    generals_facing, has_legal_moves, is_checkmate, is_in_check, is_legal, is_square_attacked,
    is_stalemate, legal_captures, legal_moves, mobility, pseudo_moves, MoveList,
};
pub use movegen::perft::{perft, perft_divide};
pub use notation::{move_to_wxf, wxf_to_move, NotationError};
pub use rules::{DrawReason, GameResult, RuleSet, StandardXiangqi};
pub use zobrist::{ZobristKeys, ZOBRIST};
