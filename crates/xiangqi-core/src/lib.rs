//! Core types for xiangqi (Chinese chess).
//!
//! This crate provides the fundamental types used across the engine:
//! - [`PieceKind`], [`Piece`] and [`Color`] for piece representation
//! - [`Position`] for points on the 10×9 board
//! - [`Move`] for move representation
//! - FEN parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod position;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::Move;
pub use piece::{Piece, PieceKind};
pub use position::{Position, COLS, ROWS, SQUARES};
