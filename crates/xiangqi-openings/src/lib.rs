//! Xiangqi opening book.
//!
//! A small table of known replies for the first few plies, keyed by the
//! move history written as coordinate keys (`"7,1,7,4 0,7,2,6"`). Book
//! suggestions are only points; [`OpeningBook::reconcile`] turns them into
//! real moves from the legal-move list.

pub mod book;
pub mod builtin;

pub use book::{history_key, BookError, BookMove, OpeningBook, DEFAULT_MAX_PLIES};
pub use builtin::builtin_book;
