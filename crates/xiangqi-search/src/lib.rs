//! Search for the xiangqi engine.
//!
//! # Overview
//!
//! - [`evaluate`] - Static evaluation from Red's point of view
//! - [`Searcher`] - Iterative-deepening alpha-beta with a transposition cache
//! - [`Engine`] - Runs searches on tokio's blocking pool, with cancellation
//! - [`SearchConfig`] / [`Difficulty`] - Search limits and presets
//!
//! # Example
//!
//! ```no_run
//! use xiangqi_engine::Board;
//! use xiangqi_search::{Difficulty, Searcher};
//!
//! let mut searcher = Searcher::new(Difficulty::Intermediate.config());
//! if let Some(result) = searcher.find_best_move(&Board::initial()) {
//!     println!("{} scores {}", result.best_move, result.score);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod evaluation;
pub mod ordering;
pub mod search;
pub mod tt;

pub use config::{ConfigError, Difficulty, SearchConfig, DEFAULT_CACHE_CAPACITY};
pub use engine::{Engine, EngineError, SearchTask};
pub use evaluation::{evaluate, positional_value, CHECKMATE_SCORE};
pub use ordering::{move_priority, order_moves};
pub use search::{SearchResult, Searcher, MATE_MARGIN};
pub use tt::{Bound, TranspositionTable, TtEntry};
