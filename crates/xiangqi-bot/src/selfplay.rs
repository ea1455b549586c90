//! Self-play loop.
//!
//! The [`SelfPlay`] runner plays both sides of a [`Game`]: book replies while
//! the opening book has one, engine searches after that.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use tracing::info;
use xiangqi_engine::{Game, GameError, GameResult};
use xiangqi_openings::OpeningBook;
use xiangqi_search::{Engine, EngineError};

/// Errors that can occur during self-play.
#[derive(Error, Debug)]
pub enum SelfPlayError {
    /// The search task failed.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    /// The game rejected a chosen move.
    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

/// Where a move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Book,
    Search { depth: u32, score: i32, nodes: u64 },
}

/// One played move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyRecord {
    /// WXF notation, e.g. `C2.5`.
    pub wxf: String,
    /// Coordinate key, e.g. `7,7,7,4`.
    pub key: String,
    pub source: MoveSource,
}

/// The moves of one self-play session.
#[derive(Debug, Clone)]
pub struct SelfPlayOutcome {
    pub plies: Vec<PlyRecord>,
    /// `None` if play stopped before the game ended.
    pub result: Option<GameResult>,
}

/// Plays the engine against itself.
pub struct SelfPlay {
    engine: Arc<Engine>,
    book: Option<OpeningBook>,
    max_plies: usize,
}

impl SelfPlay {
    /// Creates a runner that stops once the game reaches `max_plies`.
    pub fn new(engine: Arc<Engine>, book: Option<OpeningBook>, max_plies: usize) -> Self {
        Self {
            engine,
            book,
            max_plies,
        }
    }

    /// Plays `game` until it ends, the ply limit is reached, `stop` is set
    /// or a search is cancelled.
    ///
    /// The engine's cache is cleared first.
    pub async fn play<R: Rng>(
        &self,
        game: &mut Game,
        rng: &mut R,
        stop: &AtomicBool,
    ) -> Result<SelfPlayOutcome, SelfPlayError> {
        self.engine.clear_cache();
        let mut plies = Vec::new();

        while !game.is_game_over() && game.ply_count() < self.max_plies {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            let legal = game.legal_moves();
            let book_move = self
                .book
                .as_ref()
                .and_then(|book| book.pick(&game.history_keys(), legal.as_slice(), rng));

            let (m, source) = match book_move {
                Some(m) => (m, MoveSource::Book),
                None => match self.engine.find_best_move(game.board()).await? {
                    Some(result) => (
                        result.best_move,
                        MoveSource::Search {
                            depth: result.depth,
                            score: result.score,
                            nodes: result.nodes,
                        },
                    ),
                    // Cancelled.
                    None => break,
                },
            };

            let wxf = game.move_to_wxf(&m);
            game.make_move(m)?;
            info!(ply = game.ply_count(), mv = %wxf, ?source, "move played");

            plies.push(PlyRecord {
                wxf,
                key: m.coordinate_key(),
                source,
            });
        }

        Ok(SelfPlayOutcome {
            plies,
            result: game.result(),
        })
    }
}
