//! Iterative-deepening alpha-beta search.
//!
//! Scores are always from Red's point of view: Red maximizes, Black
//! minimizes. A checkmate found `ply` half-moves below the root scores
//! `CHECKMATE_SCORE - ply`, so shorter mates are preferred. Cached scores are
//! stored relative to their own node and converted back on probe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};
use xiangqi_core::{Color, Move};
use xiangqi_engine::{is_in_check, legal_captures, legal_moves, Board};

use crate::config::SearchConfig;
use crate::evaluation::{evaluate, CHECKMATE_SCORE};
use crate::ordering::order_moves;
use crate::tt::{Bound, TranspositionTable, TtEntry};

/// Iterative deepening stops once the best score is within this distance of
/// a checkmate.
pub const MATE_MARGIN: i32 = 100;

/// Larger than any reachable score.
const INFINITY: i32 = 1_000_000;

/// Scores beyond this magnitude encode a forced mate.
const MATE_THRESHOLD: i32 = CHECKMATE_SCORE - 1_000;

/// Outcome of the deepest completed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    /// Score from Red's point of view.
    pub score: i32,
    /// Depth of the iteration that produced the move.
    pub depth: u32,
    /// Nodes visited over all iterations.
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SearchResult {
    /// Returns true if the score announces a forced mate.
    pub fn is_mate(&self) -> bool {
        self.score.abs() > CHECKMATE_SCORE - MATE_MARGIN
    }
}

/// Search state.
///
/// The transposition cache lives as long as the searcher; everything else
/// is reset by each [`Searcher::find_best_move`] call.
#[derive(Debug)]
pub struct Searcher {
    config: SearchConfig,
    tt: TranspositionTable,
    nodes: u64,
    start_time: Instant,
    stop: Arc<AtomicBool>,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Searcher {
            tt: TranspositionTable::new(config.cache_capacity),
            config,
            nodes: 0,
            start_time: Instant::now(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replaces the limits. A new cache capacity discards the cache.
    pub fn set_config(&mut self, config: SearchConfig) {
        if config.cache_capacity != self.config.cache_capacity {
            self.tt = TranspositionTable::new(config.cache_capacity);
        }
        self.config = config;
    }

    /// The flag polled for cancellation.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Installs a new cancellation flag.
    ///
    /// A set flag is never cleared by the searcher; install a fresh one to
    /// search again after a cancellation.
    pub fn set_stop_flag(&mut self, flag: Arc<AtomicBool>) {
        self.stop = flag;
    }

    /// Requests cancellation of the running search.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn clear_cache(&mut self) {
        self.tt.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.tt.len()
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Finds the best move for the side to move.
    ///
    /// Deepens from 1 to `max_depth`, keeping the result of each completed
    /// iteration. Stops early on a mate score or once the time budget is
    /// spent (checked between iterations only). Returns `None` when there is
    /// no legal move or the search was cancelled.
    pub fn find_best_move(&mut self, board: &Board) -> Option<SearchResult> {
        self.nodes = 0;
        self.start_time = Instant::now();

        if legal_moves(board).is_empty() {
            return None;
        }

        let mut best: Option<SearchResult> = None;

        for depth in 1..=self.config.max_depth {
            let Some((best_move, score)) = self.search_root(board, depth) else {
                break;
            };

            let result = SearchResult {
                best_move,
                score,
                depth,
                nodes: self.nodes,
                elapsed: self.start_time.elapsed(),
            };
            debug!(
                depth,
                score,
                nodes = self.nodes,
                elapsed_ms = result.elapsed.as_millis() as u64,
                best_move = %best_move,
                "depth complete"
            );
            best = Some(result);

            if result.is_mate() {
                break;
            }
            if self.start_time.elapsed() > self.config.time_limit() {
                break;
            }
        }

        if self.is_stopped() {
            debug!(nodes = self.nodes, "search cancelled");
            return None;
        }

        if let Some(result) = &best {
            info!(
                best_move = %result.best_move,
                score = result.score,
                depth = result.depth,
                nodes = result.nodes,
                "selected move"
            );
        }
        best
    }

    /// One root iteration. `None` if cancelled.
    fn search_root(&mut self, board: &Board, depth: u32) -> Option<(Move, i32)> {
        let maximizing = board.side_to_move() == Color::Red;
        let hash = board.position_hash();
        let tt_move = self.tt.probe(hash).and_then(|entry| entry.best_move);

        let mut moves = legal_moves(board);
        order_moves(moves.as_mut_slice(), tt_move.as_ref());

        let mut alpha = -INFINITY;
        let mut beta = INFINITY;
        let mut best: Option<(Move, i32)> = None;

        for m in &moves {
            if self.is_stopped() {
                return None;
            }

            let child = board.make_move(m);
            let score = self.alpha_beta(&child, depth - 1, 1, alpha, beta, !maximizing);

            if self.is_stopped() {
                return None;
            }

            let improves = match best {
                None => true,
                Some((_, best_score)) if maximizing => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if improves {
                best = Some((*m, score));
            }

            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
        }

        if let Some((m, score)) = best {
            self.tt.store(TtEntry {
                hash,
                depth,
                score: score_to_tt(score, 0),
                bound: Bound::Exact,
                best_move: Some(m),
            });
        }
        best
    }

    /// Minimax alpha-beta with a transposition cache.
    ///
    /// `maximizing` is true when Red is to move. Returns 0 once cancelled.
    pub fn alpha_beta(
        &mut self,
        board: &Board,
        depth: u32,
        ply: u32,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        if self.is_stopped() {
            return 0;
        }

        let mut alpha = alpha;
        let mut beta = beta;
        let hash = board.position_hash();

        let entry = self.tt.probe(hash);
        if let Some(entry) = entry {
            if entry.depth >= depth {
                let score = score_from_tt(entry.score, ply);
                match entry.bound {
                    Bound::Exact => return score,
                    Bound::LowerBound => alpha = alpha.max(score),
                    Bound::UpperBound => beta = beta.min(score),
                }
                if alpha >= beta {
                    return score;
                }
            }
        }

        if depth == 0 {
            let budget = self.config.quiescence_depth;
            return self.quiesce(board, ply, alpha, beta, maximizing, budget);
        }

        let mut moves = legal_moves(board);
        if moves.is_empty() {
            return if is_in_check(board, board.side_to_move()) {
                mated_score(maximizing, ply)
            } else {
                0
            };
        }

        let tt_move = entry.and_then(|entry| entry.best_move);
        order_moves(moves.as_mut_slice(), tt_move.as_ref());

        let (alpha_start, beta_start) = (alpha, beta);
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for m in &moves {
            if self.is_stopped() {
                return 0;
            }

            let child = board.make_move(m);
            let score = self.alpha_beta(&child, depth - 1, ply + 1, alpha, beta, !maximizing);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(*m);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(*m);
                }
                beta = beta.min(score);
            }

            if alpha >= beta {
                break;
            }
        }

        if self.is_stopped() {
            return 0;
        }

        let bound = if best_score <= alpha_start {
            Bound::UpperBound
        } else if best_score >= beta_start {
            Bound::LowerBound
        } else {
            Bound::Exact
        };
        self.tt.store(TtEntry {
            hash,
            depth,
            score: score_to_tt(best_score, ply),
            bound,
            best_move,
        });

        best_score
    }

    /// Capture-only search past the horizon.
    ///
    /// Returns the static score once `budget` runs out. Otherwise the side
    /// to move may stand pat or try its legal captures.
    fn quiesce(
        &mut self,
        board: &Board,
        ply: u32,
        alpha: i32,
        beta: i32,
        maximizing: bool,
        budget: u32,
    ) -> i32 {
        self.nodes += 1;

        if self.is_stopped() {
            return 0;
        }

        let stand_pat = mate_relative(evaluate(board), ply);
        if budget == 0 {
            return stand_pat;
        }

        if maximizing {
            if stand_pat >= beta {
                return beta;
            }
            let mut alpha = alpha.max(stand_pat);

            let mut captures = legal_captures(board);
            order_moves(captures.as_mut_slice(), None);
            for m in &captures {
                if self.is_stopped() {
                    return 0;
                }
                let child = board.make_move(m);
                let score = self.quiesce(&child, ply + 1, alpha, beta, false, budget - 1);
                alpha = alpha.max(score);
                if alpha >= beta {
                    return beta;
                }
            }
            alpha
        } else {
            if stand_pat <= alpha {
                return alpha;
            }
            let mut beta = beta.min(stand_pat);

            let mut captures = legal_captures(board);
            order_moves(captures.as_mut_slice(), None);
            for m in &captures {
                if self.is_stopped() {
                    return 0;
                }
                let child = board.make_move(m);
                let score = self.quiesce(&child, ply + 1, alpha, beta, true, budget - 1);
                beta = beta.min(score);
                if beta <= alpha {
                    return alpha;
                }
            }
            beta
        }
    }
}

/// Score of the side to move being checkmated `ply` half-moves from the root.
#[inline]
fn mated_score(maximizing: bool, ply: u32) -> i32 {
    let magnitude = CHECKMATE_SCORE - ply as i32;
    if maximizing {
        -magnitude
    } else {
        magnitude
    }
}

/// Rewrites a static checkmate score as a distance from the root.
#[inline]
fn mate_relative(score: i32, ply: u32) -> i32 {
    if score >= CHECKMATE_SCORE {
        CHECKMATE_SCORE - ply as i32
    } else if score <= -CHECKMATE_SCORE {
        -(CHECKMATE_SCORE - ply as i32)
    } else {
        score
    }
}

/// Root-relative score to node-relative cache score.
#[inline]
fn score_to_tt(score: i32, ply: u32) -> i32 {
    if score > MATE_THRESHOLD {
        score + ply as i32
    } else if score < -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Node-relative cache score to root-relative score.
#[inline]
fn score_from_tt(score: i32, ply: u32) -> i32 {
    if score > MATE_THRESHOLD {
        score - ply as i32
    } else if score < -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiangqi_engine::is_checkmate;

    fn config(max_depth: u32, quiescence_depth: u32) -> SearchConfig {
        SearchConfig {
            max_depth,
            time_limit_ms: 60_000,
            quiescence_depth,
            cache_capacity: 100_000,
        }
    }

    #[test]
    fn mate_score_conversion_roundtrips() {
        for ply in [0, 1, 5, 30] {
            for score in [0, 123, -4567, CHECKMATE_SCORE - 7, -(CHECKMATE_SCORE - 3)] {
                assert_eq!(score_from_tt(score_to_tt(score, ply), ply), score);
            }
        }
        // A mate 3 plies below a node at ply 2 is a mate 5 plies from a root.
        let stored = score_to_tt(CHECKMATE_SCORE - 5, 2);
        assert_eq!(stored, CHECKMATE_SCORE - 3);
        assert_eq!(score_from_tt(stored, 4), CHECKMATE_SCORE - 7);
    }

    #[test]
    fn mated_score_prefers_short_mates() {
        assert_eq!(mated_score(false, 1), CHECKMATE_SCORE - 1);
        assert_eq!(mated_score(true, 3), -(CHECKMATE_SCORE - 3));
        assert!(mated_score(false, 1) > mated_score(false, 3));
        assert_eq!(mate_relative(CHECKMATE_SCORE, 2), CHECKMATE_SCORE - 2);
        assert_eq!(mate_relative(-CHECKMATE_SCORE, 2), -(CHECKMATE_SCORE - 2));
        assert_eq!(mate_relative(250, 2), 250);
    }

    #[test]
    fn finds_mate_in_one() {
        let board = Board::from_fen("4k4/R8/9/9/9/8R/9/9/9/3K5 w").unwrap();
        let mut searcher = Searcher::new(config(3, 2));
        let result = searcher.find_best_move(&board).unwrap();

        assert!(is_checkmate(&board.make_move(&result.best_move)));
        assert!(result.score > CHECKMATE_SCORE - MATE_MARGIN);
        assert!(result.is_mate());
        // The mate is found at depth 1 and deepening stops there.
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn black_finds_mate_in_one() {
        let board = Board::from_fen("5k3/9/9/9/r8/9/9/9/8r/4K4 b").unwrap();
        let mut searcher = Searcher::new(config(2, 1));
        let result = searcher.find_best_move(&board).unwrap();

        assert!(is_checkmate(&board.make_move(&result.best_move)));
        assert!(result.score < -(CHECKMATE_SCORE - MATE_MARGIN));
    }

    #[test]
    fn no_move_when_mated() {
        let board = Board::from_fen("R3k4/R8/9/9/9/9/9/9/9/3K5 b").unwrap();
        let mut searcher = Searcher::default();
        assert_eq!(searcher.find_best_move(&board), None);
    }

    #[test]
    fn cancelled_search_returns_none() {
        let mut searcher = Searcher::new(config(4, 2));
        searcher.stop();
        assert!(searcher.is_stopped());
        assert_eq!(searcher.find_best_move(&Board::initial()), None);

        searcher.set_stop_flag(Arc::new(AtomicBool::new(false)));
        let result = searcher.find_best_move(&Board::initial());
        assert!(result.is_some());
    }

    #[test]
    fn time_budget_is_checked_between_depths() {
        let mut searcher = Searcher::new(SearchConfig {
            time_limit_ms: 0,
            ..config(5, 1)
        });
        let result = searcher.find_best_move(&Board::initial()).unwrap();
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn captures_hanging_chariot() {
        // The cannon jumps its own horse to take the undefended chariot.
        let board = Board::from_fen("3k5/9/9/9/9/9/r8/H8/C8/4K4 w").unwrap();
        let mut searcher = Searcher::new(config(2, 2));
        let result = searcher.find_best_move(&board).unwrap();
        assert_eq!(
            result.best_move.captured.map(|p| p.kind),
            Some(xiangqi_core::PieceKind::Chariot)
        );
    }

    #[test]
    fn cache_is_populated_and_cleared() {
        let mut searcher = Searcher::new(config(2, 1));
        searcher.find_best_move(&Board::initial()).unwrap();
        assert!(searcher.cache_size() > 0);
        assert!(searcher.nodes() > 0);

        searcher.clear_cache();
        assert_eq!(searcher.cache_size(), 0);
    }

    #[test]
    fn cache_respects_capacity() {
        let mut searcher = Searcher::new(SearchConfig {
            cache_capacity: 64,
            ..config(3, 1)
        });
        searcher.find_best_move(&Board::initial()).unwrap();
        assert!(searcher.cache_size() <= 64);
    }

    #[test]
    fn set_config_keeps_cache_for_same_capacity() {
        let mut searcher = Searcher::new(config(2, 1));
        searcher.find_best_move(&Board::initial()).unwrap();
        let size = searcher.cache_size();

        searcher.set_config(config(3, 2));
        assert_eq!(searcher.cache_size(), size);

        searcher.set_config(SearchConfig {
            cache_capacity: 10,
            ..config(3, 2)
        });
        assert_eq!(searcher.cache_size(), 0);
        assert_eq!(searcher.config().max_depth, 3);
    }
}
