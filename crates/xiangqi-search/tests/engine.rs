//! Integration tests for the searcher and the asynchronous engine.

use proptest::prelude::*;
use xiangqi_engine::{is_checkmate, is_legal, legal_moves, Board};
use xiangqi_search::{Difficulty, Engine, SearchConfig, Searcher, CHECKMATE_SCORE, MATE_MARGIN};

fn quick() -> SearchConfig {
    SearchConfig {
        max_depth: 2,
        time_limit_ms: 60_000,
        quiescence_depth: 1,
        cache_capacity: 50_000,
    }
}

/// Red: general (9,3), chariots (1,0) and (5,8). Black: general (0,4).
const MATE_IN_ONE: &str = "4k4/R8/9/9/9/8R/9/9/9/3K5 w";

#[test]
fn searcher_is_deterministic() {
    let board = Board::initial();
    let first = Searcher::new(quick()).find_best_move(&board).unwrap();
    let second = Searcher::new(quick()).find_best_move(&board).unwrap();
    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.score, second.score);
    assert_eq!(first.depth, 2);
}

#[test]
fn searcher_is_deterministic_under_eviction() {
    let config = SearchConfig {
        max_depth: 3,
        time_limit_ms: 60_000,
        quiescence_depth: 1,
        cache_capacity: 64,
    };
    let board = Board::initial();
    let runs: Vec<_> = (0..3)
        .map(|_| {
            let mut searcher = Searcher::new(config);
            let result = searcher.find_best_move(&board).unwrap();
            assert!(searcher.cache_size() <= 64);
            (result.best_move, result.score, result.nodes)
        })
        .collect();
    assert!(runs.windows(2).all(|pair| pair[0] == pair[1]), "{runs:?}");
}

#[test]
fn warm_cache_search_completes() {
    let board = Board::initial();
    let mut searcher = Searcher::new(quick());
    let cold = searcher.find_best_move(&board).unwrap();
    let cached = searcher.cache_size();
    let warm = searcher.find_best_move(&board).unwrap();
    assert!(is_legal(&board, &cold.best_move));
    assert!(is_legal(&board, &warm.best_move));
    assert_eq!(warm.depth, cold.depth);
    assert!(searcher.cache_size() >= cached);
}

#[test]
fn every_preset_returns_a_legal_move() {
    let board = Board::initial();
    for difficulty in [Difficulty::Beginner, Difficulty::Intermediate] {
        let mut searcher = Searcher::new(difficulty.config());
        let result = searcher.find_best_move(&board).unwrap();
        assert!(is_legal(&board, &result.best_move), "{difficulty}");
    }
}

#[test]
fn mate_in_one_is_found_by_every_depth() {
    let board = Board::from_fen(MATE_IN_ONE).unwrap();
    for max_depth in 1..=3 {
        let mut searcher = Searcher::new(SearchConfig { max_depth, ..quick() });
        let result = searcher.find_best_move(&board).unwrap();
        assert!(is_checkmate(&board.make_move(&result.best_move)));
        assert!(result.score > CHECKMATE_SCORE - MATE_MARGIN);
    }
}

#[tokio::test]
async fn engine_finds_mate() {
    let engine = Engine::new(quick());
    let board = Board::from_fen(MATE_IN_ONE).unwrap();
    let result = engine.find_best_move(&board).await.unwrap().unwrap();
    assert!(is_checkmate(&board.make_move(&result.best_move)));
    assert!(engine.cache_size() > 0);

    engine.clear_cache();
    assert_eq!(engine.cache_size(), 0);
}

#[tokio::test]
async fn engine_reports_no_move_when_mated() {
    let engine = Engine::new(quick());
    let board = Board::from_fen("R3k4/R8/9/9/9/9/9/9/9/3K5 b").unwrap();
    assert!(engine.find_best_move(&board).await.unwrap().is_none());
}

#[tokio::test]
async fn cancelled_search_resolves_to_none() {
    let engine = Engine::new(SearchConfig {
        max_depth: 12,
        time_limit_ms: 600_000,
        quiescence_depth: 4,
        cache_capacity: 10_000,
    });
    let task = engine.spawn_search(Board::initial());
    task.cancel();
    assert!(task.is_cancelled());
    assert!(task.await.unwrap().is_none());

    // A fresh search after a cancellation runs normally.
    engine.set_config(quick());
    assert!(engine.find_best_move(&Board::initial()).await.unwrap().is_some());
}

#[tokio::test]
async fn engine_cancel_stops_latest_search() {
    let engine = Engine::new(SearchConfig {
        max_depth: 12,
        time_limit_ms: 600_000,
        quiescence_depth: 4,
        cache_capacity: 10_000,
    });
    let task = engine.spawn_search(Board::initial());
    engine.cancel();
    assert!(task.await.unwrap().is_none());
}

#[tokio::test]
async fn config_can_be_swapped() {
    let engine = Engine::default();
    assert_eq!(engine.config(), Difficulty::Professional.config());
    engine.set_config(Difficulty::Beginner.config());
    assert_eq!(engine.config().max_depth, 1);
}

/// Plays `choices` as indices into the legal move lists.
fn playout(choices: &[u16]) -> Board {
    let mut board = Board::initial();
    for &choice in choices {
        let moves = legal_moves(&board);
        if moves.is_empty() {
            break;
        }
        let m = moves[choice as usize % moves.len()];
        board.apply_move_in_place(&m);
    }
    board
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn best_move_is_legal(choices in prop::collection::vec(any::<u16>(), 0..30)) {
        let board = playout(&choices);
        let mut searcher = Searcher::new(SearchConfig { max_depth: 1, ..quick() });
        match searcher.find_best_move(&board) {
            Some(result) => prop_assert!(is_legal(&board, &result.best_move)),
            None => prop_assert!(legal_moves(&board).is_empty()),
        }
    }

    #[test]
    fn cache_never_exceeds_capacity(choices in prop::collection::vec(any::<u16>(), 0..20)) {
        let board = playout(&choices);
        let mut searcher = Searcher::new(SearchConfig { cache_capacity: 32, ..quick() });
        searcher.find_best_move(&board);
        prop_assert!(searcher.cache_size() <= 32);
    }
}
