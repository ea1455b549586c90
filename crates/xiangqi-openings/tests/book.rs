//! Checks the built-in book against the rules engine.

use rand::rngs::StdRng;
use rand::SeedableRng;
use xiangqi_core::Move;
use xiangqi_engine::{legal_moves, Game};
use xiangqi_openings::{builtin_book, history_key, OpeningBook};

/// Every history in the built-in book, as coordinate keys.
fn book_histories() -> Vec<Vec<&'static str>> {
    vec![
        vec![],
        vec!["7,1,7,4"],
        vec!["7,7,7,4"],
        vec!["7,1,7,4", "0,7,2,6"],
        vec!["7,1,7,4", "0,1,2,2"],
        vec!["9,1,7,2"],
        vec!["9,7,7,6"],
        vec!["7,1,7,4", "0,7,2,6", "9,1,7,2", "0,8,0,7"],
    ]
}

fn replay(history: &[&str]) -> Game {
    let mut game = Game::new();
    for key in history {
        let (from, to) = Move::parse_coordinates(key).unwrap();
        game.make_move_coords(from, to).unwrap();
    }
    game
}

#[test]
fn every_book_reply_is_legal() {
    let book = builtin_book();
    for history in book_histories() {
        let game = replay(&history);
        let legal = legal_moves(game.board());
        let replies = book.lookup(&history_key(&history)).unwrap();
        for reply in replies {
            let points = reply.points().unwrap();
            assert!(
                OpeningBook::reconcile(points, legal.as_slice()).is_some(),
                "{} after {:?}",
                reply.key,
                history
            );
        }
    }
}

#[test]
fn histories_cover_the_whole_book() {
    let book = builtin_book();
    let histories = book_histories();
    assert_eq!(histories.len(), book.len());
    for history in &histories {
        assert!(book.lookup(&history_key(history)).is_some(), "{history:?}");
    }
}

#[test]
fn replies_belong_to_the_side_to_move() {
    let book = builtin_book();
    for history in book_histories() {
        let game = replay(&history);
        for reply in book.lookup(&history_key(&history)).unwrap() {
            let (from, _) = reply.points().unwrap();
            let piece = game.board().piece_at(from);
            assert_eq!(
                piece.map(|p| p.color),
                Some(game.side_to_move()),
                "{} after {:?}",
                reply.key,
                history
            );
        }
    }
}

#[test]
fn central_cannon_allows_central_soldier_reply() {
    let book = builtin_book();
    let replies = book.lookup("7,1,7,4").unwrap();
    assert!(replies.iter().any(|b| b.key == "3,4,4,4"));
}

#[test]
fn pick_follows_a_game() {
    let book = builtin_book();
    let mut rng = StdRng::seed_from_u64(42);
    let mut game = Game::new();

    // The first reply always comes from the book.
    let first = book
        .pick(&game.history_keys(), legal_moves(game.board()).as_slice(), &mut rng)
        .unwrap();
    assert!(game.try_move(first));

    // Play book moves while the book has an answer.
    while let Some(m) = book.pick(&game.history_keys(), legal_moves(game.board()).as_slice(), &mut rng) {
        assert!(game.try_move(m));
        assert!(game.ply_count() <= book.max_plies());
    }
    assert!(game.ply_count() >= 1);
}

#[test]
fn book_is_silent_after_max_plies() {
    let book = builtin_book().with_max_plies(1);
    let mut rng = StdRng::seed_from_u64(1);
    let game = replay(&["7,1,7,4"]);
    assert!(book
        .pick(&game.history_keys(), legal_moves(game.board()).as_slice(), &mut rng)
        .is_none());
}
