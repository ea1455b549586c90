//! Built-in opening book.

use crate::book::{BookMove, OpeningBook};

/// History key and candidate replies, all equally weighted.
const LINES: &[(&str, &[&str])] = &[
    // Red's first move: central cannon, either horse, or the middle soldier.
    ("", &["7,1,7,4", "7,7,7,4", "9,1,7,2", "9,7,7,6", "6,4,5,4"]),
    // Central cannon from the left.
    ("7,1,7,4", &["0,7,2,6", "0,1,2,2", "2,7,2,4", "3,4,4,4"]),
    // Central cannon from the right.
    ("7,7,7,4", &["0,7,2,6", "0,1,2,2", "2,1,2,4"]),
    ("7,1,7,4 0,7,2,6", &["9,1,7,2", "9,7,7,6", "7,7,7,6"]),
    ("7,1,7,4 0,1,2,2", &["9,7,7,6", "9,1,7,2", "6,6,5,6"]),
    // Horse openings.
    ("9,1,7,2", &["0,7,2,6", "0,1,2,2", "2,7,5,7"]),
    ("9,7,7,6", &["0,1,2,2", "0,7,2,6", "2,1,5,1"]),
    ("7,1,7,4 0,7,2,6 9,1,7,2 0,8,0,7", &["9,0,8,0", "7,7,6,7", "6,2,5,2"]),
];

/// Creates the built-in book of common early replies.
#[must_use]
pub fn builtin_book() -> OpeningBook {
    let mut book = OpeningBook::new();
    for (history, replies) in LINES {
        let moves = replies.iter().map(|key| BookMove::new(*key, 1)).collect();
        book.add_position(*history, moves);
    }
    book
}
