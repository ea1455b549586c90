//! Move ordering.
//!
//! Good moves first make alpha-beta cut off sooner. The cache's best move
//! for the board goes first, then captures by MVV-LVA, with small nudges for
//! central landing points and forward quiet moves.

use std::cmp::Reverse;

use xiangqi_core::Move;

const CENTER_BONUS: i32 = 5;
const FORWARD_BONUS: i32 = 2;

/// Heuristic priority of a move. Higher sorts earlier.
pub fn move_priority(m: &Move, tt_move: Option<&Move>) -> i32 {
    if tt_move == Some(m) {
        return i32::MAX;
    }

    let mut score = 0;

    if let Some(victim) = m.captured {
        score += victim.value() * 10 - m.piece.value() / 10;
    }

    if (3..=5).contains(&m.to.col) && (3..=6).contains(&m.to.row) {
        score += CENTER_BONUS;
    }

    if !m.is_capture() && (m.to.row - m.from.row) * m.piece.color.forward() > 0 {
        score += FORWARD_BONUS;
    }

    score
}

/// Sorts moves by descending priority. Ties keep their generation order.
pub fn order_moves(moves: &mut [Move], tt_move: Option<&Move>) {
    moves.sort_by_key(|m| Reverse(move_priority(m, tt_move)));
}
