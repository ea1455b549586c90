//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::legal_moves;
use crate::Board;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(board);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        nodes += perft(&board.make_move(m), depth - 1);
    }
    nodes
}

/// Perft with divide - node count below each root move, keyed by its
/// coordinate key. Useful for locating a generator bug.
pub fn perft_divide(board: &Board, depth: u32) -> Vec<(String, u64)> {
    let moves = legal_moves(board);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let nodes = if depth > 1 {
            perft(&board.make_move(m), depth - 1)
        } else {
            1
        };
        results.push((m.coordinate_key(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
