//! Per-kind pseudo-legal move rules.
//!
//! Each generator pushes every move its piece could make if check were
//! ignored. None of them captures a piece of its own color or leaves the
//! board.

use xiangqi_core::{Move, Piece, PieceKind, Position};

use super::MoveList;
use crate::Board;

/// A pseudo-legal move generator for one piece kind.
pub type PieceGenerator = fn(&Board, Piece, &mut MoveList);

/// Generators indexed by [`PieceKind::index`].
pub const GENERATORS: [PieceGenerator; 7] = [
    general_moves,
    advisor_moves,
    elephant_moves,
    horse_moves,
    chariot_moves,
    cannon_moves,
    soldier_moves,
];

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Horse leaps paired with the leg point that blocks them.
const HORSE_LEAPS: [((i8, i8), (i8, i8)); 8] = [
    ((-2, -1), (-1, 0)),
    ((-2, 1), (-1, 0)),
    ((2, -1), (1, 0)),
    ((2, 1), (1, 0)),
    ((-1, -2), (0, -1)),
    ((1, -2), (0, -1)),
    ((-1, 2), (0, 1)),
    ((1, 2), (0, 1)),
];

/// Pushes `piece -> to` unless `to` holds a piece of the same color.
#[inline]
fn push_target(board: &Board, piece: Piece, to: Position, moves: &mut MoveList) {
    match board.piece_at(to) {
        Some(target) if target.color == piece.color => {}
        captured => moves.push(Move::new(piece.position, to, piece, captured)),
    }
}

fn general_moves(board: &Board, piece: Piece, moves: &mut MoveList) {
    for (dr, dc) in ORTHOGONAL {
        if let Some(to) = piece.position.offset(dr, dc) {
            if to.in_palace(piece.color) {
                push_target(board, piece, to, moves);
            }
        }
    }
}

fn advisor_moves(board: &Board, piece: Piece, moves: &mut MoveList) {
    for (dr, dc) in DIAGONAL {
        if let Some(to) = piece.position.offset(dr, dc) {
            if to.in_palace(piece.color) {
                push_target(board, piece, to, moves);
            }
        }
    }
}

fn elephant_moves(board: &Board, piece: Piece, moves: &mut MoveList) {
    let home = piece.color.home_rows();
    for (dr, dc) in DIAGONAL {
        let (Some(eye), Some(to)) = (
            piece.position.offset(dr, dc),
            piece.position.offset(2 * dr, 2 * dc),
        ) else {
            continue;
        };
        if home.contains(&to.row) && !board.is_occupied(eye) {
            push_target(board, piece, to, moves);
        }
    }
}

fn horse_moves(board: &Board, piece: Piece, moves: &mut MoveList) {
    for ((dr, dc), (lr, lc)) in HORSE_LEAPS {
        let Some(to) = piece.position.offset(dr, dc) else {
            continue;
        };
        let leg = Position::new(piece.position.row + lr, piece.position.col + lc);
        if !board.is_occupied(leg) {
            push_target(board, piece, to, moves);
        }
    }
}

fn chariot_moves(board: &Board, piece: Piece, moves: &mut MoveList) {
    for (dr, dc) in ORTHOGONAL {
        let mut cursor = piece.position.offset(dr, dc);
        while let Some(to) = cursor {
            match board.piece_at(to) {
                None => moves.push(Move::new(piece.position, to, piece, None)),
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(Move::new(piece.position, to, piece, Some(target)));
                    }
                    break;
                }
            }
            cursor = to.offset(dr, dc);
        }
    }
}

fn cannon_moves(board: &Board, piece: Piece, moves: &mut MoveList) {
    for (dr, dc) in ORTHOGONAL {
        let mut cursor = piece.position.offset(dr, dc);
        let mut screened = false;
        while let Some(to) = cursor {
            match (board.piece_at(to), screened) {
                (None, false) => moves.push(Move::new(piece.position, to, piece, None)),
                (Some(_), false) => screened = true,
                (None, true) => {}
                (Some(target), true) => {
                    if target.color != piece.color {
                        moves.push(Move::new(piece.position, to, piece, Some(target)));
                    }
                    break;
                }
            }
            cursor = to.offset(dr, dc);
        }
    }
}

fn soldier_moves(board: &Board, piece: Piece, moves: &mut MoveList) {
    if let Some(to) = piece.position.offset(piece.color.forward(), 0) {
        push_target(board, piece, to, moves);
    }
    if piece.color.has_crossed_river(piece.position.row) {
        for dc in [-1, 1] {
            if let Some(to) = piece.position.offset(0, dc) {
                push_target(board, piece, to, moves);
            }
        }
    }
}
