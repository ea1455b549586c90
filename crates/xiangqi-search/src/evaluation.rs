//! Static evaluation.
//!
//! Scores are from Red's point of view: positive favors Red. The score is
//! material plus piece-square tables, a mobility term, a center-file bonus
//! and a small penalty for being in check. A checkmated side to move
//! overrides everything with [`CHECKMATE_SCORE`].

use xiangqi_core::{Color, Piece, PieceKind};
use xiangqi_engine::{has_legal_moves, is_in_check, mobility, Board};

/// Magnitude of a checkmate score.
pub const CHECKMATE_SCORE: i32 = 100_000;

/// Penalty applied to a side whose general is in check.
const CHECK_PENALTY: i32 = 50;

/// Weight of each pseudo-legal move of difference between the sides.
const MOBILITY_WEIGHT: i32 = 2;

/// Piece-square tables, indexed `[row][col]` as seen by Red. Black pieces
/// look up the mirrored row `9 - row`.
const GENERAL_PST: [[i32; 9]; 10] = [
    [0, 0, 0, 8, 9, 8, 0, 0, 0],
    [0, 0, 0, 9, 9, 9, 0, 0, 0],
    [0, 0, 0, 8, 9, 8, 0, 0, 0],
    [0; 9],
    [0; 9],
    [0; 9],
    [0; 9],
    [0, 0, 0, 8, 9, 8, 0, 0, 0],
    [0, 0, 0, 9, 9, 9, 0, 0, 0],
    [0, 0, 0, 8, 9, 8, 0, 0, 0],
];

const ADVISOR_PST: [[i32; 9]; 10] = [
    [0, 0, 0, 20, 0, 20, 0, 0, 0],
    [0, 0, 0, 0, 23, 0, 0, 0, 0],
    [0, 0, 0, 20, 0, 20, 0, 0, 0],
    [0; 9],
    [0; 9],
    [0; 9],
    [0; 9],
    [0, 0, 0, 20, 0, 20, 0, 0, 0],
    [0, 0, 0, 0, 23, 0, 0, 0, 0],
    [0, 0, 0, 20, 0, 20, 0, 0, 0],
];

const ELEPHANT_PST: [[i32; 9]; 10] = [
    [0, 0, 20, 0, 0, 0, 20, 0, 0],
    [0; 9],
    [18, 0, 0, 0, 23, 0, 0, 0, 18],
    [0; 9],
    [0, 0, 20, 0, 0, 0, 20, 0, 0],
    [0, 0, 20, 0, 0, 0, 20, 0, 0],
    [0; 9],
    [18, 0, 0, 0, 23, 0, 0, 0, 18],
    [0; 9],
    [0, 0, 20, 0, 0, 0, 20, 0, 0],
];

const HORSE_PST: [[i32; 9]; 10] = [
    [90, 90, 90, 96, 90, 96, 90, 90, 90],
    [90, 96, 103, 97, 94, 97, 103, 96, 90],
    [92, 98, 99, 103, 99, 103, 99, 98, 92],
    [93, 108, 100, 107, 100, 107, 100, 108, 93],
    [90, 100, 99, 103, 104, 103, 99, 100, 90],
    [90, 98, 101, 102, 103, 102, 101, 98, 90],
    [92, 94, 98, 95, 98, 95, 98, 94, 92],
    [93, 92, 94, 95, 92, 95, 94, 92, 93],
    [85, 90, 92, 93, 78, 93, 92, 90, 85],
    [88, 85, 90, 88, 90, 88, 90, 85, 88],
];

const CHARIOT_PST: [[i32; 9]; 10] = [
    [206, 208, 207, 213, 214, 213, 207, 208, 206],
    [206, 212, 209, 216, 233, 216, 209, 212, 206],
    [206, 208, 207, 214, 216, 214, 207, 208, 206],
    [206, 213, 213, 216, 216, 216, 213, 213, 206],
    [208, 211, 211, 214, 215, 214, 211, 211, 208],
    [208, 212, 212, 214, 215, 214, 212, 212, 208],
    [204, 209, 204, 212, 214, 212, 204, 209, 204],
    [198, 208, 204, 212, 212, 212, 204, 208, 198],
    [200, 208, 206, 212, 200, 212, 206, 208, 200],
    [194, 206, 204, 212, 200, 212, 204, 206, 194],
];

const CANNON_PST: [[i32; 9]; 10] = [
    [100, 100, 96, 91, 90, 91, 96, 100, 100],
    [98, 98, 96, 92, 89, 92, 96, 98, 98],
    [97, 97, 96, 91, 92, 91, 96, 97, 97],
    [96, 99, 99, 98, 100, 98, 99, 99, 96],
    [96, 96, 96, 96, 100, 96, 96, 96, 96],
    [95, 96, 99, 96, 100, 96, 99, 96, 95],
    [96; 9],
    [97, 96, 100, 99, 101, 99, 100, 96, 97],
    [96, 97, 98, 98, 98, 98, 98, 97, 96],
    [96, 96, 97, 99, 99, 99, 97, 96, 96],
];

const SOLDIER_PST: [[i32; 9]; 10] = [
    [9, 9, 9, 11, 13, 11, 9, 9, 9],
    [19, 24, 34, 42, 44, 42, 34, 24, 19],
    [19, 24, 32, 37, 37, 37, 32, 24, 19],
    [19, 23, 27, 29, 30, 29, 27, 23, 19],
    [14, 18, 20, 27, 29, 27, 20, 18, 14],
    [7, 0, 13, 0, 16, 0, 13, 0, 7],
    [7, 0, 7, 0, 15, 0, 7, 0, 7],
    [0; 9],
    [0; 9],
    [0; 9],
];

/// Tables indexed by [`PieceKind::index`].
const PST: [&[[i32; 9]; 10]; 7] = [
    &GENERAL_PST,
    &ADVISOR_PST,
    &ELEPHANT_PST,
    &HORSE_PST,
    &CHARIOT_PST,
    &CANNON_PST,
    &SOLDIER_PST,
];

/// Positional bonus of a piece on its current point.
#[inline]
pub fn positional_value(piece: Piece) -> i32 {
    let row = match piece.color {
        Color::Red => piece.position.row,
        Color::Black => 9 - piece.position.row,
    };
    PST[piece.kind.index()][row as usize][piece.position.col as usize]
}

/// Bonus for standing on one of the three center files.
#[inline]
fn center_bonus(piece: Piece) -> i32 {
    if !piece.position.on_center_file() {
        return 0;
    }
    match piece.kind {
        PieceKind::Horse | PieceKind::Chariot | PieceKind::Cannon => 5,
        PieceKind::Soldier => 3,
        PieceKind::General | PieceKind::Advisor | PieceKind::Elephant => 0,
    }
}

/// Evaluates the board from Red's point of view.
pub fn evaluate(board: &Board) -> i32 {
    let red_in_check = is_in_check(board, Color::Red);
    let black_in_check = is_in_check(board, Color::Black);

    let side = board.side_to_move();
    let side_in_check = match side {
        Color::Red => red_in_check,
        Color::Black => black_in_check,
    };
    if side_in_check && !has_legal_moves(board) {
        return -side.sign() * CHECKMATE_SCORE;
    }

    let mut score = 0i32;

    for piece in board.pieces() {
        let value = piece.value() + positional_value(piece) + center_bonus(piece);
        score += piece.color.sign() * value;
    }

    let red_mobility = mobility(board, Color::Red) as i32;
    let black_mobility = mobility(board, Color::Black) as i32;
    score += MOBILITY_WEIGHT * (red_mobility - black_mobility);

    if red_in_check {
        score -= CHECK_PENALTY;
    }
    if black_in_check {
        score += CHECK_PENALTY;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiangqi_core::Position;

    #[test]
    fn initial_board_is_balanced() {
        assert_eq!(evaluate(&Board::initial()), 0);
    }

    #[test]
    fn evaluation_ignores_side_to_move() {
        let mut board = Board::initial();
        board.set_side_to_move(Color::Black);
        assert_eq!(evaluate(&board), 0);
    }

    #[test]
    fn mirrored_tables() {
        let red = Piece::new(PieceKind::Soldier, Color::Red, Position::new(1, 4));
        let black = Piece::new(PieceKind::Soldier, Color::Black, Position::new(8, 4));
        assert_eq!(positional_value(red), 44);
        assert_eq!(positional_value(black), 44);

        let horse = Piece::new(PieceKind::Horse, Color::Red, Position::new(8, 4));
        assert_eq!(positional_value(horse), 78);
    }

    #[test]
    fn extra_chariot_favors_its_owner() {
        let base = "4k4/9/9/9/9/9/9/9/9/3K5";
        let balanced = Board::from_fen(&format!("{base} w")).unwrap();
        let red_up = Board::from_fen("4k4/9/9/9/9/9/9/9/9/R2K5 w").unwrap();
        let black_up = Board::from_fen("r3k4/9/9/9/9/9/9/9/9/3K5 w").unwrap();

        assert!(evaluate(&red_up) > evaluate(&balanced) + 800);
        assert!(evaluate(&black_up) < evaluate(&balanced) - 800);
    }

    #[test]
    fn checkmate_overrides() {
        // Black to move and mated by two chariots.
        let board = Board::from_fen("R3k4/R8/9/9/9/9/9/9/9/3K5 b").unwrap();
        assert_eq!(evaluate(&board), CHECKMATE_SCORE);

        // Red to move and mated by two chariots.
        let board = Board::from_fen("5k3/9/9/9/9/9/9/9/r8/r3K4 w").unwrap();
        assert_eq!(evaluate(&board), -CHECKMATE_SCORE);
    }

    #[test]
    fn check_penalty_applies() {
        // Black in check from the chariot but able to escape.
        let checked = Board::from_fen("3k5/9/9/9/9/9/9/9/9/3R1K3 b").unwrap();
        let quiet = Board::from_fen("3k5/9/9/9/9/9/9/9/9/2R2K3 b").unwrap();

        let chariot_delta = positional_value(Piece::new(
            PieceKind::Chariot,
            Color::Red,
            Position::new(9, 3),
        )) - positional_value(Piece::new(
            PieceKind::Chariot,
            Color::Red,
            Position::new(9, 2),
        ));
        let mobility_delta = MOBILITY_WEIGHT
            * ((mobility(&checked, Color::Red) as i32 - mobility(&checked, Color::Black) as i32)
                - (mobility(&quiet, Color::Red) as i32 - mobility(&quiet, Color::Black) as i32));

        assert_eq!(
            evaluate(&checked) - evaluate(&quiet),
            CHECK_PENALTY + chariot_delta + 5 + mobility_delta
        );
    }
}
