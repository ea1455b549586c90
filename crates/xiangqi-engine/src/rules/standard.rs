//! Standard xiangqi rules implementation.

use super::{DrawReason, GameResult, RuleSet};
use crate::movegen::{has_legal_moves, is_in_check, legal_moves};
use crate::{Board, MoveList};
use xiangqi_core::Move;

/// Standard xiangqi rules:
/// - Palace, river, leg and eye restrictions
/// - Cannon screen captures
/// - The flying-general rule
/// - Checkmate and stalemate detection (stalemate is scored as a draw)
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardXiangqi;

impl RuleSet for StandardXiangqi {
    fn initial_board(&self) -> Board {
        Board::initial()
    }

    fn generate_moves(&self, board: &Board) -> MoveList {
        legal_moves(board)
    }

    fn make_move(&self, board: &Board, m: &Move) -> Board {
        board.make_move(m)
    }

    fn is_check(&self, board: &Board) -> bool {
        is_in_check(board, board.side_to_move())
    }

    fn game_result(&self, board: &Board) -> Option<GameResult> {
        if has_legal_moves(board) {
            return None;
        }

        if self.is_check(board) {
            Some(GameResult::checkmated(board.side_to_move()))
        } else {
            Some(GameResult::Draw(DrawReason::Stalemate))
        }
    }
}
