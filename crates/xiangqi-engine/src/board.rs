//! Xiangqi board representation.

use std::fmt;

use thiserror::Error;
use xiangqi_core::{Color, FenError, FenParser, Move, Piece, PieceKind, Position, COLS, SQUARES};

use crate::zobrist::ZOBRIST;

/// Errors raised when building a board from external input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{0} has more than one general")]
    TooManyGenerals(Color),

    #[error("illegal placement: {0}")]
    IllegalPlacement(Piece),
}

/// A full board: one optional piece per point plus the side to move.
///
/// `Board` is a plain value. Search works on its own copies; the live game
/// board is owned by the caller and is only changed through
/// [`Board::apply_move_in_place`].
///
/// The Zobrist hash is maintained incrementally by every mutation.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; SQUARES],
    side_to_move: Color,
    hash: u64,
}

impl Board {
    /// Creates an empty board with Red to move.
    pub fn empty() -> Self {
        Board {
            squares: [None; SQUARES],
            side_to_move: Color::Red,
            hash: 0,
        }
    }

    /// Creates the standard 32-piece starting layout, Red to move.
    pub fn initial() -> Self {
        const BACK_ROW: [PieceKind; 9] = [
            PieceKind::Chariot,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Chariot,
        ];

        let mut board = Board::empty();
        for color in Color::ALL {
            let back = color.back_row();
            let cannon_row = back + 2 * color.forward();
            let soldier_row = back + 3 * color.forward();
            for (col, kind) in BACK_ROW.iter().enumerate() {
                board.put(Piece::new(*kind, color, Position::new(back, col as i8)));
            }
            for col in [1, 7] {
                board.put(Piece::new(
                    PieceKind::Cannon,
                    color,
                    Position::new(cannon_row, col),
                ));
            }
            for col in [0, 2, 4, 6, 8] {
                board.put(Piece::new(
                    PieceKind::Soldier,
                    color,
                    Position::new(soldier_row, col),
                ));
            }
        }
        board
    }

    /// Creates a board from a FEN string and checks its placement invariants.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let parsed = FenParser::parse(fen)?;
        let mut board = Board::empty();

        for (row, row_str) in parsed.piece_placement.split('/').enumerate() {
            let mut col = 0i8;
            for c in row_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    col += digit as i8;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    board.put(Piece::new(kind, color, Position::new(row as i8, col)));
                    col += 1;
                }
            }
        }

        board.set_side_to_move(parsed.active_color);
        board.validate()?;
        Ok(board)
    }

    /// Converts the board to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();

        for row in 0..10 {
            let mut empty_count = 0;
            for col in 0..COLS {
                match self.piece_at(Position::new(row, col)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            placement.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                placement.push_str(&empty_count.to_string());
            }
            if row < 9 {
                placement.push('/');
            }
        }

        FenParser {
            piece_placement: placement,
            active_color: self.side_to_move,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
        .to_fen()
    }

    /// Checks the placement invariants: at most one general per side,
    /// generals and advisors inside their palace, elephants on their own
    /// half and soldiers never behind their starting row.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let generals = self
                .pieces_of(color)
                .filter(|p| p.kind == PieceKind::General)
                .count();
            if generals > 1 {
                return Err(BoardError::TooManyGenerals(color));
            }
        }

        for piece in self.pieces() {
            let pos = piece.position;
            let ok = match piece.kind {
                PieceKind::General | PieceKind::Advisor => pos.in_palace(piece.color),
                PieceKind::Elephant => piece.color.home_rows().contains(&pos.row),
                PieceKind::Soldier => {
                    let start_row = piece.color.back_row() + 3 * piece.color.forward();
                    (pos.row - start_row) * piece.color.forward() >= 0
                }
                PieceKind::Horse | PieceKind::Chariot | PieceKind::Cannon => true,
            };
            if !ok {
                return Err(BoardError::IllegalPlacement(piece));
            }
        }

        Ok(())
    }

    /// Returns the piece at `pos`, if any. Points off the board are empty.
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[pos.index()]
        } else {
            None
        }
    }

    /// Returns true if a piece stands on `pos`.
    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.piece_at(pos).is_some()
    }

    /// Places a piece on its point, returning whatever stood there before.
    pub fn put(&mut self, piece: Piece) -> Option<Piece> {
        let previous = self.remove(piece.position);
        self.squares[piece.position.index()] = Some(piece);
        self.hash ^= ZOBRIST.piece_key(piece.kind, piece.color, piece.position);
        previous
    }

    /// Builder form of [`Board::put`].
    pub fn with_piece(mut self, piece: Piece) -> Self {
        self.put(piece);
        self
    }

    /// Removes and returns the piece on `pos`.
    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        if !pos.is_valid() {
            return None;
        }
        let piece = self.squares[pos.index()].take()?;
        self.hash ^= ZOBRIST.piece_key(piece.kind, piece.color, pos);
        Some(piece)
    }

    /// Iterates over all pieces in point order.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.squares.iter().flatten().copied()
    }

    /// Iterates over the pieces of one color in point order.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |p| p.color == color)
    }

    /// Returns the number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    /// Returns the point of `color`'s general, or `None` if it has been captured.
    pub fn general(&self, color: Color) -> Option<Position> {
        let rows = color.palace_rows();
        for row in rows {
            for col in 3..=5 {
                let pos = Position::new(row, col);
                if let Some(piece) = self.squares[pos.index()] {
                    if piece.kind == PieceKind::General && piece.color == color {
                        return Some(pos);
                    }
                }
            }
        }
        None
    }

    /// The side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Sets the side to move.
    pub fn set_side_to_move(&mut self, color: Color) {
        self.hash ^= ZOBRIST.side_key(self.side_to_move) ^ ZOBRIST.side_key(color);
        self.side_to_move = color;
    }

    /// Returns a new board with `m` applied. The side to move is **unchanged**.
    ///
    /// The source point is cleared and the destination holds the moved piece;
    /// whatever stood on the destination is removed. Used to simulate a move
    /// when only the resulting placement matters (legality tests).
    pub fn apply_move(&self, m: &Move) -> Board {
        let mut next = self.clone();
        next.relocate(m);
        next
    }

    /// Returns a new board with `m` applied and the turn passed to the opponent.
    pub fn make_move(&self, m: &Move) -> Board {
        let mut next = self.apply_move(m);
        next.set_side_to_move(self.side_to_move.opposite());
        next
    }

    /// Applies `m` to this board and passes the turn to the opponent.
    ///
    /// Meant for committing real game moves; search never calls it.
    pub fn apply_move_in_place(&mut self, m: &Move) {
        self.relocate(m);
        self.set_side_to_move(self.side_to_move.opposite());
    }

    fn relocate(&mut self, m: &Move) {
        self.remove(m.from);
        self.put(m.piece.moved_to(m.to));
    }

    /// The Zobrist hash of this board.
    #[inline]
    pub fn position_hash(&self) -> u64 {
        self.hash
    }

    /// Recomputes the Zobrist hash from scratch.
    pub fn compute_hash(&self) -> u64 {
        self.pieces().fold(ZOBRIST.side_key(self.side_to_move), |hash, p| {
            hash ^ ZOBRIST.piece_key(p.kind, p.color, p.position)
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..10 {
            if row == 5 {
                writeln!(f, "   ~~~~~~~~~~~~~~~~~")?;
            }
            write!(f, "{} ", row)?;
            for col in 0..COLS {
                let c = self
                    .piece_at(Position::new(row, col))
                    .map_or('.', |p| p.to_fen_char());
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   0 1 2 3 4 5 6 7 8  ({} to move)", self.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_fen() {
        assert_eq!(Board::initial().to_fen(), FenParser::STARTPOS);
    }

    #[test]
    fn fen_roundtrip() {
        let fen = "r1bakabnr/9/1cn4c1/p1p1p1p1p/9/9/P1P1P1P1P/1C2C1N2/9/RNBAKAB1R w - - 0 1";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn initial_layout() {
        let board = Board::initial();
        assert_eq!(board.piece_count(), 32);
        assert_eq!(board.side_to_move(), Color::Red);
        assert_eq!(board.general(Color::Red), Some(Position::new(9, 4)));
        assert_eq!(board.general(Color::Black), Some(Position::new(0, 4)));
        assert_eq!(
            board.piece_at(Position::new(7, 1)).map(|p| p.kind),
            Some(PieceKind::Cannon)
        );
        assert_eq!(
            board.piece_at(Position::new(3, 8)),
            Some(Piece::new(
                PieceKind::Soldier,
                Color::Black,
                Position::new(3, 8)
            ))
        );
        assert_eq!(board.pieces_of(Color::Red).count(), 16);
    }

    #[test]
    fn off_board_is_empty() {
        let board = Board::initial();
        assert_eq!(board.piece_at(Position::new(-1, 0)), None);
        assert_eq!(board.piece_at(Position::new(10, 0)), None);
    }

    #[test]
    fn apply_move_keeps_side() {
        let board = Board::initial();
        let cannon = board.piece_at(Position::new(7, 1)).unwrap();
        let m = Move::new(cannon.position, Position::new(7, 4), cannon, None);

        let next = board.apply_move(&m);
        assert_eq!(next.side_to_move(), Color::Red);
        assert_eq!(next.piece_at(Position::new(7, 1)), None);
        assert_eq!(
            next.piece_at(Position::new(7, 4)),
            Some(cannon.moved_to(Position::new(7, 4)))
        );
        // the original board is untouched
        assert_eq!(board.piece_at(Position::new(7, 1)), Some(cannon));
    }

    #[test]
    fn make_move_and_in_place_flip_side() {
        let board = Board::initial();
        let cannon = board.piece_at(Position::new(7, 1)).unwrap();
        let m = Move::new(cannon.position, Position::new(7, 4), cannon, None);

        let next = board.make_move(&m);
        assert_eq!(next.side_to_move(), Color::Black);

        let mut live = board.clone();
        live.apply_move_in_place(&m);
        assert_eq!(live, next);
    }

    #[test]
    fn capture_removes_victim() {
        let board = Board::initial();
        let cannon = board.piece_at(Position::new(7, 1)).unwrap();
        let victim = board.piece_at(Position::new(0, 1)).unwrap();
        let m = Move::new(cannon.position, victim.position, cannon, Some(victim));

        let next = board.make_move(&m);
        assert_eq!(next.piece_count(), 31);
        assert_eq!(
            next.piece_at(Position::new(0, 1)).map(|p| (p.kind, p.color)),
            Some((PieceKind::Cannon, Color::Red))
        );
    }

    #[test]
    fn incremental_hash_matches_recomputed() {
        let board = Board::initial();
        assert_eq!(board.position_hash(), board.compute_hash());

        let cannon = board.piece_at(Position::new(7, 1)).unwrap();
        let victim = board.piece_at(Position::new(0, 1)).unwrap();
        let next = board.make_move(&Move::new(
            cannon.position,
            victim.position,
            cannon,
            Some(victim),
        ));
        assert_eq!(next.position_hash(), next.compute_hash());
        assert_ne!(next.position_hash(), board.position_hash());
    }

    #[test]
    fn side_to_move_changes_hash() {
        let red = Board::initial();
        let mut black = Board::initial();
        black.set_side_to_move(Color::Black);
        assert_ne!(red.position_hash(), black.position_hash());
        black.set_side_to_move(Color::Red);
        assert_eq!(red.position_hash(), black.position_hash());
    }

    #[test]
    fn validate_rejects_second_general() {
        let result = Board::from_fen("3kk4/9/9/9/9/9/9/9/9/4K4 w");
        assert_eq!(result, Err(BoardError::TooManyGenerals(Color::Black)));
    }

    #[test]
    fn validate_rejects_general_outside_palace() {
        let result = Board::from_fen("k8/9/9/9/9/9/9/9/9/4K4 w");
        assert!(matches!(result, Err(BoardError::IllegalPlacement(_))));
    }

    #[test]
    fn validate_rejects_elephant_across_river() {
        let result = Board::from_fen("4k4/9/9/9/2B6/9/9/9/9/4K4 w");
        assert!(matches!(result, Err(BoardError::IllegalPlacement(_))));
    }

    #[test]
    fn validate_rejects_soldier_behind_start() {
        let result = Board::from_fen("4k4/9/9/9/9/9/9/P8/9/4K4 w");
        assert!(matches!(result, Err(BoardError::IllegalPlacement(_))));
        let result = Board::from_fen("4k4/9/p8/9/9/9/9/9/9/4K4 w");
        assert!(matches!(result, Err(BoardError::IllegalPlacement(_))));

        // On the starting row or further forward is fine.
        assert!(Board::from_fen("3k5/9/9/p8/9/9/P8/9/9/4K4 w").is_ok());
        assert!(Board::from_fen("3k5/9/9/P8/9/9/p8/9/9/4K4 w").is_ok());
    }

    #[test]
    fn initial_rows_per_side() {
        let board = Board::initial();
        assert_eq!(board.validate(), Ok(()));
        for (color, cannon_row, soldier_row) in [(Color::Red, 7, 6), (Color::Black, 2, 3)] {
            for col in [1, 7] {
                assert_eq!(
                    board.piece_at(Position::new(cannon_row, col)),
                    Some(Piece::new(PieceKind::Cannon, color, Position::new(cannon_row, col)))
                );
            }
            for col in [0, 2, 4, 6, 8] {
                assert_eq!(
                    board.piece_at(Position::new(soldier_row, col)),
                    Some(Piece::new(PieceKind::Soldier, color, Position::new(soldier_row, col)))
                );
            }
        }
    }

    #[test]
    fn fen_errors_propagate() {
        assert!(matches!(
            Board::from_fen("bogus"),
            Err(BoardError::Fen(FenError::InvalidPartCount(1)))
        ));
    }

    #[test]
    fn display_draws_river() {
        let text = Board::initial().to_string();
        assert!(text.contains("~~~"));
        assert!(text.contains("Red to move"));
    }
}
