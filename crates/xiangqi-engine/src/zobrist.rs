//! Zobrist hashing for position identification.
//!
//! A board's hash is the XOR of one random key per occupied point, keyed by
//! (piece kind, color, point), plus a key when Black is to move:
//! - 7 kinds × 2 colors × 90 points = 1260 piece keys
//! - 1 side-to-move key
//!
//! XOR makes the hash incremental: moving a piece removes its old key and
//! adds its new one.

use xiangqi_core::{Color, PieceKind, Position, SQUARES};

/// Zobrist hash keys.
///
/// Generated using a fixed seed for reproducibility.
pub struct ZobristKeys {
    /// Keys for pieces: [kind][color][point]
    pub pieces: [[[u64; SQUARES]; 2]; 7],
    /// Key for black to move (XOR when black to move).
    pub black_to_move: u64,
}

impl ZobristKeys {
    /// Initializes Zobrist keys using a simple PRNG.
    ///
    /// Uses a fixed seed for reproducibility across runs.
    pub const fn new() -> Self {
        // xorshift64
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E3779B97F4A7C15u64;
        let mut pieces = [[[0u64; SQUARES]; 2]; 7];

        let mut kind = 0;
        while kind < 7 {
            let mut color = 0;
            while color < 2 {
                let mut point = 0;
                while point < SQUARES {
                    state = next_random(state);
                    pieces[kind][color][point] = state;
                    point += 1;
                }
                color += 1;
            }
            kind += 1;
        }

        let black_to_move = next_random(state);

        ZobristKeys {
            pieces,
            black_to_move,
        }
    }

    /// Returns the key for a piece on a point.
    #[inline]
    pub const fn piece_key(&self, kind: PieceKind, color: Color, position: Position) -> u64 {
        self.pieces[kind.index()][color.index()][position.index()]
    }

    /// Returns the side-to-move contribution for `color`.
    #[inline]
    pub const fn side_key(&self, color: Color) -> u64 {
        match color {
            Color::Red => 0,
            Color::Black => self.black_to_move,
        }
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn zobrist_keys_are_nonzero() {
        assert_ne!(ZOBRIST.black_to_move, 0);
        assert_ne!(ZOBRIST.pieces[0][0][0], 0);
        assert_ne!(ZOBRIST.pieces[6][1][89], 0);
    }

    #[test]
    fn zobrist_keys_are_unique() {
        let mut seen = HashSet::new();
        for kind in PieceKind::ALL {
            for color in Color::ALL {
                for pos in Position::all() {
                    assert!(seen.insert(ZOBRIST.piece_key(kind, color, pos)));
                }
            }
        }
        assert!(seen.insert(ZOBRIST.black_to_move));
    }

    #[test]
    fn red_to_move_has_no_side_key() {
        assert_eq!(ZOBRIST.side_key(Color::Red), 0);
        assert_eq!(ZOBRIST.side_key(Color::Black), ZOBRIST.black_to_move);
    }
}
