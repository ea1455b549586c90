//! Xiangqi piece representation.

use crate::{Color, Position};

/// The seven kinds of xiangqi pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    General = 0,
    Advisor = 1,
    Elephant = 2,
    Horse = 3,
    Chariot = 4,
    Cannon = 5,
    Soldier = 6,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    /// Returns the index of this kind (0-6).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Fixed material value.
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::General => 10_000,
            PieceKind::Advisor => 120,
            PieceKind::Elephant => 120,
            PieceKind::Horse => 400,
            PieceKind::Chariot => 900,
            PieceKind::Cannon => 450,
            PieceKind::Soldier => 100,
        }
    }

    /// Returns the FEN character for this kind with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        };
        match color {
            Color::Red => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a kind and color.
    ///
    /// Accepts the common aliases `e` (elephant) and `h` (horse).
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::Red
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::General,
            'a' => PieceKind::Advisor,
            'b' | 'e' => PieceKind::Elephant,
            'n' | 'h' => PieceKind::Horse,
            'r' => PieceKind::Chariot,
            'c' => PieceKind::Cannon,
            'p' => PieceKind::Soldier,
            _ => return None,
        };
        Some((kind, color))
    }

    /// Letter used by WXF notation.
    pub const fn wxf_char(self) -> char {
        match self {
            PieceKind::General => 'K',
            PieceKind::Advisor => 'A',
            PieceKind::Elephant => 'E',
            PieceKind::Horse => 'H',
            PieceKind::Chariot => 'R',
            PieceKind::Cannon => 'C',
            PieceKind::Soldier => 'P',
        }
    }

    /// Traditional character for this kind on the given side.
    pub const fn chinese_char(self, color: Color) -> char {
        match (self, color) {
            (PieceKind::General, Color::Red) => '帅',
            (PieceKind::General, Color::Black) => '将',
            (PieceKind::Advisor, Color::Red) => '仕',
            (PieceKind::Advisor, Color::Black) => '士',
            (PieceKind::Elephant, Color::Red) => '相',
            (PieceKind::Elephant, Color::Black) => '象',
            (PieceKind::Horse, _) => '馬',
            (PieceKind::Chariot, _) => '車',
            (PieceKind::Cannon, _) => '砲',
            (PieceKind::Soldier, Color::Red) => '兵',
            (PieceKind::Soldier, Color::Black) => '卒',
        }
    }

    /// Returns true for kinds that move along ranks and files
    /// (General, Chariot, Cannon, Soldier).
    #[inline]
    pub const fn moves_orthogonally(self) -> bool {
        matches!(
            self,
            PieceKind::General | PieceKind::Chariot | PieceKind::Cannon | PieceKind::Soldier
        )
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::General => "General",
            PieceKind::Advisor => "Advisor",
            PieceKind::Elephant => "Elephant",
            PieceKind::Horse => "Horse",
            PieceKind::Chariot => "Chariot",
            PieceKind::Cannon => "Cannon",
            PieceKind::Soldier => "Soldier",
        };
        write!(f, "{}", name)
    }
}

/// A piece standing on a particular point.
///
/// Pieces are values: moving one produces a new `Piece` via [`Piece::moved_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Position,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color, position: Position) -> Self {
        Piece {
            kind,
            color,
            position,
        }
    }

    /// Returns the same piece standing on `position`.
    #[inline]
    pub const fn moved_to(self, position: Position) -> Self {
        Piece { position, ..self }
    }

    /// Material value of the piece.
    #[inline]
    pub const fn value(self) -> i32 {
        self.kind.value()
    }

    /// Returns the FEN character of the piece.
    #[inline]
    pub const fn to_fen_char(self) -> char {
        self.kind.to_fen_char(self.color)
    }

    /// Returns the traditional character of the piece.
    #[inline]
    pub const fn chinese_char(self) -> char {
        self.kind.chinese_char(self.color)
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.color, self.kind, self.position)
    }
}
