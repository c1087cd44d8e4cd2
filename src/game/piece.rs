//! # Pieces
//!
//! The content of a single board cell: its type, identity and grid position.

use crate::game::{new_piece_id, PieceId, Position};
use serde::{Deserialize, Serialize};

/// The six base colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl PieceColor {
    /// All base colors in generation order.
    pub const ALL: [PieceColor; 6] = [
        PieceColor::Red,
        PieceColor::Blue,
        PieceColor::Green,
        PieceColor::Yellow,
        PieceColor::Purple,
        PieceColor::Orange,
    ];

    /// The first `count` colors, clamped to the available palette.
    pub fn palette(count: usize) -> &'static [PieceColor] {
        &Self::ALL[..count.min(Self::ALL.len())]
    }

    /// Uppercase letter used by the text board format.
    pub fn letter(self) -> char {
        match self {
            PieceColor::Red => 'R',
            PieceColor::Blue => 'B',
            PieceColor::Green => 'G',
            PieceColor::Yellow => 'Y',
            PieceColor::Purple => 'P',
            PieceColor::Orange => 'O',
        }
    }

    /// Parses an uppercase or lowercase color letter.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'R' => Some(PieceColor::Red),
            'B' => Some(PieceColor::Blue),
            'G' => Some(PieceColor::Green),
            'Y' => Some(PieceColor::Yellow),
            'P' => Some(PieceColor::Purple),
            'O' => Some(PieceColor::Orange),
            _ => None,
        }
    }
}

/// What a cell holds.
///
/// Matching compares full types, so a striped red piece does not match a plain
/// red one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    /// Ordinary colored piece
    Plain(PieceColor),
    /// Clears its plus-shaped neighborhood when swapped
    Striped(PieceColor),
    /// Clears up to four cells in each orthogonal direction
    Bomb,
    /// Clears its whole row
    RowClear,
    /// Clears its whole column
    ColClear,
}

impl PieceType {
    /// Returns the plain type underlying this one.
    ///
    /// Striped pieces map to their plain color; every other type maps to itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{PieceColor, PieceType};
    ///
    /// let striped = PieceType::Striped(PieceColor::Red);
    /// assert_eq!(striped.base_type(), PieceType::Plain(PieceColor::Red));
    /// assert_eq!(PieceType::Bomb.base_type(), PieceType::Bomb);
    /// ```
    pub fn base_type(self) -> PieceType {
        match self {
            PieceType::Striped(color) => PieceType::Plain(color),
            other => other,
        }
    }

    /// The color of plain and striped pieces.
    pub fn color(self) -> Option<PieceColor> {
        match self {
            PieceType::Plain(color) | PieceType::Striped(color) => Some(color),
            _ => None,
        }
    }

    /// Striped variant of a colored type; Bomb/RowClear/ColClear are unchanged.
    pub fn striped(self) -> PieceType {
        match self.color() {
            Some(color) => PieceType::Striped(color),
            None => self,
        }
    }

    pub fn is_striped(self) -> bool {
        matches!(self, PieceType::Striped(_))
    }

    /// True for striped pieces and the three colorless specials.
    pub fn is_special(self) -> bool {
        !matches!(self, PieceType::Plain(_))
    }

    /// Single-character symbol used by the text board format.
    pub fn symbol(self) -> char {
        match self {
            PieceType::Plain(color) => color.letter(),
            PieceType::Striped(color) => color.letter().to_ascii_lowercase(),
            PieceType::Bomb => '*',
            PieceType::RowClear => '-',
            PieceType::ColClear => '|',
        }
    }

    /// Parses a symbol produced by [`PieceType::symbol`].
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '*' => Some(PieceType::Bomb),
            '-' => Some(PieceType::RowClear),
            '|' => Some(PieceType::ColClear),
            c if c.is_ascii_uppercase() => PieceColor::from_letter(c).map(PieceType::Plain),
            c if c.is_ascii_lowercase() => PieceColor::from_letter(c).map(PieceType::Striped),
            _ => None,
        }
    }
}

/// A piece on the board.
///
/// Pieces are created by the board generator or refill with a plain color, may
/// be promoted in place to a special type, and are destroyed by matches and
/// blasts. The identity survives promotion and movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Stable identity for the piece's whole lifetime
    pub id: PieceId,
    /// Current type
    pub piece_type: PieceType,
    /// Authoritative grid location
    pub position: Position,
}

impl Piece {
    /// Creates a piece with a fresh identity.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{Piece, PieceColor, PieceType, Position};
    ///
    /// let piece = Piece::new(PieceType::Plain(PieceColor::Blue), Position::new(2, 3));
    /// assert!(!piece.is_special());
    /// assert_eq!(piece.position, Position::new(2, 3));
    /// ```
    pub fn new(piece_type: PieceType, position: Position) -> Self {
        Self {
            id: new_piece_id(),
            piece_type,
            position,
        }
    }

    pub fn is_special(&self) -> bool {
        self.piece_type.is_special()
    }

    pub fn base_type(&self) -> PieceType {
        self.piece_type.base_type()
    }

    /// Re-initializes the piece in place with a new type, keeping its identity.
    pub fn promote(&mut self, piece_type: PieceType) {
        self.piece_type = piece_type;
    }
}
