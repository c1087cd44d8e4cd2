//! # Board State
//!
//! The width × height grid of piece slots and its coordinate math.
//!
//! Outside of resolution transients every cell holds exactly one piece. The
//! board is mutated only by the resolution engine (and by generation before a
//! session starts); everything else reads it.

use crate::game::{Piece, PieceType, Position};
use crate::generation::BoardGenerator;
use crate::{CascadeError, CascadeResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The board grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: i32,
    height: i32,
    /// Row-major slots, `y * width + x`, row 0 at the bottom
    cells: Vec<Option<Piece>>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::Board;
    ///
    /// let board = Board::new(8, 8).unwrap();
    /// assert_eq!(board.empty_count(), 64);
    /// assert!(board.get(0, 0).is_none());
    /// ```
    pub fn new(width: i32, height: i32) -> CascadeResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(CascadeError::InvalidConfig(format!(
                "board dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let cell_count = width.checked_mul(height).ok_or_else(|| {
            CascadeError::InvalidConfig(format!("board {}x{} is too large", width, height))
        })?;
        Ok(Self {
            width,
            height,
            cells: vec![None; cell_count as usize],
        })
    }

    /// Creates a fully populated board with no immediate 3-in-a-row.
    pub fn create_initial(
        width: i32,
        height: i32,
        color_count: usize,
        rng: &mut StdRng,
    ) -> CascadeResult<Self> {
        BoardGenerator::new(color_count).fill_initial(width, height, rng)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Bounds check.
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Bounds check for a [`Position`].
    pub fn contains(&self, position: Position) -> bool {
        self.is_valid_position(position.x, position.y)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.is_valid_position(x, y) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Returns the piece at a coordinate, or None when out of bounds or empty.
    pub fn get(&self, x: i32, y: i32) -> Option<&Piece> {
        self.index(x, y).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_at(&self, position: Position) -> Option<&Piece> {
        self.get(position.x, position.y)
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut Piece> {
        let index = self.index(position.x, position.y)?;
        self.cells[index].as_mut()
    }

    /// Type of the piece at a coordinate.
    pub fn type_at(&self, position: Position) -> Option<PieceType> {
        self.get_at(position).map(|piece| piece.piece_type)
    }

    /// Puts `piece` (or nothing) into a slot and returns the previous occupant.
    ///
    /// The stored piece's position is rewritten to the slot coordinate.
    /// Out-of-bounds writes are ignored and hand the piece back.
    pub fn set(&mut self, x: i32, y: i32, piece: Option<Piece>) -> Option<Piece> {
        match self.index(x, y) {
            Some(index) => {
                let piece = piece.map(|mut piece| {
                    piece.position = Position::new(x, y);
                    piece
                });
                std::mem::replace(&mut self.cells[index], piece)
            }
            None => piece,
        }
    }

    /// Empties a slot, returning its piece.
    pub fn take(&mut self, position: Position) -> Option<Piece> {
        let index = self.index(position.x, position.y)?;
        self.cells[index].take()
    }

    /// Exchanges two slots and updates both pieces' coordinates.
    pub fn swap_cells(&mut self, a: Position, b: Position) -> CascadeResult<()> {
        let (ia, ib) = match (self.index(a.x, a.y), self.index(b.x, b.y)) {
            (Some(ia), Some(ib)) => (ia, ib),
            _ => {
                return Err(CascadeError::InvalidState(format!(
                    "cannot swap {} and {} on a {}x{} board",
                    a, b, self.width, self.height
                )))
            }
        };
        self.cells.swap(ia, ib);
        if let Some(piece) = self.cells[ia].as_mut() {
            piece.position = a;
        }
        if let Some(piece) = self.cells[ib].as_mut() {
            piece.position = b;
        }
        Ok(())
    }

    /// All coordinates, column by column from the bottom.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| Position::new(x, y)))
    }

    /// All pieces currently on the board.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Snapshot of coordinate → type, used to compare boards by content.
    pub fn type_map(&self) -> BTreeMap<Position, PieceType> {
        self.pieces()
            .map(|piece| (piece.position, piece.piece_type))
            .collect()
    }

    /// Builds a board from text, top row first.
    ///
    /// Symbols: `R B G Y P O` plain, `r b g y p o` striped, `*` bomb,
    /// `-` row clear, `|` column clear, `.` empty. Whitespace inside a row
    /// is ignored and blank lines are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{Board, PieceColor, PieceType};
    ///
    /// let board = Board::parse("RGB\nGBR").unwrap();
    /// assert_eq!(board.width(), 3);
    /// assert_eq!(board.get(0, 0).unwrap().piece_type, PieceType::Plain(PieceColor::Green));
    /// assert_eq!(board.get(0, 1).unwrap().piece_type, PieceType::Plain(PieceColor::Red));
    /// ```
    pub fn parse(text: &str) -> CascadeResult<Self> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        let height = rows.len() as i32;
        let width = rows.first().map(|row| row.len()).unwrap_or(0) as i32;
        if rows.iter().any(|row| row.len() as i32 != width) {
            return Err(CascadeError::Parse(
                "board rows must all have the same length".to_string(),
            ));
        }

        let mut board = Board::new(width, height)?;
        for (row_index, row) in rows.iter().enumerate() {
            let y = height - 1 - row_index as i32;
            for (x, &symbol) in row.iter().enumerate() {
                if symbol == '.' {
                    continue;
                }
                let piece_type = PieceType::from_symbol(symbol).ok_or_else(|| {
                    CascadeError::Parse(format!("unknown piece symbol '{}'", symbol))
                })?;
                board.set(x as i32, y, Some(Piece::new(piece_type, Position::new(x as i32, y))));
            }
        }
        Ok(board)
    }
}
