//! # Game Module
//!
//! Core board simulation: pieces, the grid, match detection, special pieces
//! and the resolution engine that ties them together.
//!
//! This module contains the fundamental building blocks of the engine:
//! - Piece types and identity
//! - Board state and grid coordinate math
//! - Match detection and special-piece rules
//! - The swap/cascade state machine and the session coordinator

pub mod board;
pub mod engine;
pub mod matching;
pub mod piece;
pub mod specials;
pub mod state;

pub use board::*;
pub use engine::*;
pub use matching::*;
pub use piece::*;
pub use specials::*;
pub use state::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a grid coordinate on the board.
///
/// `y = 0` is the bottom row; gravity pulls pieces toward decreasing `y`.
///
/// # Examples
///
/// ```
/// use cascade::Position;
///
/// let pos = Position::new(3, 4);
/// assert_eq!(pos.x, 3);
/// assert_eq!(pos.y, 4);
///
/// let neighbors = pos.cardinal_adjacent_positions();
/// assert_eq!(neighbors.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Returns true when `other` is one of the 4 orthogonal neighbors.
    pub fn is_adjacent_to(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Returns the 4 orthogonal neighbors (no diagonals, no bounds check).
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        Direction::all()
            .into_iter()
            .map(|direction| self.offset(direction, 1))
            .collect()
    }

    /// Moves `distance` cells in `direction`.
    pub fn offset(self, direction: Direction, distance: i32) -> Position {
        let delta = direction.to_delta();
        Position::new(self.x + delta.x * distance, self.y + delta.y * distance)
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orthogonal directions on the board. `Up` points toward increasing `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{Direction, Position};
    ///
    /// assert_eq!(Direction::Up.to_delta(), Position::new(0, 1));
    /// assert_eq!(Direction::Left.to_delta(), Position::new(-1, 0));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::Up => Position::new(0, 1),
            Direction::Down => Position::new(0, -1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }

    /// Returns all 4 directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }
}

/// Unique identifier for pieces.
pub type PieceId = Uuid;

/// Creates a new unique piece ID.
pub fn new_piece_id() -> PieceId {
    Uuid::new_v4()
}
