//! # Board Mathematics
//!
//! Pure mapping between grid coordinates and world space.
//!
//! The board is centered on the world origin: cell `(x, y)` sits at
//! `origin + (x * spacing, y * spacing, 0)` where
//! `origin = -((width - 1) * spacing / 2, (height - 1) * spacing / 2, 0)`.

use crate::game::Position;
use crate::{CascadeError, CascadeResult};
use serde::{Deserialize, Serialize};

/// A point in presentation space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPosition {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the XY plane.
    pub fn planar_distance(self, other: WorldPosition) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Average of a set of points; the origin for an empty set.
    pub fn average<I>(points: I) -> WorldPosition
    where
        I: IntoIterator<Item = WorldPosition>,
    {
        let mut sum = WorldPosition::default();
        let mut count = 0usize;
        for point in points {
            sum.x += point.x;
            sum.y += point.y;
            sum.z += point.z;
            count += 1;
        }
        if count == 0 {
            return sum;
        }
        let n = count as f32;
        WorldPosition::new(sum.x / n, sum.y / n, sum.z / n)
    }
}

/// Placement of a board in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub width: i32,
    pub height: i32,
    pub spacing: f32,
}

impl BoardLayout {
    /// Creates a layout, rejecting non-positive sizes or spacing.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{BoardLayout, Position};
    ///
    /// let layout = BoardLayout::new(8, 8, 1.0).unwrap();
    /// let world = layout.grid_to_world(Position::new(0, 0));
    /// assert_eq!(world.x, -3.5);
    /// assert_eq!(layout.world_to_grid(world), Some(Position::new(0, 0)));
    /// ```
    pub fn new(width: i32, height: i32, spacing: f32) -> CascadeResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(CascadeError::InvalidConfig(format!(
                "board dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if !(spacing > 0.0 && spacing.is_finite()) {
            return Err(CascadeError::InvalidConfig(format!(
                "piece spacing must be positive, got {}",
                spacing
            )));
        }
        Ok(Self {
            width,
            height,
            spacing,
        })
    }

    /// World position of cell (0, 0); centers the board on the origin.
    pub fn origin(&self) -> WorldPosition {
        WorldPosition::new(
            -((self.width - 1) as f32 * self.spacing / 2.0),
            -((self.height - 1) as f32 * self.spacing / 2.0),
            0.0,
        )
    }

    /// Maps a grid coordinate to world space. Coordinates outside the board
    /// are mapped too; spawn points above the top row rely on that.
    pub fn grid_to_world(&self, position: Position) -> WorldPosition {
        let origin = self.origin();
        WorldPosition::new(
            origin.x + position.x as f32 * self.spacing,
            origin.y + position.y as f32 * self.spacing,
            origin.z,
        )
    }

    /// Maps a world point to the nearest cell, or None when it falls off the board.
    pub fn world_to_grid(&self, world: WorldPosition) -> Option<Position> {
        let origin = self.origin();
        let x = ((world.x - origin.x) / self.spacing).round() as i32;
        let y = ((world.y - origin.y) / self.spacing).round() as i32;
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            Some(Position::new(x, y))
        } else {
            None
        }
    }
}
