//! # Input Module
//!
//! Turns player input into swap requests.
//!
//! Two sources are supported: text commands (see [`commands`]) and pointer
//! drags in world space. Neither validates the swap; that is left to the
//! engine so that every rejection reason is reported in one place.

pub mod commands;

pub use commands::*;

use crate::game::{Direction, Position};
use crate::utils::{BoardLayout, WorldPosition};
use serde::{Deserialize, Serialize};
use std::fmt;

/// World-space distance a drag must exceed before it becomes a swap.
pub const DRAG_THRESHOLD: f32 = 0.5;

/// A request to exchange two cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapRequest {
    pub from: Position,
    pub to: Position,
}

impl SwapRequest {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Swap with the neighbor of `from` in `direction`.
    pub fn toward(from: Position, direction: Direction) -> Self {
        Self::new(from, from.offset(direction, 1))
    }
}

impl fmt::Display for SwapRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}:{},{}", self.from.x, self.from.y, self.to.x, self.to.y)
    }
}

/// Tracks one press-drag-release interaction.
///
/// A press on a cell selects it; the first drag sample farther than the
/// threshold from the press point yields one swap toward the dominant axis.
/// Later samples of the same drag are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    threshold: f32,
    start: Option<(Position, WorldPosition)>,
    fired: bool,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::with_threshold(DRAG_THRESHOLD)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            start: None,
            fired: false,
        }
    }

    /// Pointer pressed at `world`. Returns the selected cell, if any.
    pub fn press(&mut self, layout: &BoardLayout, world: WorldPosition) -> Option<Position> {
        self.fired = false;
        self.start = layout.world_to_grid(world).map(|cell| (cell, world));
        self.start.map(|(cell, _)| cell)
    }

    /// Pointer moved to `world` while pressed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{BoardLayout, DragGesture, Position};
    ///
    /// let layout = BoardLayout::new(8, 8, 1.0).unwrap();
    /// let mut drag = DragGesture::new();
    /// let start = layout.grid_to_world(Position::new(3, 3));
    /// drag.press(&layout, start);
    ///
    /// let mut moved = start;
    /// moved.x += 0.3;
    /// assert!(drag.drag(moved).is_none());
    /// moved.x += 0.4;
    /// moved.y -= 0.2;
    /// let swap = drag.drag(moved).unwrap();
    /// assert_eq!(swap.to, Position::new(4, 3));
    /// ```
    pub fn drag(&mut self, world: WorldPosition) -> Option<SwapRequest> {
        let (cell, origin) = self.start?;
        if self.fired || origin.planar_distance(world) <= self.threshold {
            return None;
        }
        self.fired = true;
        let dx = world.x - origin.x;
        let dy = world.y - origin.y;
        let direction = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };
        Some(SwapRequest::toward(cell, direction))
    }

    /// Pointer released; clears the selection.
    pub fn release(&mut self) {
        self.start = None;
        self.fired = false;
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new()
    }
}
