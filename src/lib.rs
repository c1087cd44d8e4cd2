//! # Cascade Match-3 Engine
//!
//! A match-3 puzzle engine: a grid of colored and special pieces, swap-driven
//! match detection, cascading resolution and special-piece creation/activation.
//!
//! ## Architecture Overview
//!
//! The core is a deterministic board simulation. Everything visual (animation,
//! particles, audio, UI text) lives outside the crate and only consumes the
//! events the engine emits.
//!
//! - **Game**: pieces, the board grid, match detection, special pieces and the
//!   phase-by-phase resolution engine
//! - **Generation**: seeded board filling without immediate matches
//! - **Level**: objectives, move/time budgets, scoring and level catalogs
//! - **Input**: swap requests from text commands and drag gestures
//! - **Rendering**: text rendering of boards for the CLI and tests
//!
//! ## Example
//!
//! ```
//! use cascade::{GenerationConfig, ResolutionEngine};
//!
//! let config = GenerationConfig::for_testing(7);
//! let mut engine = ResolutionEngine::new(&config).unwrap();
//! assert!(engine.board().is_full());
//! assert!(!engine.is_processing());
//! ```

pub mod game;
pub mod generation;
pub mod input;
pub mod level;
pub mod rendering;
pub mod utils;

pub use game::*;
pub use generation::*;
pub use input::*;
pub use level::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Cascade engine.
#[derive(thiserror::Error, Debug)]
pub enum CascadeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Swap request was refused before touching the board
    #[error("Invalid swap: {0}")]
    InvalidSwap(SwapRejection),

    /// Board, generation or level configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// No level with the requested number or index
    #[error("Level not found: {0}")]
    LevelNotFound(u32),

    /// Text input could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type used throughout the Cascade codebase.
pub type CascadeResult<T> = Result<T, CascadeError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    use std::time::Duration;

    /// Default board width in cells
    pub const DEFAULT_BOARD_WIDTH: i32 = 8;

    /// Default board height in cells
    pub const DEFAULT_BOARD_HEIGHT: i32 = 8;

    /// Default number of base colors used for generation
    pub const DEFAULT_COLOR_COUNT: usize = 6;

    /// Smallest color count that keeps generation and cascades well-behaved
    pub const MIN_COLOR_COUNT: usize = 3;

    /// Largest board width or height accepted from configuration
    pub const MAX_BOARD_DIMENSION: i32 = 256;

    /// Default distance between neighboring cells in world units
    pub const DEFAULT_PIECE_SPACING: f32 = 1.0;

    /// Swap (and rollback) animation length
    pub const SWAP_DURATION: Duration = Duration::from_millis(300);

    /// Pause after clearing an ordinary match
    pub const MATCH_CLEAR_PAUSE: Duration = Duration::from_millis(200);

    /// Pause after a special-piece blast
    pub const SPECIAL_CLEAR_PAUSE: Duration = Duration::from_millis(500);

    /// Gravity animation length
    pub const DROP_DURATION: Duration = Duration::from_millis(300);

    /// Refill animation length
    pub const REFILL_DURATION: Duration = Duration::from_millis(300);
}
