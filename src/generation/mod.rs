//! # Generation Module
//!
//! Seeded board generation.
//!
//! Initial boards are filled cell by cell with plain colors chosen so that no
//! run of three exists when play starts. Refill during a cascade draws plain
//! colors without that constraint, which is what produces chain reactions.

use crate::config;
use crate::game::{would_create_match, Board, Piece, PieceColor, PieceType, Position};
use crate::{CascadeError, CascadeResult};
use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for board generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible boards and refills
    pub seed: u64,
    /// Board width in cells
    pub width: i32,
    /// Board height in cells
    pub height: i32,
    /// Number of base colors drawn from (3..=6)
    pub color_count: usize,
    /// Distance between neighboring cells in world units
    pub spacing: f32,
}

impl GenerationConfig {
    /// Creates the default 8×8, six-color configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert_eq!(config.width, 8);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_BOARD_WIDTH,
            height: config::DEFAULT_BOARD_HEIGHT,
            color_count: config::DEFAULT_COLOR_COUNT,
            spacing: config::DEFAULT_PIECE_SPACING,
        }
    }

    /// Creates a configuration for testing: a small board with few colors,
    /// so cascades happen often.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 6,
            height: 6,
            color_count: 4,
            spacing: config::DEFAULT_PIECE_SPACING,
        }
    }

    /// Builder-style override of the board size.
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder-style override of the color count.
    pub fn with_colors(mut self, color_count: usize) -> Self {
        self.color_count = color_count;
        self
    }

    /// Checks board size, color count and spacing.
    pub fn validate(&self) -> CascadeResult<()> {
        if self.width < 3 || self.height < 3 {
            return Err(CascadeError::InvalidConfig(format!(
                "board must be at least 3x3, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > config::MAX_BOARD_DIMENSION || self.height > config::MAX_BOARD_DIMENSION {
            return Err(CascadeError::InvalidConfig(format!(
                "board sides are capped at {}, got {}x{}",
                config::MAX_BOARD_DIMENSION,
                self.width,
                self.height
            )));
        }
        if self.color_count < config::MIN_COLOR_COUNT || self.color_count > PieceColor::ALL.len() {
            return Err(CascadeError::InvalidConfig(format!(
                "color count must be between {} and {}, got {}",
                config::MIN_COLOR_COUNT,
                PieceColor::ALL.len(),
                self.color_count
            )));
        }
        if !(self.spacing > 0.0 && self.spacing.is_finite()) {
            return Err(CascadeError::InvalidConfig(format!(
                "piece spacing must be positive, got {}",
                self.spacing
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CascadeResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> CascadeResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Creates a seeded random number generator from the config.
pub fn create_rng(config: &GenerationConfig) -> StdRng {
    StdRng::seed_from_u64(config.seed)
}

/// Fills boards with plain pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGenerator {
    /// Number of base colors drawn from
    pub color_count: usize,
}

impl BoardGenerator {
    pub fn new(color_count: usize) -> Self {
        Self { color_count }
    }

    fn palette(&self) -> &'static [PieceColor] {
        PieceColor::palette(self.color_count.max(1))
    }

    /// Uniformly random plain type, no constraints.
    pub fn random_plain_type(&self, rng: &mut StdRng) -> PieceType {
        let palette = self.palette();
        PieceType::Plain(palette[rng.gen_range(0..palette.len())])
    }

    /// Uniformly random plain type that does not complete a run at `position`.
    ///
    /// Falls back to an unconstrained pick when every color would match.
    pub fn random_valid_type(&self, board: &Board, position: Position, rng: &mut StdRng) -> PieceType {
        let candidates: Vec<PieceType> = self
            .palette()
            .iter()
            .map(|&color| PieceType::Plain(color))
            .filter(|&piece_type| !would_create_match(board, position, piece_type))
            .collect();

        match candidates.choose(rng) {
            Some(&piece_type) => piece_type,
            None => {
                warn!(
                    "every color would match at {}, falling back to an unconstrained pick",
                    position
                );
                self.random_plain_type(rng)
            }
        }
    }

    /// Creates a full board with no immediate 3-in-a-row.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{find_all_matches, BoardGenerator};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(3);
    /// let board = BoardGenerator::new(5).fill_initial(8, 8, &mut rng).unwrap();
    /// assert!(board.is_full());
    /// assert!(find_all_matches(&board).is_empty());
    /// ```
    pub fn fill_initial(&self, width: i32, height: i32, rng: &mut StdRng) -> CascadeResult<Board> {
        let mut board = Board::new(width, height)?;
        for x in 0..width {
            for y in 0..height {
                let position = Position::new(x, y);
                let piece_type = self.random_valid_type(&board, position, rng);
                board.set(x, y, Some(Piece::new(piece_type, position)));
            }
        }
        Ok(board)
    }
}

impl Generator<Board> for BoardGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CascadeResult<Board> {
        config.validate()?;
        let board = self.fill_initial(config.width, config.height, rng)?;
        self.validate(&board, config)?;
        Ok(board)
    }

    fn validate(&self, content: &Board, config: &GenerationConfig) -> CascadeResult<()> {
        if content.width() != config.width || content.height() != config.height {
            return Err(CascadeError::InvalidState(format!(
                "generated {}x{} board, expected {}x{}",
                content.width(),
                content.height(),
                config.width,
                config.height
            )));
        }
        if !content.is_full() {
            return Err(CascadeError::InvalidState(
                "generated board has empty cells".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "NoMatchBoardGenerator"
    }
}
