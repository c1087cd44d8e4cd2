//! # Level Module
//!
//! Level objectives, move/time budgets, scoring and level catalogs.
//!
//! The board engine never reads this module directly; the session coordinator
//! asks [`LevelSession::is_level_active`] before forwarding a swap and routes
//! the engine's scoring signals back here.

pub mod catalog;
pub mod generator;
pub mod scoring;
pub mod session;

pub use catalog::*;
pub use generator::*;
pub use scoring::*;
pub use session::*;

use crate::config;
use crate::{CascadeError, CascadeResult};
use serde::{Deserialize, Serialize};

/// Objective of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelType {
    /// Reach a target score within the move budget
    Score,
    /// Finish within a limited number of moves
    Moves,
    /// Play against the clock with unlimited moves
    Time,
    /// Clear the board within the move budget
    Clear,
}

/// Difficulty tier, used by level generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl DifficultyLevel {
    /// Maps a 0..4 tier index to a difficulty, clamping above.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => DifficultyLevel::Easy,
            1 => DifficultyLevel::Medium,
            2 => DifficultyLevel::Hard,
            _ => DifficultyLevel::Expert,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Definition of a single level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub level_number: u32,
    pub name: String,
    pub difficulty: DifficultyLevel,
    pub level_type: LevelType,
    pub target_score: u32,
    pub moves_limit: u32,
    pub time_limit_secs: f32,
    pub board_width: i32,
    pub board_height: i32,
    pub gem_colors: usize,
    pub base_reward: u32,
    pub perfect_reward: u32,
    #[serde(default)]
    pub description: String,
}

impl LevelData {
    /// The level used when no catalog is configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{LevelData, LevelType};
    ///
    /// let level = LevelData::test_level();
    /// assert_eq!(level.level_type, LevelType::Score);
    /// assert_eq!(level.target_score, 50);
    /// assert_eq!(level.moves_limit, 15);
    /// ```
    pub fn test_level() -> Self {
        let target_score = 50;
        let moves_limit = 15;
        Self {
            level_number: 1,
            name: "Test Level".to_string(),
            difficulty: DifficultyLevel::Easy,
            level_type: LevelType::Score,
            target_score,
            moves_limit,
            time_limit_secs: 60.0,
            board_width: config::DEFAULT_BOARD_WIDTH,
            board_height: config::DEFAULT_BOARD_HEIGHT,
            gem_colors: 5,
            base_reward: 100,
            perfect_reward: 300,
            description: format!("Score {} points in {} moves!", target_score, moves_limit),
        }
    }

    /// Checks that the level can be played.
    pub fn validate(&self) -> CascadeResult<()> {
        if self.board_width < 3 || self.board_height < 3 {
            return Err(CascadeError::InvalidConfig(format!(
                "level {} board must be at least 3x3",
                self.level_number
            )));
        }
        if self.board_width > config::MAX_BOARD_DIMENSION || self.board_height > config::MAX_BOARD_DIMENSION {
            return Err(CascadeError::InvalidConfig(format!(
                "level {} board {}x{} exceeds {} cells per side",
                self.level_number,
                self.board_width,
                self.board_height,
                config::MAX_BOARD_DIMENSION
            )));
        }
        if !(config::MIN_COLOR_COUNT..=crate::game::PieceColor::ALL.len()).contains(&self.gem_colors) {
            return Err(CascadeError::InvalidConfig(format!(
                "level {} uses {} colors",
                self.level_number, self.gem_colors
            )));
        }
        match self.level_type {
            LevelType::Time if self.time_limit_secs <= 0.0 => Err(CascadeError::InvalidConfig(
                format!("timed level {} needs a positive time limit", self.level_number),
            )),
            LevelType::Score | LevelType::Moves | LevelType::Clear if self.moves_limit == 0 => {
                Err(CascadeError::InvalidConfig(format!(
                    "level {} needs at least one move",
                    self.level_number
                )))
            }
            _ => Ok(()),
        }
    }

    /// Board generation settings for this level.
    pub fn generation_config(&self, seed: u64) -> crate::generation::GenerationConfig {
        crate::generation::GenerationConfig::new(seed)
            .with_size(self.board_width, self.board_height)
            .with_colors(self.gem_colors)
    }
}

impl Default for LevelData {
    fn default() -> Self {
        Self::test_level()
    }
}
