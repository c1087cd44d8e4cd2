//! Procedural level definitions.
//!
//! Level type is drawn from fixed probabilities; difficulty rises linearly
//! over the first hundred levels and tightens move and time budgets.

use crate::config;
use crate::generation::{GenerationConfig, Generator};
use crate::level::{DifficultyLevel, LevelData, LevelType};
use crate::{CascadeError, CascadeResult};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Baseline numbers that generated levels scale from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefaults {
    pub board_width: i32,
    pub board_height: i32,
    pub gem_colors: usize,
    pub base_score_target: u32,
    pub score_increase_per_level: u32,
    pub base_move_limit: u32,
    pub move_decrease_per_difficulty: u32,
    pub base_time_limit_secs: f32,
    pub time_decrease_per_difficulty: f32,
    pub base_reward: u32,
    pub reward_increase_per_level: u32,
}

impl Default for LevelDefaults {
    fn default() -> Self {
        Self {
            board_width: config::DEFAULT_BOARD_WIDTH,
            board_height: config::DEFAULT_BOARD_HEIGHT,
            gem_colors: 5,
            base_score_target: 25,
            score_increase_per_level: 5,
            base_move_limit: 25,
            move_decrease_per_difficulty: 3,
            base_time_limit_secs: 120.0,
            time_decrease_per_difficulty: 15.0,
            base_reward: 100,
            reward_increase_per_level: 50,
        }
    }
}

/// Type distribution and difficulty ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelGenerationRules {
    pub score_probability: f32,
    pub moves_probability: f32,
    pub time_probability: f32,
    pub clear_probability: f32,
    /// Levels it takes for difficulty to climb from Easy to past Expert
    pub progression_levels: u32,
}

impl Default for LevelGenerationRules {
    fn default() -> Self {
        Self {
            score_probability: 0.4,
            moves_probability: 0.3,
            time_probability: 0.2,
            clear_probability: 0.1,
            progression_levels: 100,
        }
    }
}

impl LevelGenerationRules {
    /// Difficulty tier for a level number.
    pub fn difficulty_for(&self, level_number: u32) -> DifficultyLevel {
        let span = self.progression_levels.max(1) as f32;
        let progress = (level_number.saturating_sub(1) as f32 / span).clamp(0.0, 1.0);
        DifficultyLevel::from_index((progress * 4.0).floor() as usize)
    }

    /// Maps a uniform roll in [0, 1) to a level type.
    pub fn level_type_for(&self, roll: f32) -> LevelType {
        let score = self.score_probability;
        let moves = score + self.moves_probability;
        let time = moves + self.time_probability;
        if roll < score {
            LevelType::Score
        } else if roll < moves {
            LevelType::Moves
        } else if roll < time {
            LevelType::Time
        } else {
            LevelType::Clear
        }
    }
}

/// Builds [`LevelData`] for arbitrary level numbers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelGenerator {
    pub defaults: LevelDefaults,
    pub rules: LevelGenerationRules,
}

impl LevelGenerator {
    pub fn new(defaults: LevelDefaults, rules: LevelGenerationRules) -> Self {
        Self { defaults, rules }
    }

    /// Generates level `level_number` (1-based).
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{DifficultyLevel, LevelGenerator};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let generator = LevelGenerator::default();
    /// let level = generator.generate_level(1, &mut StdRng::seed_from_u64(4));
    /// assert_eq!(level.difficulty, DifficultyLevel::Easy);
    /// assert_eq!(level.base_reward, 100);
    /// assert_eq!(level.perfect_reward, 300);
    /// ```
    pub fn generate_level(&self, level_number: u32, rng: &mut StdRng) -> LevelData {
        let defaults = &self.defaults;
        let difficulty = self.rules.difficulty_for(level_number);
        let tier = difficulty.index() as u32;
        let level_type = self.rules.level_type_for(rng.gen_range(0.0..1.0));

        let mut target_score = defaults.base_score_target;
        let mut moves_limit = defaults.base_move_limit;
        let mut time_limit_secs = defaults.base_time_limit_secs;
        match level_type {
            LevelType::Score => {
                target_score = target_score.saturating_add(
                    level_number
                        .saturating_sub(1)
                        .saturating_mul(defaults.score_increase_per_level),
                );
            }
            LevelType::Moves => {
                moves_limit = moves_limit
                    .saturating_sub(tier.saturating_mul(defaults.move_decrease_per_difficulty))
                    .max(1);
            }
            LevelType::Time => {
                time_limit_secs = (time_limit_secs
                    - tier as f32 * defaults.time_decrease_per_difficulty)
                    .max(1.0);
            }
            LevelType::Clear => {}
        }

        let base_reward = defaults.base_reward.saturating_add(
            level_number
                .saturating_sub(1)
                .saturating_mul(defaults.reward_increase_per_level),
        );

        let mut level = LevelData {
            level_number,
            name: format!("Level {}", level_number),
            difficulty,
            level_type,
            target_score,
            moves_limit,
            time_limit_secs,
            board_width: defaults.board_width,
            board_height: defaults.board_height,
            gem_colors: defaults.gem_colors,
            base_reward,
            perfect_reward: base_reward.saturating_mul(3),
            description: String::new(),
        };
        level.description = describe(&level);
        debug!("generated {:?} level {} ({:?})", level_type, level_number, difficulty);
        level
    }

    /// Generates levels 1 through `count`.
    pub fn generate_levels(&self, count: u32, rng: &mut StdRng) -> Vec<LevelData> {
        (1..=count).map(|n| self.generate_level(n, rng)).collect()
    }
}

/// Player-facing objective text.
fn describe(level: &LevelData) -> String {
    let mut description = match level.level_type {
        LevelType::Score => format!(
            "Reach {} points in {} moves.",
            level.target_score, level.moves_limit
        ),
        LevelType::Moves => format!("Complete objectives within {} moves.", level.moves_limit),
        LevelType::Time => format!(
            "Score as much as possible in {} seconds!",
            level.time_limit_secs
        ),
        LevelType::Clear => format!(
            "Clear all pieces from the board in {} moves.",
            level.moves_limit
        ),
    };
    if level.difficulty >= DifficultyLevel::Hard {
        description.push_str(" This is a challenging level!");
    }
    description
}

impl Generator<Vec<LevelData>> for LevelGenerator {
    /// Uses the config seed only through `rng`; board size and colors come
    /// from [`LevelDefaults`].
    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> CascadeResult<Vec<LevelData>> {
        let levels = self.generate_levels(self.rules.progression_levels, rng);
        for level in &levels {
            level.validate()?;
        }
        Ok(levels)
    }

    fn validate(&self, content: &Vec<LevelData>, _config: &GenerationConfig) -> CascadeResult<()> {
        for (index, level) in content.iter().enumerate() {
            if level.level_number != index as u32 + 1 {
                return Err(CascadeError::InvalidState(format!(
                    "level at index {} is numbered {}",
                    index, level.level_number
                )));
            }
            level.validate()?;
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "LevelGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::create_rng;
    use rand::SeedableRng;

    #[test]
    fn test_difficulty_progression() {
        let rules = LevelGenerationRules::default();
        assert_eq!(rules.difficulty_for(1), DifficultyLevel::Easy);
        assert_eq!(rules.difficulty_for(25), DifficultyLevel::Easy);
        assert_eq!(rules.difficulty_for(26), DifficultyLevel::Medium);
        assert_eq!(rules.difficulty_for(51), DifficultyLevel::Hard);
        assert_eq!(rules.difficulty_for(76), DifficultyLevel::Expert);
        assert_eq!(rules.difficulty_for(500), DifficultyLevel::Expert);
    }

    #[test]
    fn test_type_distribution_boundaries() {
        let rules = LevelGenerationRules::default();
        assert_eq!(rules.level_type_for(0.0), LevelType::Score);
        assert_eq!(rules.level_type_for(0.39), LevelType::Score);
        assert_eq!(rules.level_type_for(0.5), LevelType::Moves);
        assert_eq!(rules.level_type_for(0.8), LevelType::Time);
        assert_eq!(rules.level_type_for(0.95), LevelType::Clear);
    }

    #[test]
    fn test_generated_levels_are_valid() {
        let generator = LevelGenerator::default();
        let config = GenerationConfig::new(11);
        let mut rng = create_rng(&config);
        let levels = generator.generate(&config, &mut rng).unwrap();
        assert_eq!(levels.len(), 100);
        assert!(generator.validate(&levels, &config).is_ok());

        for level in &levels {
            if level.level_type == LevelType::Score {
                assert_eq!(level.target_score, 25 + (level.level_number - 1) * 5);
            }
            assert_eq!(level.perfect_reward, level.base_reward * 3);
        }
    }

    #[test]
    fn test_huge_level_numbers_saturate() {
        let rules = LevelGenerationRules {
            score_probability: 1.0,
            moves_probability: 0.0,
            time_probability: 0.0,
            clear_probability: 0.0,
            progression_levels: 100,
        };
        let generator = LevelGenerator::new(LevelDefaults::default(), rules);
        let level = generator.generate_level(u32::MAX, &mut StdRng::seed_from_u64(4));
        assert_eq!(level.level_type, LevelType::Score);
        assert_eq!(level.difficulty, DifficultyLevel::Expert);
        assert_eq!(level.target_score, u32::MAX);
        assert_eq!(level.perfect_reward, u32::MAX);
    }

    #[test]
    fn test_budgets_shrink_with_difficulty() {
        let rules = LevelGenerationRules {
            score_probability: 0.0,
            moves_probability: 1.0,
            time_probability: 0.0,
            clear_probability: 0.0,
            progression_levels: 100,
        };
        let generator = LevelGenerator::new(LevelDefaults::default(), rules);
        let mut rng = StdRng::seed_from_u64(0);
        let hard = generator.generate_level(60, &mut rng);
        assert_eq!(hard.level_type, LevelType::Moves);
        assert_eq!(hard.moves_limit, 19);
        assert!(hard.description.ends_with("This is a challenging level!"));
    }

    #[test]
    fn test_time_level_description() {
        let rules = LevelGenerationRules {
            score_probability: 0.0,
            moves_probability: 0.0,
            time_probability: 1.0,
            clear_probability: 0.0,
            progression_levels: 100,
        };
        let generator = LevelGenerator::new(LevelDefaults::default(), rules);
        let level = generator.generate_level(30, &mut StdRng::seed_from_u64(0));
        assert_eq!(level.time_limit_secs, 105.0);
        assert_eq!(level.description, "Score as much as possible in 105 seconds!");
    }
}
