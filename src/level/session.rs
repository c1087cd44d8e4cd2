//! Per-level session: move and time budgets, accumulated score and the
//! win/lose outcome.

use crate::level::{LevelData, LevelType};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Moves granted on timed levels, where moves are not the limit.
pub const TIMED_LEVEL_MOVES: i32 = 999;

/// Where a level session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    /// Swaps are accepted
    InProgress,
    /// Objective met
    Completed { reward: u32 },
    /// Objective missed
    Failed,
}

/// State of the level currently being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSession {
    level: LevelData,
    active: bool,
    remaining_moves: i32,
    remaining_time: f32,
    score: u32,
    outcome: LevelOutcome,
}

impl LevelSession {
    /// Loads `level` and makes it active with a zero score.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::{LevelData, LevelSession};
    ///
    /// let session = LevelSession::new(LevelData::test_level());
    /// assert!(session.is_level_active());
    /// assert_eq!(session.remaining_moves(), 15);
    /// assert_eq!(session.score(), 0);
    /// ```
    pub fn new(level: LevelData) -> Self {
        let mut session = Self {
            remaining_moves: 0,
            remaining_time: 0.0,
            score: 0,
            active: false,
            outcome: LevelOutcome::InProgress,
            level,
        };
        session.initialize();
        session
    }

    fn initialize(&mut self) {
        self.active = true;
        self.score = 0;
        self.outcome = LevelOutcome::InProgress;
        match self.level.level_type {
            LevelType::Time => {
                self.remaining_moves = TIMED_LEVEL_MOVES;
                self.remaining_time = self.level.time_limit_secs;
            }
            LevelType::Score | LevelType::Moves | LevelType::Clear => {
                self.remaining_moves = self.level.moves_limit as i32;
                self.remaining_time = 0.0;
            }
        }
        info!(
            "level {} '{}' loaded: {:?}, target {}, {} moves",
            self.level.level_number,
            self.level.name,
            self.level.level_type,
            self.level.target_score,
            self.remaining_moves
        );
    }

    /// Replaces the current level and starts it.
    pub fn load(&mut self, level: LevelData) {
        self.level = level;
        self.initialize();
    }

    /// Starts the current level again from scratch.
    pub fn restart(&mut self) {
        self.initialize();
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    pub fn is_level_active(&self) -> bool {
        self.active
    }

    pub fn is_timed(&self) -> bool {
        self.level.level_type == LevelType::Time
    }

    pub fn remaining_moves(&self) -> i32 {
        self.remaining_moves
    }

    pub fn remaining_time(&self) -> f32 {
        self.remaining_time
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    /// Adds points; ignored once the level has ended.
    pub fn add_score(&mut self, points: u32) {
        if !self.active {
            debug!("level not active, ignoring {} points", points);
            return;
        }
        self.score = self.score.saturating_add(points);
        debug!("score {}/{}", self.score, self.level.target_score);
    }

    /// Spends one move. Timed levels do not count moves.
    pub fn consume_move(&mut self) {
        if !self.active || self.is_timed() {
            return;
        }
        self.remaining_moves -= 1;
        debug!("{} moves remaining", self.remaining_moves);
    }

    /// Counts the clock down on timed levels.
    ///
    /// Reaching zero does not end the level by itself; see
    /// [`settle_turn`](Self::settle_turn).
    pub fn tick(&mut self, dt_secs: f32) {
        if self.active && self.is_timed() {
            self.remaining_time = (self.remaining_time - dt_secs).max(0.0);
        }
    }

    /// Applies end-of-level rules once the board has come to rest.
    pub fn settle_turn(&mut self) -> LevelOutcome {
        if !self.active {
            return self.outcome;
        }

        if self.is_timed() {
            if self.remaining_time <= 0.0 {
                self.fail();
            }
        } else if self.remaining_moves <= 0 {
            self.check_completion();
        } else if self.level.level_type == LevelType::Score && self.score >= self.level.target_score {
            self.complete();
        }
        self.outcome
    }

    fn check_completion(&mut self) {
        match self.level.level_type {
            LevelType::Score if self.score < self.level.target_score => self.fail(),
            _ => self.complete(),
        }
    }

    fn complete(&mut self) {
        let reward = self.reward();
        self.active = false;
        self.outcome = LevelOutcome::Completed { reward };
        info!(
            "level {} complete with {} points, reward {}",
            self.level.level_number, self.score, reward
        );
    }

    fn fail(&mut self) {
        self.active = false;
        self.outcome = LevelOutcome::Failed;
        info!(
            "level {} failed with {} points",
            self.level.level_number, self.score
        );
    }

    /// Reward for the current score: perfect at twice the target, one and a
    /// half times the base at 1.5× the target, otherwise the base.
    pub fn reward(&self) -> u32 {
        let base = self.level.base_reward;
        if self.level.target_score == 0 {
            return base;
        }
        let ratio = self.score as f32 / self.level.target_score as f32;
        if ratio >= 2.0 {
            self.level.perfect_reward
        } else if ratio >= 1.5 {
            (base as f32 * 1.5).round() as u32
        } else {
            base
        }
    }
}

impl Default for LevelSession {
    fn default() -> Self {
        Self::new(LevelData::test_level())
    }
}
