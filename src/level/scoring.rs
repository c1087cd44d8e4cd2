//! Match scoring.
//!
//! Points for one resolved round depend on its size and on how many combo
//! rounds have run back to back.

use log::debug;
use serde::{Deserialize, Serialize};

/// Tunable point values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRules {
    /// Points per matched piece before size multipliers
    pub points_per_piece: u32,
    /// Bonus per consecutive combo round
    pub combo_bonus: u32,
}

impl ScoreRules {
    /// Low point values, sized for targets like the test level's 50.
    pub fn light() -> Self {
        Self {
            points_per_piece: 1,
            combo_bonus: 1,
        }
    }

    /// Arcade-style point values.
    pub fn classic() -> Self {
        Self {
            points_per_piece: 100,
            combo_bonus: 50,
        }
    }

    /// Base points for a round of `count` pieces, without combo bonus.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade::ScoreRules;
    ///
    /// let rules = ScoreRules::classic();
    /// assert_eq!(rules.base_points(3), 300);
    /// assert_eq!(rules.base_points(4), 800);
    /// assert_eq!(rules.base_points(5), 2000);
    /// ```
    pub fn base_points(&self, count: usize) -> u32 {
        let mut points = count as u32 * self.points_per_piece;
        if count >= 4 {
            points *= 2;
        }
        if count >= 5 {
            points *= 2;
        }
        points
    }
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self::light()
    }
}

/// Turns score signals into points and tracks the combo streak.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreKeeper {
    rules: ScoreRules,
    combo_counter: u32,
    total: u64,
}

impl ScoreKeeper {
    pub fn new(rules: ScoreRules) -> Self {
        Self {
            rules,
            combo_counter: 0,
            total: 0,
        }
    }

    pub fn rules(&self) -> ScoreRules {
        self.rules
    }

    /// Consecutive combo rounds seen so far.
    pub fn combo_counter(&self) -> u32 {
        self.combo_counter
    }

    /// Points awarded since the last reset.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Scores one round and returns the points it earned.
    pub fn score_round(&mut self, count: usize, is_combo: bool) -> u32 {
        if is_combo {
            self.combo_counter += 1;
        } else {
            self.combo_counter = 0;
        }
        let points = self.rules.base_points(count) + self.combo_counter * self.rules.combo_bonus;
        self.total += u64::from(points);
        if self.combo_counter > 0 {
            debug!("+{} points (combo x{})", points, self.combo_counter + 1);
        } else {
            debug!("+{} points", points);
        }
        points
    }

    pub fn reset(&mut self) {
        self.combo_counter = 0;
        self.total = 0;
    }
}
