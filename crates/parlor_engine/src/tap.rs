//! Timed tap-the-target scoring.
//!
//! Only the scoring model lives here: where targets appear and how they
//! animate is up to the front end, which reports hits and clock ticks.

use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Round length when none is configured.
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// Points a penalty hit costs.
pub const PENALTY: u32 = 5;

/// Every multiple of this score raises the level.
pub const LEVEL_STEP: u32 = 20;

/// What the player hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Target {
    /// Scores the current level and extends the combo.
    Bonus,
    /// Costs points and breaks the combo.
    Penalty,
}

/// One timed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct TapRound {
    /// Points scored.
    score: u32,
    /// Current level (starts at 1).
    level: u32,
    /// Highest level reached this round.
    highest_level: u32,
    /// Consecutive bonus hits.
    combo: u32,
    /// Longest combo this round.
    max_combo: u32,
    /// Seconds left on the clock.
    time_left: u32,
}

impl TapRound {
    /// Starts a round with the given length.
    #[instrument]
    pub fn new(duration_secs: u32) -> Self {
        Self {
            score: 0,
            level: 1,
            highest_level: 1,
            combo: 0,
            max_combo: 0,
            time_left: duration_secs,
        }
    }

    /// Returns true while the clock is running.
    pub fn is_running(&self) -> bool {
        self.time_left > 0
    }

    /// Records a hit. Returns false if the round is already over.
    #[instrument(skip(self), fields(score = self.score, level = self.level))]
    pub fn hit(&mut self, target: Target) -> bool {
        if !self.is_running() {
            return false;
        }
        match target {
            Target::Bonus => {
                self.combo += 1;
                self.max_combo = self.max_combo.max(self.combo);
                self.score += self.level;
                if self.score % LEVEL_STEP == 0 {
                    self.level += 1;
                    self.highest_level = self.highest_level.max(self.level);
                    info!(level = self.level, "Level up");
                }
            }
            Target::Penalty => {
                self.combo = 0;
                self.score = self.score.saturating_sub(PENALTY);
            }
        }
        debug!(score = self.score, combo = self.combo, "Hit recorded");
        true
    }

    /// Advances the clock one second. Returns true when this tick ends the round.
    pub fn tick(&mut self) -> bool {
        if self.time_left == 0 {
            return false;
        }
        self.time_left -= 1;
        self.time_left == 0
    }
}

impl Default for TapRound {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

impl std::fmt::Display for TapRound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Score: {}  Level: {}  Combo: {}  Time: {}",
            self.score, self.level, self.combo, self.time_left
        )
    }
}
