//! Win/loss/draw tallies and best scores per game.

use crate::status::{GameKind, Outcome};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Running totals for one game.
///
/// Counters only grow. `best_attempts` only shrinks and `high_score`
/// only grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Tally {
    /// Sessions won.
    wins: u32,
    /// Sessions lost.
    losses: u32,
    /// Sessions drawn.
    draws: u32,
    /// Attempts spent across all finished sessions.
    total_attempts: u64,
    /// Fewest attempts in a won session.
    best_attempts: Option<u32>,
    /// Highest points total in a timed round.
    high_score: Option<u32>,
}

impl Tally {
    /// Sessions finished.
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Win rate as a percentage (0.0-100.0).
    pub fn win_rate(&self) -> f64 {
        match self.games() {
            0 => 0.0,
            games => (self.wins as f64 / games as f64) * 100.0,
        }
    }
}

/// Pure accumulator of results across sessions. No I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    tallies: BTreeMap<GameKind, Tally>,
}

impl ScoreBoard {
    /// Creates an empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tally for a game (all zero if never played).
    pub fn tally(&self, kind: GameKind) -> Tally {
        self.tallies.get(&kind).copied().unwrap_or_default()
    }

    /// Best score for a game: fewest attempts or highest points,
    /// depending on the game.
    pub fn best_score(&self, kind: GameKind) -> Option<u32> {
        let tally = self.tally(kind);
        if kind.tracks_high_score() {
            tally.high_score
        } else {
            tally.best_attempts
        }
    }

    /// Records a finished session.
    ///
    /// For attempt-counting games a win also lowers the best score
    /// when `attempts` beats it.
    #[instrument(skip(self))]
    pub fn record_outcome(&mut self, kind: GameKind, outcome: Outcome, attempts: u32) {
        let tally = self.tallies.entry(kind).or_default();
        match outcome {
            Outcome::Win => tally.wins += 1,
            Outcome::Loss => tally.losses += 1,
            Outcome::Draw => tally.draws += 1,
        }
        tally.total_attempts += u64::from(attempts);
        if outcome == Outcome::Win && kind.tracks_attempts() {
            tally.best_attempts = Some(tally.best_attempts.map_or(attempts, |best| best.min(attempts)));
        }
        debug!(wins = tally.wins, losses = tally.losses, draws = tally.draws, "Outcome recorded");
    }

    /// Records a timed-round score. Returns true if it is a new high score.
    #[instrument(skip(self))]
    pub fn record_high_score(&mut self, kind: GameKind, score: u32) -> bool {
        let tally = self.tallies.entry(kind).or_default();
        let improved = tally.high_score.is_none_or(|best| score > best);
        if improved {
            tally.high_score = Some(score);
        }
        improved
    }

    /// Merges a persisted best score without ever making it worse.
    #[instrument(skip(self))]
    pub fn seed_best(&mut self, kind: GameKind, best: u32) {
        let tally = self.tallies.entry(kind).or_default();
        if kind.tracks_high_score() {
            tally.high_score = Some(tally.high_score.map_or(best, |current| current.max(best)));
        } else {
            tally.best_attempts = Some(tally.best_attempts.map_or(best, |current| current.min(best)));
        }
    }
}
