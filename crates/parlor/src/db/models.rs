//! Database models.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use parlor_engine::{GameKind, Outcome};
use tracing::instrument;

use crate::db::{DbError, schema};

/// Best score row: fewest attempts or highest points for one profile and game.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::best_scores)]
pub struct BestScore {
    score_key: String,
    score: i32,
    updated_at: NaiveDateTime,
}

/// Insertable best score.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::best_scores)]
pub struct NewBestScore {
    score_key: String,
    score: i32,
}

/// One finished game.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::game_results)]
pub struct GameResult {
    id: i32,
    score_key: String,
    game: String,
    outcome: String,
    attempts: i32,
    played_at: NaiveDateTime,
}

impl GameResult {
    /// Parses the stored game name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the name is not a known game.
    #[instrument(skip(self), fields(game = %self.game))]
    pub fn parse_game(&self) -> Result<GameKind, DbError> {
        GameKind::from_str(&self.game)
            .map_err(|_| DbError::new(format!("Invalid game: '{}'", self.game)))
    }

    /// Parses the stored outcome.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a valid outcome value.
    #[instrument(skip(self), fields(outcome = %self.outcome))]
    pub fn parse_outcome(&self) -> Result<Outcome, DbError> {
        Outcome::from_str(&self.outcome)
            .map_err(|_| DbError::new(format!("Invalid outcome: '{}'", self.outcome)))
    }
}

/// Insertable game result.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::game_results)]
pub struct NewGameResult {
    score_key: String,
    game: String,
    outcome: String,
    attempts: i32,
}

impl NewGameResult {
    /// Builds a row from engine types.
    pub fn from_outcome(score_key: &str, kind: GameKind, outcome: Outcome, attempts: u32) -> Self {
        Self::new(
            score_key.to_string(),
            kind.to_string(),
            outcome.to_string(),
            i32::try_from(attempts).unwrap_or(i32::MAX),
        )
    }
}
