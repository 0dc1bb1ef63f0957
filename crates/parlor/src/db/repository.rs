//! Database repository for best scores and game history.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use parlor_engine::{GameKind, Outcome, ScoreBoard, ScoreStore, StoreError, score_key};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

use crate::db::{BestScore, DbError, GameResult, NewBestScore, NewGameResult, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite-backed score store.
///
/// Opens a fresh connection per call; the game loop touches the database
/// only when a game ends.
#[derive(Debug, Clone)]
pub struct ScoreRepository {
    db_path: String,
}

impl ScoreRepository {
    /// Creates a repository for the database at the given path without
    /// touching the schema.
    ///
    /// Use `":memory:"` only with care: every call opens a new connection,
    /// so an in-memory database does not survive between calls.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating ScoreRepository");
        Ok(Self { db_path })
    }

    /// Creates a repository and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repo = Self::new(db_path)?;
        repo.migrate()?;
        Ok(repo)
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn migrate(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::migration(e))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Gets the best score stored under `key`. Returns `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn best_score(&self, key: &str) -> Result<Option<BestScore>, DbError> {
        let mut conn = self.connection()?;
        let best = schema::best_scores::table
            .find(key)
            .select(BestScore::as_select())
            .first(&mut conn)
            .optional()?;
        debug!(found = best.is_some(), "Best score looked up");
        Ok(best)
    }

    /// Inserts or replaces the best score under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn upsert_best_score(&self, key: &str, score: i32) -> Result<BestScore, DbError> {
        let mut conn = self.connection()?;
        let row = diesel::insert_into(schema::best_scores::table)
            .values(&NewBestScore::new(key.to_string(), score))
            .on_conflict(schema::best_scores::score_key)
            .do_update()
            .set((
                schema::best_scores::score.eq(score),
                schema::best_scores::updated_at.eq(diesel::dsl::now),
            ))
            .returning(BestScore::as_returning())
            .get_result(&mut conn)?;
        info!(key = %row.score_key(), score = row.score(), "Best score stored");
        Ok(row)
    }

    /// Records a finished game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, row), fields(key = %row.score_key(), game = %row.game(), outcome = %row.outcome()))]
    pub fn record_game(&self, row: NewGameResult) -> Result<GameResult, DbError> {
        let mut conn = self.connection()?;
        let result = diesel::insert_into(schema::game_results::table)
            .values(&row)
            .returning(GameResult::as_returning())
            .get_result(&mut conn)?;
        info!(result_id = result.id(), "Game result recorded");
        Ok(result)
    }

    /// Gets every finished game for a profile, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn results_for(&self, profile: &str) -> Result<Vec<GameResult>, DbError> {
        let mut conn = self.connection()?;
        let results = schema::game_results::table
            .filter(schema::game_results::score_key.eq_any(profile_keys(profile).into_keys().collect::<Vec<_>>()))
            .order((
                schema::game_results::played_at.desc(),
                schema::game_results::id.desc(),
            ))
            .select(GameResult::as_select())
            .load(&mut conn)?;
        info!(count = results.len(), "Profile results loaded");
        Ok(results)
    }

    /// Rebuilds a profile's scoreboard from its history and best scores.
    ///
    /// Rows that no longer parse are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn stats(&self, profile: &str) -> Result<ScoreBoard, DbError> {
        let mut board = ScoreBoard::new();

        for result in self.results_for(profile)? {
            match (result.parse_game(), result.parse_outcome()) {
                (Ok(kind), Ok(outcome)) => {
                    let attempts = u32::try_from(*result.attempts()).unwrap_or_default();
                    board.record_outcome(kind, outcome, attempts);
                }
                (Err(e), _) | (_, Err(e)) => {
                    warn!(result_id = result.id(), error = %e, "Skipping unreadable result")
                }
            }
        }

        let keys = profile_keys(profile);
        let mut conn = self.connection()?;
        let bests = schema::best_scores::table
            .filter(schema::best_scores::score_key.eq_any(keys.keys().cloned().collect::<Vec<_>>()))
            .select(BestScore::as_select())
            .load(&mut conn)?;
        for best in bests {
            if let (Some(kind), Ok(score)) = (keys.get(best.score_key()), u32::try_from(*best.score())) {
                board.seed_best(*kind, score);
            }
        }

        info!(profile, "Stats computed");
        Ok(board)
    }
}

/// Store keys for every game of a profile.
fn profile_keys(profile: &str) -> HashMap<String, GameKind> {
    GameKind::iter()
        .map(|kind| (score_key(profile, kind), kind))
        .collect()
}

impl ScoreStore for ScoreRepository {
    fn load_best_score(&self, key: &str) -> Result<Option<u32>, StoreError> {
        let best = self.best_score(key)?;
        Ok(best.and_then(|row| u32::try_from(*row.score()).ok()))
    }

    fn save_best_score(&self, key: &str, score: u32) -> Result<(), StoreError> {
        let score = i32::try_from(score)
            .map_err(|_| StoreError::new(format!("Score {} out of range", score)))?;
        self.upsert_best_score(key, score)?;
        Ok(())
    }

    fn record_result(
        &self,
        key: &str,
        kind: GameKind,
        outcome: Outcome,
        attempts: u32,
    ) -> Result<(), StoreError> {
        self.record_game(NewGameResult::from_outcome(key, kind, outcome, attempts))?;
        Ok(())
    }
}
