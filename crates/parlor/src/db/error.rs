//! Errors raised by the score database.

use derive_more::{Display, Error};
use parlor_engine::StoreError;
use tracing::instrument;

/// Boxed error returned by the migration harness.
type MigrationError = Box<dyn std::error::Error + Send + Sync>;

/// Failure opening, migrating or querying the score database.
///
/// Records where in the repository it was raised so a warning in the log
/// points at the failing query rather than at the game loop.
#[derive(Debug, Clone, Display, Error)]
#[display("Score database error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// What went wrong.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// File that raised the error.
    pub file: &'static str,
}

impl DbError {
    /// Creates an error located at the caller.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Wraps a failed schema migration.
    #[track_caller]
    pub fn migration(err: MigrationError) -> Self {
        Self::new(format!("Migration failed: {}", err))
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Query failed: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Cannot open score database: {}", err))
    }
}

// The engine only sees the message; the location stays in the log line.
impl From<DbError> for StoreError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        StoreError::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_keeps_database_message() {
        let store: StoreError = DbError::new("best_scores is locked").into();
        assert!(store.message.contains("best_scores is locked"));
        assert!(store.message.starts_with("Score database error"));
    }

    #[test]
    fn test_query_errors_are_labelled() {
        let err = DbError::from(diesel::result::Error::NotFound);
        assert!(err.message.starts_with("Query failed"), "{}", err.message);
        assert!(err.file.ends_with("error.rs"));
    }

    #[test]
    fn test_migration_error_wraps_source() {
        let err = DbError::migration("bad sql".into());
        assert_eq!(err.message, "Migration failed: bad sql");
    }
}
