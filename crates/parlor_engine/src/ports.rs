//! Boundary contracts between the engine and its host.
//!
//! The engine pushes snapshots to a [`RenderSink`], reads and writes best
//! scores through a [`ScoreStore`], and asks a [`PlayerIdentity`] for the
//! name to show. Hosts implement these; the engine never does I/O itself.

use crate::error::StoreError;
use crate::session::Snapshot;
use crate::status::{GameKind, Outcome};
use crate::variant::Variant;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::instrument;

/// Label used when no identity is available.
pub const DEFAULT_PLAYER_LABEL: &str = "Player";

/// Receives a snapshot after every accepted move or reset.
pub trait RenderSink<V: Variant> {
    /// Called with the state as it is now.
    fn on_state_changed(&mut self, snapshot: &Snapshot<V>);
}

/// Sink that discards snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<V: Variant> RenderSink<V> for NullSink {
    fn on_state_changed(&mut self, _snapshot: &Snapshot<V>) {}
}

/// Persistent best scores, keyed by an opaque identifier.
///
/// Failures are never fatal: the session logs them and carries on as if
/// no score were stored.
pub trait ScoreStore {
    /// Loads the best score stored under `key`.
    fn load_best_score(&self, key: &str) -> Result<Option<u32>, StoreError>;

    /// Stores `score` as the best score under `key`.
    fn save_best_score(&self, key: &str, score: u32) -> Result<(), StoreError>;

    /// Records a finished session. Stores without history ignore it.
    fn record_result(
        &self,
        _key: &str,
        _kind: GameKind,
        _outcome: Outcome,
        _attempts: u32,
    ) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Supplies the name shown next to the board.
pub trait PlayerIdentity {
    /// Returns the player's display label, if known.
    fn player_label(&self) -> Option<String>;
}

/// Identity backed by a fixed label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedIdentity(pub Option<String>);

impl PlayerIdentity for FixedIdentity {
    fn player_label(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Resolves the label to display, falling back to [`DEFAULT_PLAYER_LABEL`].
pub fn display_label(identity: &dyn PlayerIdentity) -> String {
    identity
        .player_label()
        .filter(|label| !label.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PLAYER_LABEL.to_string())
}

/// Builds the store key for a profile and game, e.g. `"alice:memory"`.
pub fn score_key(profile: &str, kind: GameKind) -> String {
    format!("{}:{}", profile, kind)
}

/// Thread-safe in-memory score store.
///
/// Clones share the same map, so a test can keep a handle while the
/// session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: Arc<Mutex<HashMap<String, u32>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    #[instrument(skip(self))]
    fn load_best_score(&self, key: &str) -> Result<Option<u32>, StoreError> {
        let scores = self
            .scores
            .lock()
            .map_err(|e| StoreError::new(format!("Score map poisoned: {}", e)))?;
        Ok(scores.get(key).copied())
    }

    #[instrument(skip(self))]
    fn save_best_score(&self, key: &str, score: u32) -> Result<(), StoreError> {
        let mut scores = self
            .scores
            .lock()
            .map_err(|e| StoreError::new(format!("Score map poisoned: {}", e)))?;
        scores.insert(key.to_string(), score);
        Ok(())
    }
}
