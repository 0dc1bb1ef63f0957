//! Error types for move validation and score persistence.

use derive_more::{Display, Error};
use tracing::instrument;

/// Reasons a move is refused.
///
/// Every kind is recoverable: the session stays usable and the caller
/// simply drops the move or tells the player.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MoveError {
    /// The move does not address a slot of this game (out of range, not a letter, ...).
    #[display("Invalid move: {}", _0)]
    InvalidMove(String),

    /// The addressed slot is already filled, matched or guessed.
    #[display("Slot {} is already taken", _0)]
    OccupiedSlot(String),

    /// The game already reached a terminal status.
    #[display("Game is already over")]
    GameOver,

    /// The session is not accepting moves from the player right now.
    #[display("Move ignored: not accepting input")]
    IgnoredMove,
}

impl std::error::Error for MoveError {}

impl MoveError {
    /// Creates an [`MoveError::InvalidMove`] from any displayable detail.
    pub fn invalid(detail: impl std::fmt::Display) -> Self {
        Self::InvalidMove(detail.to_string())
    }

    /// Creates an [`MoveError::OccupiedSlot`] from any displayable slot name.
    pub fn occupied(slot: impl std::fmt::Display) -> Self {
        Self::OccupiedSlot(slot.to_string())
    }
}

/// Failure reported by a score store.
///
/// The engine never propagates these to the player; they are logged and
/// the score is treated as absent.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
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
}
