//! Parlor - terminal front end for the parlor engine
//!
//! Hosts the engine's ports: render sinks that print boards as text or JSON,
//! a SQLite score store, the player identity, and the async play loop that
//! races player input against the opponent's presentation delay.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod identity;
mod tap;
mod terminal;

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError, GuesserConfig, HangmanConfig, MemoryConfig, TapConfig};

// Crate-level exports - Persistence
pub use db::{BestScore, DbError, GameResult, NewBestScore, NewGameResult, ScoreRepository};

// Crate-level exports - Identity
pub use identity::{PLAYER_ENV, ProfileIdentity};

// Crate-level exports - Terminal front end
pub use tap::{TapInput, play_tap_round, record_round};
pub use terminal::{
    Command, JsonSink, OutputMode, SharedBuffer, TextSink, help_text, play_session,
};
