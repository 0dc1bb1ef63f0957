//! Application configuration loaded from `parlor.toml`.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use parlor_engine::{
    DEFAULT_DURATION_SECS, DEFAULT_MAX_WRONG, DEFAULT_PAIRS, FirstPlayer, Guesser, Hangman,
    MAX_PAIRS, Memory,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const DEFAULT_WORDS: &[&str] = &[
    "BORROW", "CLOSURE", "CRATE", "ITERATOR", "LIFETIME", "MACRO", "PARLOR", "THREAD", "TRAIT",
    "VECTOR",
];

/// Top-level settings.
///
/// Every key is optional; a missing file means all defaults.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Profile that best scores and history are stored under.
    profile: String,

    /// Name shown to the player. Falls back to `PARLOR_PLAYER`, then "Player".
    player_label: Option<String>,

    /// SQLite database file.
    db_path: String,

    /// Pause before the opponent answers, in milliseconds.
    opponent_delay_ms: u64,

    /// Who opens a tic-tac-toe game.
    first_player: FirstPlayer,

    /// Hangman settings.
    hangman: HangmanConfig,

    /// Memory settings.
    memory: MemoryConfig,

    /// Number guesser settings.
    guesser: GuesserConfig,

    /// Tap round settings.
    tap: TapConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: "local".to_string(),
            player_label: None,
            db_path: "parlor.db".to_string(),
            opponent_delay_ms: 600,
            first_player: FirstPlayer::Human,
            hangman: HangmanConfig::default(),
            memory: MemoryConfig::default(),
            guesser: GuesserConfig::default(),
            tap: TapConfig::default(),
        }
    }
}

/// `[hangman]` table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HangmanConfig {
    /// Words to pick from.
    words: Vec<String>,
    /// Wrong guesses that lose the game.
    max_wrong: u8,
}

impl Default for HangmanConfig {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
            max_wrong: DEFAULT_MAX_WRONG,
        }
    }
}

impl HangmanConfig {
    /// Builds the hangman rules.
    pub fn rules(&self) -> Hangman {
        Hangman::new(self.words.clone(), self.max_wrong)
    }
}

/// `[memory]` table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// Number of pairs on the table.
    pairs: usize,
    /// Attempts before the game is lost. Unlimited if absent.
    max_attempts: Option<u32>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_PAIRS,
            max_attempts: None,
        }
    }
}

impl MemoryConfig {
    /// Builds the memory rules.
    pub fn rules(&self) -> Memory {
        Memory::new(self.pairs, self.max_attempts)
    }
}

/// `[guesser]` table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuesserConfig {
    /// Lowest possible secret.
    low: u32,
    /// Highest possible secret.
    high: u32,
    /// Guesses allowed.
    max_attempts: u32,
}

impl Default for GuesserConfig {
    fn default() -> Self {
        Self {
            low: 1,
            high: 100,
            max_attempts: 7,
        }
    }
}

impl GuesserConfig {
    /// Builds the guesser rules.
    pub fn rules(&self) -> Guesser {
        Guesser::new(self.low, self.high, self.max_attempts)
    }
}

/// `[tap]` table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TapConfig {
    /// Round length in seconds.
    duration_secs: u32,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(profile = %config.profile, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid TOML or fails validation.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first invalid key.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profile.trim().is_empty() {
            return Err(ConfigError::new("profile must not be empty".to_string()));
        }
        if self.hangman.rules().words().is_empty() {
            return Err(ConfigError::new(
                "hangman.words must contain at least one alphabetic word".to_string(),
            ));
        }
        if self.hangman.max_wrong == 0 {
            return Err(ConfigError::new("hangman.max_wrong must be at least 1".to_string()));
        }
        if !(1..=MAX_PAIRS).contains(&self.memory.pairs) {
            return Err(ConfigError::new(format!(
                "memory.pairs must be between 1 and {}, got {}",
                MAX_PAIRS, self.memory.pairs
            )));
        }
        if self.memory.max_attempts == Some(0) {
            return Err(ConfigError::new("memory.max_attempts must be at least 1".to_string()));
        }
        if self.guesser.low > self.guesser.high {
            return Err(ConfigError::new(format!(
                "guesser.low ({}) is above guesser.high ({})",
                self.guesser.low, self.guesser.high
            )));
        }
        if self.guesser.max_attempts == 0 {
            return Err(ConfigError::new("guesser.max_attempts must be at least 1".to_string()));
        }
        if self.tap.duration_secs == 0 {
            return Err(ConfigError::new("tap.duration_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Replaces the profile, e.g. from `--profile`.
    pub fn with_profile(mut self, profile: String) -> Self {
        self.profile = profile;
        self
    }

    /// Replaces the database path, e.g. from `--db-path`.
    pub fn with_db_path(mut self, db_path: String) -> Self {
        self.db_path = db_path;
        self
    }

    /// Opponent presentation delay.
    pub fn opponent_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.opponent_delay(), Duration::from_millis(600));
        assert_eq!(config.memory().rules().pairs(), 8);
    }

    #[test]
    fn test_partial_tables_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            profile = "ayu"
            first_player = "opponent"

            [guesser]
            high = 50

            [hangman]
            words = ["ferris"]
            "#,
        )
        .unwrap();
        assert_eq!(config.profile(), "ayu");
        assert_eq!(*config.first_player(), FirstPlayer::Opponent);
        assert_eq!(*config.guesser().low(), 1);
        assert_eq!(*config.guesser().high(), 50);
        assert_eq!(config.hangman().rules().words(), ["FERRIS"]);
        assert_eq!(*config.hangman().max_wrong(), DEFAULT_MAX_WRONG);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cases = [
            "profile = \"  \"",
            "[hangman]\nwords = [\"42\", \"\"]",
            "[memory]\npairs = 27",
            "[memory]\npairs = 0",
            "[guesser]\nlow = 10\nhigh = 5",
            "[guesser]\nmax_attempts = 0",
            "[tap]\nduration_secs = 0",
        ];
        for case in cases {
            assert!(AppConfig::from_toml(case).is_err(), "accepted: {}", case);
        }
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = AppConfig::from_toml("oponent_delay_ms = 10").unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_reads_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "opponent_delay_ms = 0\ndb_path = \"scores.db\"").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.opponent_delay(), Duration::ZERO);
        assert_eq!(config.db_path(), "scores.db");
    }
}
