//! Player identity for the terminal front end.

use parlor_engine::PlayerIdentity;
use tracing::instrument;

/// Environment variable consulted when no label is configured.
pub const PLAYER_ENV: &str = "PARLOR_PLAYER";

/// Label from the config file, else from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileIdentity {
    configured: Option<String>,
    fallback: Option<String>,
}

impl ProfileIdentity {
    /// Creates an identity from explicit values.
    pub fn new(configured: Option<String>, fallback: Option<String>) -> Self {
        Self {
            configured,
            fallback,
        }
    }

    /// Uses `configured`, falling back to [`PLAYER_ENV`] (also read from `.env`).
    #[instrument]
    pub fn from_env(configured: Option<String>) -> Self {
        Self::new(configured, std::env::var(PLAYER_ENV).ok())
    }
}

impl PlayerIdentity for ProfileIdentity {
    fn player_label(&self) -> Option<String> {
        [&self.configured, &self.fallback]
            .into_iter()
            .flatten()
            .map(|label| label.trim())
            .find(|label| !label.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_engine::display_label;

    #[test]
    fn test_configured_label_wins() {
        let identity = ProfileIdentity::new(Some("Ayu".into()), Some("env".into()));
        assert_eq!(identity.player_label().as_deref(), Some("Ayu"));
    }

    #[test]
    fn test_blank_label_falls_through() {
        let identity = ProfileIdentity::new(Some("   ".into()), Some(" Bo ".into()));
        assert_eq!(identity.player_label().as_deref(), Some("Bo"));
        assert_eq!(display_label(&ProfileIdentity::default()), "Player");
    }
}
