//! Players, terminal status and game outcomes shared by every variant.

use serde::{Deserialize, Serialize};

/// Side in a game. Solo variants are always played by [`Player::X`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// Terminal status of a game state.
///
/// Exactly one of these holds at any time. Once a state is not
/// [`TerminalStatus::Ongoing`] the rule engine refuses further moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalStatus {
    /// Moves are still accepted.
    Ongoing,
    /// The given side won.
    Won(Player),
    /// No side can win any more.
    Drawn,
    /// A solo game ran out of attempts or guesses.
    Lost,
}

impl TerminalStatus {
    /// Returns true once the game is over.
    pub fn is_terminal(self) -> bool {
        !matches!(self, TerminalStatus::Ongoing)
    }

    /// Converts the status to an outcome from `human`'s point of view.
    ///
    /// Returns `None` while the game is still ongoing.
    pub fn outcome_for(self, human: Player) -> Option<Outcome> {
        match self {
            TerminalStatus::Ongoing => None,
            TerminalStatus::Won(winner) if winner == human => Some(Outcome::Win),
            TerminalStatus::Won(_) => Some(Outcome::Loss),
            TerminalStatus::Drawn => Some(Outcome::Draw),
            TerminalStatus::Lost => Some(Outcome::Loss),
        }
    }
}

impl std::fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalStatus::Ongoing => write!(f, "In progress"),
            TerminalStatus::Won(player) => write!(f, "Player {} wins", player),
            TerminalStatus::Drawn => write!(f, "Draw"),
            TerminalStatus::Lost => write!(f, "Game lost"),
        }
    }
}

/// Game outcome from the human player's perspective.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The player won.
    Win,
    /// The player lost.
    Loss,
    /// Nobody won.
    Draw,
}

/// The mini-games the engine knows how to run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    /// Tic-tac-toe against the heuristic opponent.
    TicTacToe,
    /// Guess the hidden word letter by letter.
    Hangman,
    /// Flip cards two at a time to find matching pairs.
    Memory,
    /// Find a secret number with higher/lower hints.
    Guesser,
    /// Timed tap-the-target scoring round.
    Tap,
}

impl GameKind {
    /// Returns true if the best score is the fewest attempts needed to win.
    pub fn tracks_attempts(self) -> bool {
        matches!(self, GameKind::Memory | GameKind::Guesser)
    }

    /// Returns true if the best score is the highest points total.
    pub fn tracks_high_score(self) -> bool {
        matches!(self, GameKind::Tap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_outcome_for_human() {
        assert_eq!(TerminalStatus::Ongoing.outcome_for(Player::X), None);
        assert_eq!(
            TerminalStatus::Won(Player::X).outcome_for(Player::X),
            Some(Outcome::Win)
        );
        assert_eq!(
            TerminalStatus::Won(Player::O).outcome_for(Player::X),
            Some(Outcome::Loss)
        );
        assert_eq!(TerminalStatus::Drawn.outcome_for(Player::O), Some(Outcome::Draw));
        assert_eq!(TerminalStatus::Lost.outcome_for(Player::X), Some(Outcome::Loss));
    }

    #[test]
    fn test_game_kind_names() {
        assert_eq!(GameKind::TicTacToe.to_string(), "tictactoe");
        assert_eq!(GameKind::from_str("Memory").ok(), Some(GameKind::Memory));
        assert!(GameKind::from_str("chess").is_err());
    }

    #[test]
    fn test_score_rules() {
        assert!(GameKind::Memory.tracks_attempts());
        assert!(GameKind::Guesser.tracks_attempts());
        assert!(!GameKind::TicTacToe.tracks_attempts());
        assert!(GameKind::Tap.tracks_high_score());
    }
}
