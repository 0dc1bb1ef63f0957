//! Immutable view of a session handed to render sinks.

use super::SessionPhase;
use crate::status::{GameKind, Outcome, Player, TerminalStatus};
use crate::variant::Variant;
use serde::Serialize;

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct Snapshot<V: Variant> {
    /// Which game is running.
    pub kind: GameKind,
    /// Current game state.
    pub state: V::State,
    /// Controller phase (whose turn, or over).
    pub phase: SessionPhase,
    /// Terminal status of `state`.
    pub status: TerminalStatus,
    /// The side the player controls.
    pub human: Player,
    /// Slots to highlight: the winning line, the last mismatched pair.
    pub highlight: Vec<usize>,
    /// Name shown for the player.
    pub player_label: String,
    /// Attempts spent this session.
    pub attempts: u32,
    /// Best score on record for this game.
    pub best_score: Option<u32>,
}

impl<V: Variant> std::fmt::Display for Snapshot<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.state)?;
        match self.phase {
            SessionPhase::AwaitingHumanMove => write!(f, "{}, your move", self.player_label)?,
            SessionPhase::AwaitingOpponentMove(_) => write!(f, "Opponent is thinking...")?,
            SessionPhase::Terminal(status) => match status.outcome_for(self.human) {
                Some(Outcome::Win) => write!(f, "{} wins!", self.player_label)?,
                Some(Outcome::Loss) => write!(f, "Game over, {} loses.", self.player_label)?,
                Some(Outcome::Draw) | None => write!(f, "Draw.")?,
            },
        }
        if let Some(best) = self.best_score {
            write!(f, "  (best: {})", best)?;
        }
        Ok(())
    }
}
