//! Controller phases and turn settings.

use crate::status::TerminalStatus;
use serde::{Deserialize, Serialize};

/// Permission for exactly one scheduled opponent move.
///
/// Issued when the controller enters [`SessionPhase::AwaitingOpponentMove`]
/// and redeemed with `play_opponent_turn`. Any accepted move or reset makes
/// older tickets stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OpponentTurn {
    pub(crate) epoch: u64,
}

/// Where the session controller is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// The player may submit a move.
    AwaitingHumanMove,
    /// The opponent moves next, after the presentation delay. Player input is ignored.
    AwaitingOpponentMove(OpponentTurn),
    /// The game is over until reset.
    Terminal(TerminalStatus),
}

impl SessionPhase {
    /// Returns the pending opponent ticket, if any.
    pub fn opponent_turn(&self) -> Option<OpponentTurn> {
        match self {
            SessionPhase::AwaitingOpponentMove(turn) => Some(*turn),
            _ => None,
        }
    }
}

/// Which side takes the first move (X) in a new game.
///
/// Defaults to [`FirstPlayer::Human`] so the player moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstPlayer {
    /// The player opens and plays as X.
    #[default]
    Human,
    /// The opponent opens as X; the player takes O.
    Opponent,
}
