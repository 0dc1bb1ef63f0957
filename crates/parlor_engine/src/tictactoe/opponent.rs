//! One-ply heuristic opponent for line games.

use super::rules::completing_square;
use super::{Position, TicTacToe, TicTacToeState};
use crate::opponent::Opponent;
use crate::status::Player;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

/// Win-now, then block, then a uniformly random empty square.
///
/// Looks exactly one move ahead. It can miss forced wins, but it never
/// lets the other side complete a line it could have blocked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeuristicLineGame;

impl HeuristicLineGame {
    /// Chooses a square for `player` on the given state.
    #[instrument(skip(self, state, rng))]
    pub fn choose_for<R: Rng + ?Sized>(
        &self,
        state: &TicTacToeState,
        player: Player,
        rng: &mut R,
    ) -> Option<Position> {
        let board = state.board();

        if let Some(pos) = completing_square(board, player) {
            debug!(position = %pos, "Taking winning square");
            return Some(pos);
        }

        if let Some(pos) = completing_square(board, player.opponent()) {
            debug!(position = %pos, "Blocking opponent line");
            return Some(pos);
        }

        let choice = board.empty_positions().choose(rng).copied();
        debug!(position = ?choice, "No forced square, picking at random");
        choice
    }
}

impl Opponent<TicTacToe> for HeuristicLineGame {
    fn choose_move<R: Rng + ?Sized>(
        &self,
        _variant: &TicTacToe,
        state: &TicTacToeState,
        rng: &mut R,
    ) -> Option<Position> {
        self.choose_for(state, state.to_move(), rng)
    }
}
