//! Tic-tac-toe: the adversarial line game.

mod opponent;
mod position;
pub mod rules;
mod types;

pub use opponent::HeuristicLineGame;
pub use position::Position;
pub use types::{Board, Square, TicTacToeState};

use crate::error::MoveError;
use crate::status::{GameKind, Player, TerminalStatus};
use crate::variant::Variant;
use rand::Rng;
use tracing::{debug, instrument};

/// Rule engine for 3x3 tic-tac-toe. X always opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicTacToe;

impl Variant for TicTacToe {
    type State = TicTacToeState;
    type Move = Position;

    fn kind(&self) -> GameKind {
        GameKind::TicTacToe
    }

    fn new_state<R: Rng + ?Sized>(&self, _rng: &mut R) -> TicTacToeState {
        TicTacToeState::new()
    }

    #[instrument(skip(self, state), fields(player = ?state.to_move))]
    fn apply_move(&self, state: &TicTacToeState, pos: Position) -> Result<TicTacToeState, MoveError> {
        if self.check_terminal(state).is_terminal() {
            return Err(MoveError::GameOver);
        }
        if !state.board.is_empty(pos) {
            return Err(MoveError::occupied(pos));
        }

        let mut next = state.clone();
        next.board.place(pos, state.to_move);
        next.history.push(pos);
        next.to_move = state.to_move.opponent();
        debug!(position = %pos, "Mark placed");
        Ok(next)
    }

    fn check_terminal(&self, state: &TicTacToeState) -> TerminalStatus {
        if let Some(winner) = rules::check_winner(&state.board) {
            TerminalStatus::Won(winner)
        } else if rules::is_draw(&state.board) {
            TerminalStatus::Drawn
        } else {
            TerminalStatus::Ongoing
        }
    }

    fn parse_move(&self, input: &str) -> Result<Position, MoveError> {
        Position::parse(input)
    }

    fn attempts(&self, state: &TicTacToeState) -> u32 {
        (state.board.count(Player::X) + state.board.count(Player::O)) as u32
    }

    fn to_move(&self, state: &TicTacToeState) -> Player {
        state.to_move
    }

    fn highlight(&self, state: &TicTacToeState) -> Vec<usize> {
        rules::winning_line(&state.board)
            .map(|(_, line)| line.iter().map(|pos| pos.to_index()).collect())
            .unwrap_or_default()
    }

    fn locked_slots(&self, state: &TicTacToeState) -> Vec<usize> {
        Position::ALL
            .iter()
            .filter(|pos| !state.board.is_empty(**pos))
            .map(|pos| pos.to_index())
            .collect()
    }
}
