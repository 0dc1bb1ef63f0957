//! Rule engine contract implemented by every game variant.

use crate::error::MoveError;
use crate::status::{GameKind, Player, TerminalStatus};
use rand::Rng;
use serde::Serialize;
use std::fmt::{Debug, Display};

/// Rules of one finite, turn-based game.
///
/// Implementations are pure: states are values, moves never mutate the
/// state they are applied to, and the only outside input is the RNG passed
/// to [`Variant::new_state`].
pub trait Variant: Clone + Debug {
    /// Full game state (board, deck, letters, ...).
    type State: Clone + Debug + Display + PartialEq + Serialize;

    /// A single player action.
    type Move: Copy + Debug + Display + PartialEq;

    /// Which game this is.
    fn kind(&self) -> GameKind;

    /// Builds a fresh state for a new session.
    fn new_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::State;

    /// Validates `mv` against `state` and returns the successor state.
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameOver`] if `state` is already terminal
    /// - [`MoveError::InvalidMove`] if `mv` addresses nothing in this game
    /// - [`MoveError::OccupiedSlot`] if the slot is already taken
    fn apply_move(&self, state: &Self::State, mv: Self::Move) -> Result<Self::State, MoveError>;

    /// Reports whether `state` is won, drawn, lost or still ongoing.
    fn check_terminal(&self, state: &Self::State) -> TerminalStatus;

    /// Parses player text input into a move.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidMove`] when the text names no move.
    fn parse_move(&self, input: &str) -> Result<Self::Move, MoveError>;

    /// Attempts spent so far (moves, guesses, flipped pairs).
    fn attempts(&self, state: &Self::State) -> u32;

    /// Side expected to move next. Solo games always return [`Player::X`].
    fn to_move(&self, _state: &Self::State) -> Player {
        Player::X
    }

    /// Slot indices the presentation layer should highlight.
    fn highlight(&self, _state: &Self::State) -> Vec<usize> {
        Vec::new()
    }

    /// Slots that hold a terminal marker and must never revert.
    fn locked_slots(&self, state: &Self::State) -> Vec<usize>;
}
