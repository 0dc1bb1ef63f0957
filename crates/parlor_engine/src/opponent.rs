//! Opponent policies: who answers the player's moves.

use crate::variant::Variant;
use rand::Rng;
use std::fmt::Debug;

/// Move selection for the computer-controlled side.
///
/// A policy is a pure function of the state plus the injected RNG. The
/// session controller only calls [`Opponent::choose_move`] while the state
/// is ongoing and it is the opponent's turn, so at least one legal move
/// exists whenever it is invoked.
pub trait Opponent<V: Variant>: Debug {
    /// Whether this policy ever takes a turn.
    fn is_active(&self) -> bool {
        true
    }

    /// Picks the opponent's next move, or `None` if the policy has none.
    fn choose_move<R: Rng + ?Sized>(&self, variant: &V, state: &V::State, rng: &mut R) -> Option<V::Move>;
}

/// Policy for solo games: never takes a turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpponent;

impl<V: Variant> Opponent<V> for NoOpponent {
    fn is_active(&self) -> bool {
        false
    }

    fn choose_move<R: Rng + ?Sized>(&self, _variant: &V, _state: &V::State, _rng: &mut R) -> Option<V::Move> {
        None
    }
}
