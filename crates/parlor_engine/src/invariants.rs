//! Transition invariants checked by the session controller.

use crate::variant::Variant;

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invariant violated: {}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Locked slots are monotonic: a placed mark, matched pair or guessed
/// letter never reverts within a session.
pub fn slots_stay_locked<V: Variant>(
    variant: &V,
    before: &V::State,
    after: &V::State,
) -> Result<(), InvariantViolation> {
    let after_locked = variant.locked_slots(after);
    let reverted: Vec<usize> = variant
        .locked_slots(before)
        .into_iter()
        .filter(|slot| !after_locked.contains(slot))
        .collect();
    if reverted.is_empty() {
        Ok(())
    } else {
        Err(InvariantViolation::new(format!(
            "locked slots {:?} reverted",
            reverted
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Flip, Memory};
    use crate::tictactoe::{Position, TicTacToe, TicTacToeState};

    #[test]
    fn test_move_keeps_slots_locked() {
        let before = TicTacToe
            .apply_move(&TicTacToeState::new(), Position::Center)
            .unwrap();
        let after = TicTacToe.apply_move(&before, Position::TopLeft).unwrap();
        assert!(slots_stay_locked(&TicTacToe, &before, &after).is_ok());
    }

    #[test]
    fn test_reverting_to_fresh_state_violates() {
        let before = TicTacToe
            .apply_move(&TicTacToeState::new(), Position::Center)
            .unwrap();
        let violation = slots_stay_locked(&TicTacToe, &before, &TicTacToeState::new())
            .expect_err("mark disappeared");
        assert!(violation.description.contains("[4]"));
    }

    #[test]
    fn test_mismatched_cards_are_not_locked() {
        let game = Memory::new(2, None);
        let start = game.state_for(&['A', 'B', 'A', 'B']);
        let revealed = game.apply_move(&start, Flip(0)).unwrap();
        let mismatched = game.apply_move(&revealed, Flip(1)).unwrap();
        assert!(slots_stay_locked(&game, &revealed, &mismatched).is_ok());
    }
}
