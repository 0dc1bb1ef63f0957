//! Number guesser: find the secret with higher/lower hints.

use crate::error::MoveError;
use crate::status::{GameKind, Player, TerminalStatus};
use crate::variant::Variant;
use derive_getters::Getters;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, instrument};

/// Feedback after a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
pub enum Hint {
    /// The secret is higher.
    #[display("Too low")]
    TooLow,
    /// The secret is lower.
    #[display("Too high")]
    TooHigh,
    /// Found it.
    #[display("Correct")]
    Correct,
}

/// A guessed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::Display)]
pub struct Guess(pub u32);

/// Guesser rules: inclusive range and attempt limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guesser {
    low: u32,
    high: u32,
    max_attempts: u32,
}

impl Guesser {
    /// Creates guesser rules. Bounds are swapped if given in reverse.
    pub fn new(low: u32, high: u32, max_attempts: u32) -> Self {
        Self {
            low: low.min(high),
            high: low.max(high),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Starts a state with a known secret.
    pub fn state_for(&self, secret: u32) -> GuesserState {
        GuesserState {
            low: self.low,
            high: self.high,
            secret: secret.clamp(self.low, self.high),
            guesses: Vec::new(),
            last_hint: None,
            max_attempts: self.max_attempts,
        }
    }
}

impl Default for Guesser {
    fn default() -> Self {
        Self::new(1, 100, 7)
    }
}

/// Guesser game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct GuesserState {
    /// Lowest allowed guess.
    low: u32,
    /// Highest allowed guess.
    high: u32,
    #[serde(skip)]
    #[getter(skip)]
    secret: u32,
    /// Guesses in order.
    guesses: Vec<Guess>,
    /// Hint for the latest guess.
    last_hint: Option<Hint>,
    /// Guesses allowed.
    max_attempts: u32,
}

impl GuesserState {
    /// Reveals the secret. Only meaningful once the game is over.
    pub fn answer(&self) -> u32 {
        self.secret
    }
}

impl std::fmt::Display for GuesserState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Guess a number between {} and {} ({} of {} used)",
            self.low,
            self.high,
            self.guesses.len(),
            self.max_attempts
        )?;
        if let (Some(last), Some(hint)) = (self.guesses.last(), self.last_hint) {
            write!(f, "\n{}: {}", last, hint)?;
        }
        Ok(())
    }
}

impl Variant for Guesser {
    type State = GuesserState;
    type Move = Guess;

    fn kind(&self) -> GameKind {
        GameKind::Guesser
    }

    fn new_state<R: Rng + ?Sized>(&self, rng: &mut R) -> GuesserState {
        let secret = rng.random_range(self.low..=self.high);
        debug!(low = self.low, high = self.high, "Secret chosen");
        self.state_for(secret)
    }

    #[instrument(skip(self, state))]
    fn apply_move(&self, state: &GuesserState, guess: Guess) -> Result<GuesserState, MoveError> {
        if self.check_terminal(state).is_terminal() {
            return Err(MoveError::GameOver);
        }
        let Guess(value) = guess;
        if !(state.low..=state.high).contains(&value) {
            return Err(MoveError::invalid(format!(
                "{} is outside {}-{}",
                value, state.low, state.high
            )));
        }
        if state.guesses.contains(&guess) {
            return Err(MoveError::occupied(guess));
        }

        let hint = match value.cmp(&state.secret) {
            std::cmp::Ordering::Less => Hint::TooLow,
            std::cmp::Ordering::Greater => Hint::TooHigh,
            std::cmp::Ordering::Equal => Hint::Correct,
        };
        let mut next = state.clone();
        next.guesses.push(guess);
        next.last_hint = Some(hint);
        debug!(%hint, attempts = next.guesses.len(), "Guess evaluated");
        Ok(next)
    }

    fn check_terminal(&self, state: &GuesserState) -> TerminalStatus {
        if state.last_hint == Some(Hint::Correct) {
            TerminalStatus::Won(Player::X)
        } else if state.guesses.len() as u32 >= state.max_attempts {
            TerminalStatus::Lost
        } else {
            TerminalStatus::Ongoing
        }
    }

    fn parse_move(&self, input: &str) -> Result<Guess, MoveError> {
        input
            .trim()
            .parse::<u32>()
            .map(Guess)
            .map_err(|_| MoveError::invalid(format!("'{}' is not a number", input.trim())))
    }

    fn attempts(&self, state: &GuesserState) -> u32 {
        state.guesses.len() as u32
    }

    fn locked_slots(&self, state: &GuesserState) -> Vec<usize> {
        state.guesses.iter().map(|Guess(v)| *v as usize).collect()
    }
}
