//! Hangman: reveal a hidden word one letter at a time.

use crate::error::MoveError;
use crate::status::{GameKind, Player, TerminalStatus};
use crate::variant::Variant;
use derive_getters::Getters;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

/// Wrong guesses allowed when none is configured.
pub const DEFAULT_MAX_WRONG: u8 = 6;

const FALLBACK_WORD: &str = "PARLOR";

/// A guessed letter, always ASCII upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::Display)]
pub struct Letter(char);

impl Letter {
    /// Creates a letter from any ASCII alphabetic character.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidMove`] for anything else.
    pub fn new(c: char) -> Result<Self, MoveError> {
        if c.is_ascii_alphabetic() {
            Ok(Self(c.to_ascii_uppercase()))
        } else {
            Err(MoveError::invalid(format!("'{}' is not a letter", c)))
        }
    }

    /// Returns the upper-case character.
    pub fn as_char(self) -> char {
        self.0
    }

    /// Alphabet index (A = 0).
    pub fn index(self) -> usize {
        (self.0 as u8 - b'A') as usize
    }
}

/// Hangman rules: a word list and the number of wrong guesses allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hangman {
    words: Vec<String>,
    max_wrong: u8,
}

impl Hangman {
    /// Creates hangman rules.
    ///
    /// Words are upper-cased and anything that is not purely ASCII
    /// alphabetic is dropped.
    #[instrument(skip(words), fields(count = words.len()))]
    pub fn new(words: Vec<String>, max_wrong: u8) -> Self {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_ascii_uppercase())
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_alphabetic()))
            .collect();
        if words.is_empty() {
            warn!("No usable hangman words, falling back to built-in word");
        }
        Self {
            words,
            max_wrong: max_wrong.max(1),
        }
    }

    /// Returns the usable word list.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns the number of wrong guesses that loses the game.
    pub fn max_wrong(&self) -> u8 {
        self.max_wrong
    }

    /// Starts a state for a known word.
    pub fn state_for(&self, word: &str) -> HangmanState {
        HangmanState {
            word: word.to_ascii_uppercase().chars().collect(),
            guessed: BTreeSet::new(),
            wrong: 0,
            max_wrong: self.max_wrong,
        }
    }
}

/// Hangman game state.
///
/// Serializes as `{masked, guessed, wrong, max_wrong}`; the word itself
/// only ever leaves as its masked pattern.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct HangmanState {
    /// The hidden word.
    #[getter(skip)]
    word: Vec<char>,
    /// Letters guessed so far.
    guessed: BTreeSet<Letter>,
    /// Wrong guesses so far.
    wrong: u8,
    /// Wrong guesses that end the game.
    max_wrong: u8,
}

impl HangmanState {
    /// The word with unguessed letters replaced by `_`.
    pub fn masked(&self) -> String {
        self.word
            .iter()
            .map(|c| match Letter::new(*c) {
                Ok(letter) if self.guessed.contains(&letter) => *c,
                _ => '_',
            })
            .collect()
    }

    /// Reveals the word. Only meaningful once the game is over.
    pub fn answer(&self) -> String {
        self.word.iter().collect()
    }

    fn is_solved(&self) -> bool {
        self.word
            .iter()
            .all(|c| Letter::new(*c).is_ok_and(|letter| self.guessed.contains(&letter)))
    }
}

impl Serialize for HangmanState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HangmanState", 4)?;
        state.serialize_field("masked", &self.masked())?;
        state.serialize_field("guessed", &self.guessed)?;
        state.serialize_field("wrong", &self.wrong)?;
        state.serialize_field("max_wrong", &self.max_wrong)?;
        state.end()
    }
}

impl std::fmt::Display for HangmanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let spaced: Vec<String> = self.masked().chars().map(String::from).collect();
        let guessed: String = self.guessed.iter().map(|l| l.as_char()).collect();
        write!(
            f,
            "{}\nWrong: {}/{}  Guessed: {}",
            spaced.join(" "),
            self.wrong,
            self.max_wrong,
            if guessed.is_empty() { "-".to_string() } else { guessed }
        )
    }
}

impl Variant for Hangman {
    type State = HangmanState;
    type Move = Letter;

    fn kind(&self) -> GameKind {
        GameKind::Hangman
    }

    fn new_state<R: Rng + ?Sized>(&self, rng: &mut R) -> HangmanState {
        let word = self
            .words
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(FALLBACK_WORD);
        debug!(length = word.len(), "Word chosen");
        self.state_for(word)
    }

    #[instrument(skip(self, state))]
    fn apply_move(&self, state: &HangmanState, letter: Letter) -> Result<HangmanState, MoveError> {
        if self.check_terminal(state).is_terminal() {
            return Err(MoveError::GameOver);
        }
        if state.guessed.contains(&letter) {
            return Err(MoveError::occupied(letter));
        }

        let mut next = state.clone();
        next.guessed.insert(letter);
        if !state.word.contains(&letter.as_char()) {
            next.wrong += 1;
            debug!(wrong = next.wrong, "Letter not in word");
        }
        Ok(next)
    }

    fn check_terminal(&self, state: &HangmanState) -> TerminalStatus {
        if state.is_solved() {
            TerminalStatus::Won(Player::X)
        } else if state.wrong >= state.max_wrong {
            TerminalStatus::Lost
        } else {
            TerminalStatus::Ongoing
        }
    }

    fn parse_move(&self, input: &str) -> Result<Letter, MoveError> {
        let mut chars = input.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::new(c),
            _ => Err(MoveError::invalid("type exactly one letter")),
        }
    }

    fn attempts(&self, state: &HangmanState) -> u32 {
        state.guessed.len() as u32
    }

    fn locked_slots(&self, state: &HangmanState) -> Vec<usize> {
        state.guessed.iter().map(|l| l.index()).collect()
    }
}
