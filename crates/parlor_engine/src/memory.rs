//! Memory matching: flip two cards at a time and find every pair.

use crate::error::MoveError;
use crate::status::{GameKind, Player, TerminalStatus};
use crate::variant::Variant;
use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use tracing::{debug, instrument};

/// Pairs on the table when none is configured.
pub const DEFAULT_PAIRS: usize = 8;

/// Most pairs a deck can hold (one per letter).
pub const MAX_PAIRS: usize = 26;

/// Visibility of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Face {
    /// Face down.
    Hidden,
    /// Face up, waiting for its partner flip.
    Revealed,
    /// Paired; stays face up for the rest of the game.
    Matched,
}

/// One card on the table.
///
/// Serializes as `{symbol, face}` with `symbol` null while face down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    symbol: char,
    face: Face,
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut card = serializer.serialize_struct("Card", 2)?;
        card.serialize_field("symbol", &self.visible_symbol())?;
        card.serialize_field("face", &self.face)?;
        card.end()
    }
}

impl Card {
    /// Returns the card's face.
    pub fn face(&self) -> Face {
        self.face
    }

    /// Returns the symbol if the card is face up.
    pub fn visible_symbol(&self) -> Option<char> {
        match self.face {
            Face::Hidden => None,
            Face::Revealed | Face::Matched => Some(self.symbol),
        }
    }
}

/// Index of the card to flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[display("card {}", _0 + 1)]
pub struct Flip(pub usize);

/// Memory rules: number of pairs and an optional attempt limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memory {
    pairs: usize,
    max_attempts: Option<u32>,
}

impl Memory {
    /// Creates memory rules. `pairs` is clamped to `1..=MAX_PAIRS`.
    pub fn new(pairs: usize, max_attempts: Option<u32>) -> Self {
        Self {
            pairs: pairs.clamp(1, MAX_PAIRS),
            max_attempts,
        }
    }

    /// Returns the number of pairs.
    pub fn pairs(&self) -> usize {
        self.pairs
    }

    /// Lays out a deck in the given symbol order, all face down.
    pub fn state_for(&self, symbols: &[char]) -> MemoryState {
        MemoryState {
            cards: symbols
                .iter()
                .map(|&symbol| Card {
                    symbol,
                    face: Face::Hidden,
                })
                .collect(),
            first_pick: None,
            attempts: 0,
            matched_pairs: 0,
            last_mismatch: None,
            mismatch_symbols: None,
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(DEFAULT_PAIRS, None)
    }
}

/// Memory game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct MemoryState {
    /// Cards in table order.
    cards: Vec<Card>,
    /// The card flipped first in the current attempt.
    first_pick: Option<usize>,
    /// Completed two-card attempts.
    attempts: u32,
    /// Pairs found so far.
    matched_pairs: u32,
    /// The last pair that did not match, turned back face down.
    last_mismatch: Option<(usize, usize)>,
    /// Symbols of `last_mismatch`, shown once before they are hidden again.
    mismatch_symbols: Option<(char, char)>,
}

impl std::fmt::Display for MemoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, chunk) in self.cards.chunks(4).enumerate() {
            let cells: Vec<String> = chunk
                .iter()
                .enumerate()
                .map(|(col, card)| {
                    let number = row * 4 + col + 1;
                    match card.visible_symbol() {
                        Some(symbol) if card.face == Face::Matched => format!("[{}]", symbol),
                        Some(symbol) => format!(" {} ", symbol),
                        None => format!("{:>2}.", number),
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        write!(f, "Attempts: {}  Pairs: {}/{}", self.attempts, self.matched_pairs, self.cards.len() / 2)?;
        if let Some((a, b)) = self.mismatch_symbols {
            write!(f, "\nNo match: {} and {}", a, b)?;
        }
        Ok(())
    }
}

impl Variant for Memory {
    type State = MemoryState;
    type Move = Flip;

    fn kind(&self) -> GameKind {
        GameKind::Memory
    }

    fn new_state<R: Rng + ?Sized>(&self, rng: &mut R) -> MemoryState {
        let mut symbols: Vec<char> = ('A'..='Z')
            .take(self.pairs)
            .flat_map(|c| [c, c])
            .collect();
        symbols.shuffle(rng);
        debug!(cards = symbols.len(), "Deck shuffled");
        self.state_for(&symbols)
    }

    #[instrument(skip(self, state))]
    fn apply_move(&self, state: &MemoryState, flip: Flip) -> Result<MemoryState, MoveError> {
        if self.check_terminal(state).is_terminal() {
            return Err(MoveError::GameOver);
        }
        let Flip(index) = flip;
        let card = state
            .cards
            .get(index)
            .ok_or_else(|| MoveError::invalid(format!("there is no {}", flip)))?;
        if card.face != Face::Hidden {
            return Err(MoveError::occupied(flip));
        }

        let mut next = state.clone();
        next.last_mismatch = None;
        next.mismatch_symbols = None;
        match state.first_pick {
            None => {
                next.cards[index].face = Face::Revealed;
                next.first_pick = Some(index);
            }
            Some(first) => {
                next.first_pick = None;
                next.attempts += 1;
                if state.cards[first].symbol == card.symbol {
                    next.cards[first].face = Face::Matched;
                    next.cards[index].face = Face::Matched;
                    next.matched_pairs += 1;
                    debug!(first, second = index, "Pair matched");
                } else {
                    next.cards[first].face = Face::Hidden;
                    next.last_mismatch = Some((first, index));
                    next.mismatch_symbols = Some((state.cards[first].symbol, card.symbol));
                    debug!(first, second = index, "No match");
                }
            }
        }
        Ok(next)
    }

    fn check_terminal(&self, state: &MemoryState) -> TerminalStatus {
        if state.matched_pairs as usize * 2 == state.cards.len() {
            TerminalStatus::Won(Player::X)
        } else if self.max_attempts.is_some_and(|max| state.attempts >= max) {
            TerminalStatus::Lost
        } else {
            TerminalStatus::Ongoing
        }
    }

    /// Cards are numbered from 1 on screen.
    fn parse_move(&self, input: &str) -> Result<Flip, MoveError> {
        match input.trim().parse::<usize>() {
            Ok(number) if number >= 1 => Ok(Flip(number - 1)),
            _ => Err(MoveError::invalid(format!("'{}' is not a card number", input.trim()))),
        }
    }

    fn attempts(&self, state: &MemoryState) -> u32 {
        state.attempts
    }

    fn highlight(&self, state: &MemoryState) -> Vec<usize> {
        state
            .last_mismatch
            .map(|(a, b)| vec![a, b])
            .unwrap_or_default()
    }

    fn locked_slots(&self, state: &MemoryState) -> Vec<usize> {
        state
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.face == Face::Matched)
            .map(|(index, _)| index)
            .collect()
    }
}
