//! Named board positions for tic-tac-toe moves.

use crate::error::MoveError;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// A position on the tic-tac-toe board (index 0-8, row-major).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumIter,
)]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

impl Position {
    /// All 9 positions in index order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates a position from a board index.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidMove`] for indices above 8.
    pub fn from_index(index: usize) -> Result<Self, MoveError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| MoveError::invalid(format!("position {} is off the board (0-8)", index)))
    }

    /// Parses the square number shown on the board (1-9) or a label.
    ///
    /// Labels match case-insensitively, with or without the hyphen.
    #[instrument]
    pub fn parse(input: &str) -> Result<Self, MoveError> {
        let input = input.trim();
        if let Ok(number) = input.parse::<usize>() {
            return match number {
                1..=9 => Self::from_index(number - 1),
                _ => Err(MoveError::invalid(format!("square {} does not exist (1-9)", number))),
            };
        }

        let wanted = normalise(input);
        Position::iter()
            .find(|pos| normalise(pos.label()) == wanted)
            .ok_or_else(|| MoveError::invalid(format!("unknown square '{}'", input)))
    }
}

fn normalise(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl TryFrom<usize> for Position {
    type Error = MoveError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
