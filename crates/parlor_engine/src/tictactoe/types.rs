//! Core domain types for tic-tac-toe.

use super::position::Position;
use crate::status::Player;
use serde::{Deserialize, Serialize};

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Builds a board from nine squares in row-major order.
    pub fn from_squares(squares: [Square; 9]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Places a mark. Only the rule engine writes squares.
    pub(crate) fn place(&mut self, pos: Position, player: Player) {
        self.squares[pos.to_index()] = Square::Occupied(player);
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Returns the empty positions in index order.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::ALL
            .iter()
            .copied()
            .filter(|pos| self.is_empty(*pos))
            .collect()
    }

    /// Counts the marks a player has on the board.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|s| **s == Square::Occupied(player))
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    /// Empty squares show the number a player types to claim them.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.squares[pos] {
                    Square::Empty => write!(f, "{}", pos + 1)?,
                    Square::Occupied(player) => write!(f, "{}", player)?,
                }
                if col < 2 {
                    write!(f, "|")?;
                }
            }
            if row < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// Complete tic-tac-toe state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeState {
    pub(super) board: Board,
    pub(super) to_move: Player,
    pub(super) history: Vec<Position>,
}

impl TicTacToeState {
    /// Creates an empty board with X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Player::X,
            history: Vec::new(),
        }
    }

    /// Builds a state from a board. The side to move is derived from mark counts.
    pub fn from_board(board: Board) -> Self {
        let to_move = if board.count(Player::X) > board.count(Player::O) {
            Player::O
        } else {
            Player::X
        };
        Self {
            board,
            to_move,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the positions played in this session, in order.
    pub fn history(&self) -> &[Position] {
        &self.history
    }
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_numbers_empty_squares() {
        let mut board = Board::new();
        board.place(Position::Center, Player::X);
        board.place(Position::TopLeft, Player::O);
        assert_eq!(board.to_string(), "O|2|3\n-+-+-\n4|X|6\n-+-+-\n7|8|9");
    }

    #[test]
    fn test_from_board_derives_turn() {
        let mut board = Board::new();
        assert_eq!(TicTacToeState::from_board(board.clone()).to_move(), Player::X);
        board.place(Position::Center, Player::X);
        assert_eq!(TicTacToeState::from_board(board.clone()).to_move(), Player::O);
        board.place(Position::TopLeft, Player::O);
        assert_eq!(TicTacToeState::from_board(board).to_move(), Player::X);
    }

    #[test]
    fn test_empty_positions() {
        let mut board = Board::new();
        assert_eq!(board.empty_positions().len(), 9);
        board.place(Position::BottomRight, Player::O);
        assert!(!board.empty_positions().contains(&Position::BottomRight));
        assert_eq!(board.empty_positions().len(), 8);
    }
}
