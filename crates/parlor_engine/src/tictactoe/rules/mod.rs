//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board). They are shared by the
//! rule engine, which decides terminal status, and the heuristic opponent,
//! which looks for lines one mark short of completion.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, Line, check_winner, completing_square, winning_line};
