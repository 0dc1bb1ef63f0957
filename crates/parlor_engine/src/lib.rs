//! Parlor engine - rules, opponents and session control for small turn-based games
//!
//! Everything here is pure: no terminal, no database, no clock. Hosts drive a
//! [`GameSession`] with player moves and scheduled opponent turns, and plug
//! in output and persistence through the [`RenderSink`], [`ScoreStore`] and
//! [`PlayerIdentity`] ports.
//!
//! # Games
//!
//! - **Tic-tac-toe** against [`HeuristicLineGame`] (win, else block, else random)
//! - **Hangman** with a word list and a wrong-guess limit
//! - **Memory** pairs on a shuffled deck
//! - **Guesser** for a secret number with high/low hints
//! - **Tap** timed scoring ([`TapRound`]), driven by the host's clock
//!
//! # Example
//!
//! ```
//! use parlor_engine::{GameSession, HeuristicLineGame, Position, SessionPhase, TicTacToe, session_rng};
//!
//! let mut session = GameSession::new(TicTacToe, HeuristicLineGame, session_rng(Some(7)));
//! let phase = session.submit_move(Position::Center).unwrap();
//! let turn = phase.opponent_turn().unwrap();
//! // ... the host waits its presentation delay ...
//! assert_eq!(session.play_opponent_turn(turn).unwrap(), SessionPhase::AwaitingHumanMove);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod error;
mod guesser;
mod hangman;
mod invariants;
mod memory;
mod opponent;
mod ports;
mod rng;
mod scoreboard;
mod session;
mod status;
mod tap;
mod tictactoe;
mod variant;

// Crate-level exports - Errors
pub use error::{MoveError, StoreError};

// Crate-level exports - Shared game vocabulary
pub use status::{GameKind, Outcome, Player, TerminalStatus};
pub use variant::Variant;
pub use opponent::{NoOpponent, Opponent};
pub use rng::session_rng;

// Crate-level exports - Tic-tac-toe
pub use tictactoe::rules::{
    LINES, Line, check_winner, completing_square, is_draw, is_full, winning_line,
};
pub use tictactoe::{Board, HeuristicLineGame, Position, Square, TicTacToe, TicTacToeState};

// Crate-level exports - Solo variants
pub use guesser::{Guess, Guesser, GuesserState, Hint};
pub use hangman::{DEFAULT_MAX_WRONG, Hangman, HangmanState, Letter};
pub use memory::{Card, DEFAULT_PAIRS, Face, Flip, MAX_PAIRS, Memory, MemoryState};
pub use tap::{DEFAULT_DURATION_SECS, LEVEL_STEP, PENALTY, TapRound, Target};

// Crate-level exports - Session control
pub use invariants::{InvariantViolation, slots_stay_locked};
pub use scoreboard::{ScoreBoard, Tally};
pub use session::{FirstPlayer, GameSession, OpponentTurn, SessionPhase, Snapshot};

// Crate-level exports - Ports
pub use ports::{
    DEFAULT_PLAYER_LABEL, FixedIdentity, MemoryStore, NullSink, PlayerIdentity, RenderSink,
    ScoreStore, display_label, score_key,
};
