//! Command-line interface for parlor.

use clap::{Parser, Subcommand, ValueEnum};
use parlor_engine::GameKind;

/// Parlor - small turn-based games in the terminal
#[derive(Parser, Debug)]
#[command(name = "parlor")]
#[command(about = "Tic-tac-toe, hangman, memory, number guessing and a timed tap round", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (defaults apply if it does not exist)
    #[arg(short, long, default_value = "parlor.toml", global = true)]
    pub config: std::path::PathBuf,

    /// Profile to store scores under (overrides the config file)
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Path to the database file (overrides the config file)
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Print one JSON object per line instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game
    Play {
        /// Which game
        #[arg(value_enum)]
        game: GameArg,

        /// Seed for a reproducible game
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show wins, losses and best scores for the profile
    Stats,
}

/// Game names accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameArg {
    /// Tic-tac-toe against the computer
    #[value(name = "tictactoe", alias = "ttt")]
    TicTacToe,
    /// Guess the word letter by letter
    Hangman,
    /// Find matching pairs
    Memory,
    /// Find the secret number
    Guesser,
    /// Hit as many targets as you can before time runs out
    Tap,
}

impl From<GameArg> for GameKind {
    fn from(arg: GameArg) -> Self {
        match arg {
            GameArg::TicTacToe => GameKind::TicTacToe,
            GameArg::Hangman => GameKind::Hangman,
            GameArg::Memory => GameKind::Memory,
            GameArg::Guesser => GameKind::Guesser,
            GameArg::Tap => GameKind::Tap,
        }
    }
}
