//! SQLite persistence for best scores and finished games.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{BestScore, GameResult, NewBestScore, NewGameResult};
pub use repository::ScoreRepository;
