//! Tests for the SQLite score repository.

use tempfile::NamedTempFile;

use parlor::{NewGameResult, ScoreRepository};
use parlor_engine::{
    GameKind, GameSession, Guess, Guesser, NoOpponent, Outcome, ScoreStore, session_rng,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, ScoreRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = ScoreRepository::open(db_path).expect("Failed to open repository");
    (db_file, repo)
}

#[test]
fn test_missing_best_score_is_none() {
    let (_db, repo) = setup_test_db();
    assert!(repo.best_score("nobody:memory").expect("Query failed").is_none());
    assert_eq!(repo.load_best_score("nobody:memory").expect("Load failed"), None);
}

#[test]
fn test_best_score_upsert_replaces_value() {
    let (_db, repo) = setup_test_db();
    repo.save_best_score("ayu:memory", 14).expect("Save failed");
    repo.save_best_score("ayu:memory", 11).expect("Save failed");

    let row = repo.best_score("ayu:memory").expect("Query failed").expect("Row missing");
    assert_eq!(*row.score(), 11);
    assert_eq!(repo.load_best_score("ayu:memory").expect("Load failed"), Some(11));
}

#[test]
fn test_reopening_keeps_scores() {
    let (db, repo) = setup_test_db();
    repo.save_best_score("ayu:guesser", 4).expect("Save failed");

    let path = db.path().to_str().expect("Invalid path").to_string();
    let reopened = ScoreRepository::open(path).expect("Reopen failed");
    assert_eq!(reopened.load_best_score("ayu:guesser").expect("Load failed"), Some(4));
}

#[test]
fn test_record_game() {
    let (_db, repo) = setup_test_db();
    let row = NewGameResult::from_outcome("ayu:tictactoe", GameKind::TicTacToe, Outcome::Draw, 9);

    let recorded = repo.record_game(row).expect("Record failed");
    assert_eq!(recorded.score_key(), "ayu:tictactoe");
    assert_eq!(recorded.game(), "tictactoe");
    assert_eq!(recorded.outcome(), "draw");
    assert_eq!(*recorded.attempts(), 9);
    assert_eq!(recorded.parse_game().expect("Bad game"), GameKind::TicTacToe);
    assert_eq!(recorded.parse_outcome().expect("Bad outcome"), Outcome::Draw);
}

#[test]
fn test_results_are_scoped_to_profile() {
    let (_db, repo) = setup_test_db();
    repo.record_result("ayu:memory", GameKind::Memory, Outcome::Win, 12)
        .expect("Record failed");
    repo.record_result("bo:memory", GameKind::Memory, Outcome::Loss, 20)
        .expect("Record failed");
    // A profile whose name only starts with another's must not leak in.
    repo.record_result("ayu2:memory", GameKind::Memory, Outcome::Win, 8)
        .expect("Record failed");

    let results = repo.results_for("ayu").expect("Query failed");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score_key(), "ayu:memory");
}

#[test]
fn test_stats_aggregate_outcomes_and_best_scores() {
    let (_db, repo) = setup_test_db();
    for (outcome, attempts) in [(Outcome::Win, 9), (Outcome::Loss, 7), (Outcome::Win, 5)] {
        repo.record_result("ayu:guesser", GameKind::Guesser, outcome, attempts)
            .expect("Record failed");
    }
    repo.record_result("ayu:tictactoe", GameKind::TicTacToe, Outcome::Draw, 9)
        .expect("Record failed");
    repo.save_best_score("ayu:tap", 87).expect("Save failed");

    let board = repo.stats("ayu").expect("Stats failed");
    let guesser = board.tally(GameKind::Guesser);
    assert_eq!(guesser.games(), 3);
    assert_eq!(*guesser.wins(), 2);
    assert_eq!(*guesser.losses(), 1);
    assert_eq!(board.best_score(GameKind::Guesser), Some(5));
    assert_eq!(*board.tally(GameKind::TicTacToe).draws(), 1);
    assert_eq!(board.best_score(GameKind::Tap), Some(87));
    assert_eq!(board.tally(GameKind::Hangman).games(), 0);
}

#[test]
fn test_session_persists_through_repository() {
    let (_db, repo) = setup_test_db();
    let mut session = GameSession::new(Guesser::default(), NoOpponent, session_rng(Some(5)))
        .with_store("ayu", Box::new(repo.clone()));

    let answer = session.state().answer();
    let miss = if answer == 1 { 2 } else { 1 };
    session.submit_move(Guess(miss)).expect("Guess rejected");
    session.submit_move(Guess(answer)).expect("Guess rejected");

    assert_eq!(repo.load_best_score("ayu:guesser").expect("Load failed"), Some(2));
    let board = repo.stats("ayu").expect("Stats failed");
    assert_eq!(*board.tally(GameKind::Guesser).wins(), 1);
}
