//! Tests for the terminal play loop and the timed tap round.

use std::time::Duration;

use parlor::{OutputMode, SharedBuffer, play_session, play_tap_round};
use parlor_engine::{
    FixedIdentity, GameSession, Guesser, Hangman, HeuristicLineGame, Memory, NoOpponent,
    SessionPhase, TapRound, TerminalStatus, TicTacToe, session_rng,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const SHORT_DELAY: Duration = Duration::from_millis(50);

#[tokio::test]
async fn test_input_during_opponent_delay_is_ignored() {
    let out = SharedBuffer::new();
    let mut session = GameSession::new(TicTacToe, HeuristicLineGame, session_rng(Some(3)))
        .with_sink(OutputMode::Text.sink(out.clone()));
    let mut lines = BufReader::new(&b"5\n1\nquit\n"[..]).lines();
    let mut notices = out.clone();

    play_session(&mut session, &mut lines, &mut notices, OutputMode::Text, SHORT_DELAY)
        .await
        .expect("Play loop failed");

    let text = out.contents();
    assert!(text.contains("Move ignored: not accepting input"), "{}", text);
    assert!(text.contains("Opponent is thinking..."), "{}", text);
    // Quit arrived before the delay elapsed, so the opponent never moved.
    assert!(matches!(session.phase(), SessionPhase::AwaitingOpponentMove(_)));
}

#[tokio::test]
async fn test_opponent_moves_after_delay() {
    let (client, server) = tokio::io::duplex(64);
    let mut session = GameSession::new(TicTacToe, HeuristicLineGame, session_rng(Some(3)));
    let mut lines = BufReader::new(server).lines();
    let mut out = SharedBuffer::new();

    let feeder = tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        let mut client = client;
        client.write_all(b"5\n").await.expect("Write failed");
        tokio::time::sleep(SHORT_DELAY * 4).await;
        client.write_all(b"quit\n").await.expect("Write failed");
    });

    play_session(&mut session, &mut lines, &mut out, OutputMode::Text, SHORT_DELAY)
        .await
        .expect("Play loop failed");
    feeder.await.expect("Feeder panicked");

    assert_eq!(session.phase(), SessionPhase::AwaitingHumanMove);
    let marks = session.state().board().empty_positions().len();
    assert_eq!(marks, 7, "player and opponent should each have one mark");
}

#[tokio::test]
async fn test_solo_guesser_round_to_win() {
    let mut session = GameSession::new(Guesser::new(1, 10, 5), NoOpponent, session_rng(Some(11)))
        .with_identity(&FixedIdentity(Some("Ayu".into())));
    let answer = session.state().answer();
    let script = format!("banana\n{}\nquit\n", answer);
    let mut lines = BufReader::new(script.as_bytes()).lines();
    let out = SharedBuffer::new();
    let mut writer = out.clone();
    session = session.with_sink(OutputMode::Text.sink(out.clone()));

    play_session(&mut session, &mut lines, &mut writer, OutputMode::Text, SHORT_DELAY)
        .await
        .expect("Play loop failed");

    let text = out.contents();
    assert!(text.contains("'banana' is not a number"), "{}", text);
    assert!(text.contains("Ayu wins!"), "{}", text);
    assert!(text.contains("Type 'reset' to play again"), "{}", text);
    assert_eq!(session.status(), TerminalStatus::Won(parlor_engine::Player::X));
}

#[tokio::test]
async fn test_json_mode_writes_one_object_per_line() {
    let out = SharedBuffer::new();
    let mut session = GameSession::new(Guesser::default(), NoOpponent, session_rng(Some(2)))
        .with_sink(OutputMode::Json.sink(out.clone()));
    let guess = if session.state().answer() == 50 { 51 } else { 50 };
    let script = format!("{}\n0\nreset\n", guess);
    let mut lines = BufReader::new(script.as_bytes()).lines();
    let mut writer = out.clone();

    play_session(&mut session, &mut lines, &mut writer, OutputMode::Json, SHORT_DELAY)
        .await
        .expect("Play loop failed");

    let text = out.contents();
    let values: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("Line is not JSON"))
        .collect();
    // Help notice, opening frame, guess, out-of-range notice, reset frame.
    assert_eq!(values.len(), 5, "{}", text);
    assert!(values[0]["notice"].is_string());
    assert_eq!(values[1]["kind"], "guesser");
    assert_eq!(values[2]["attempts"], 1);
    assert!(values[3]["notice"].as_str().expect("Notice").contains("outside"));
    assert_eq!(values[4]["attempts"], 0);
}

/// Plays `script` in JSON mode and returns every snapshot frame.
async fn json_frames<V>(session: GameSession<V, NoOpponent>, script: &str) -> Vec<serde_json::Value>
where
    V: parlor_engine::Variant + 'static,
{
    let out = SharedBuffer::new();
    let mut session = session.with_sink(OutputMode::Json.sink(out.clone()));
    let mut lines = BufReader::new(script.as_bytes()).lines();
    let mut writer = out.clone();

    play_session(&mut session, &mut lines, &mut writer, OutputMode::Json, SHORT_DELAY)
        .await
        .expect("Play loop failed");

    out.contents()
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).expect("Line is not JSON"))
        .filter(|value| value.get("state").is_some())
        .collect()
}

#[tokio::test]
async fn test_json_memory_frame_shows_flipped_card() {
    let session = GameSession::new(Memory::new(2, None), NoOpponent, session_rng(Some(4)));
    let frames = json_frames(session, "1\n").await;

    assert_eq!(frames.len(), 2);
    let opening = &frames[0]["state"]["cards"];
    assert_eq!(opening.as_array().map(Vec::len), Some(4));
    assert!(opening[0]["symbol"].is_null());

    let flipped = &frames[1]["state"]["cards"];
    assert_eq!(flipped[0]["face"], "Revealed");
    let symbol = flipped[0]["symbol"].as_str().expect("Face-up card has a symbol");
    assert!(symbol == "A" || symbol == "B", "{}", symbol);
    assert!(flipped[1]["symbol"].is_null());
}

#[tokio::test]
async fn test_json_hangman_frame_shows_masked_word() {
    let rules = Hangman::new(vec!["rust".into()], 6);
    let session = GameSession::new(rules, NoOpponent, session_rng(Some(1)));
    let frames = json_frames(session, "t\nr\n").await;

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0]["state"]["masked"], "____");
    assert_eq!(frames[2]["state"]["masked"], "R__T");
    assert!(frames[2]["state"].get("word").is_none());
}

#[tokio::test]
async fn test_reset_after_game_over_starts_fresh() {
    let mut session = GameSession::new(Guesser::new(1, 3, 1), NoOpponent, session_rng(Some(9)));
    let miss = if session.state().answer() == 1 { 2 } else { 1 };
    let script = format!("{}\n2\nreset\n", miss);
    let mut lines = BufReader::new(script.as_bytes()).lines();
    let mut out = SharedBuffer::new();

    play_session(&mut session, &mut lines, &mut out, OutputMode::Text, SHORT_DELAY)
        .await
        .expect("Play loop failed");

    let text = out.contents();
    assert!(text.contains("Game is already over"), "{}", text);
    assert_eq!(session.status(), TerminalStatus::Ongoing);
    assert_eq!(*session.scores().tally(parlor_engine::GameKind::Guesser).losses(), 1);
}

#[tokio::test]
async fn test_tap_round_ends_on_quit() {
    let mut lines = BufReader::new(&b"\nb\nr\nbonus\nzzz\nquit\n"[..]).lines();
    let mut out = SharedBuffer::new();

    let round = play_tap_round(
        TapRound::new(30),
        &mut lines,
        &mut out,
        OutputMode::Text,
        Duration::from_secs(1),
    )
    .await
    .expect("Tap round failed");

    // 1 + 1 - 5 saturates to 0, then 1 more.
    assert_eq!(*round.score(), 1);
    assert_eq!(*round.max_combo(), 2);
    assert!(round.is_running());
    assert!(out.contents().contains("Press Enter"));
}

#[tokio::test]
async fn test_tap_round_runs_out_of_time() {
    // Keep the writer alive so input stays open while the clock runs.
    let (_client, server) = tokio::io::duplex(64);
    let mut lines = BufReader::new(server).lines();
    let mut out = SharedBuffer::new();

    let round = play_tap_round(
        TapRound::new(3),
        &mut lines,
        &mut out,
        OutputMode::Json,
        Duration::from_millis(10),
    )
    .await
    .expect("Tap round failed");

    assert!(!round.is_running());
    assert_eq!(*round.time_left(), 0);
    let last = out.contents().lines().last().map(str::to_string).expect("No output");
    let value: serde_json::Value = serde_json::from_str(&last).expect("Line is not JSON");
    assert_eq!(value["time_left"], 0);
}
