//! Timed tap round played from the terminal.

use std::io::{self, Write};
use std::time::Duration;

use parlor_engine::{GameKind, ScoreBoard, ScoreStore, TapRound, Target, score_key};
use tokio::io::{AsyncBufRead, Lines};
use tokio::time::{Instant, interval_at};
use tracing::{info, instrument, warn};

use crate::terminal::{OutputMode, help_text};

/// Seconds left at which the clock is announced.
const ANNOUNCE_AT: [u32; 6] = [30, 10, 5, 3, 2, 1];

/// What a line of input does in a tap round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapInput {
    /// Hit a target.
    Hit(Target),
    /// End the round now.
    Quit,
    /// Anything else.
    Unknown,
}

impl TapInput {
    /// Classifies an input line. A bare Enter is a bonus hit.
    pub fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "b" | "bonus" => TapInput::Hit(Target::Bonus),
            "r" | "red" | "penalty" => TapInput::Hit(Target::Penalty),
            "quit" | "exit" | "q" => TapInput::Quit,
            _ => TapInput::Unknown,
        }
    }
}

fn render(mode: OutputMode, out: &mut impl Write, round: &TapRound) -> io::Result<()> {
    match mode {
        OutputMode::Text => writeln!(out, "{}", round)?,
        OutputMode::Json => {
            serde_json::to_writer(&mut *out, round)?;
            writeln!(out)?;
        }
    }
    out.flush()
}

/// Plays one round, ticking every `tick` until the clock runs out.
///
/// Returns the round as it stood when it ended: time up, quit or input closed.
///
/// # Errors
///
/// Returns I/O errors from reading input or writing output.
#[instrument(skip_all, fields(duration = round.time_left()))]
pub async fn play_tap_round<I, W>(
    mut round: TapRound,
    lines: &mut Lines<I>,
    out: &mut W,
    mode: OutputMode,
    tick: Duration,
) -> io::Result<TapRound>
where
    I: AsyncBufRead + Unpin,
    W: Write,
{
    mode.notice(out, help_text(GameKind::Tap))?;
    render(mode, out, &round)?;

    let mut clock = interval_at(Instant::now() + tick, tick);
    while round.is_running() {
        tokio::select! {
            biased;

            _ = clock.tick() => {
                let ended = round.tick();
                if ended || ANNOUNCE_AT.contains(round.time_left()) {
                    render(mode, out, &round)?;
                }
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed, ending round");
                    break;
                };
                match TapInput::parse(&line) {
                    TapInput::Hit(target) => {
                        round.hit(target);
                        render(mode, out, &round)?;
                    }
                    TapInput::Quit => {
                        info!("Player ended round early");
                        break;
                    }
                    TapInput::Unknown => mode.notice(out, help_text(GameKind::Tap))?,
                }
            }
        }
    }

    info!(
        score = round.score(),
        max_combo = round.max_combo(),
        highest_level = round.highest_level(),
        "Round over"
    );
    Ok(round)
}

/// Feeds a finished round into the scoreboard and persists a new high score.
///
/// Store failures are logged and otherwise ignored. Returns true if the
/// round set a new high score.
#[instrument(skip(store, scores, round), fields(score = round.score()))]
pub fn record_round(
    store: Option<&dyn ScoreStore>,
    profile: &str,
    scores: &mut ScoreBoard,
    round: &TapRound,
) -> bool {
    let key = score_key(profile, GameKind::Tap);
    if let Some(store) = store {
        match store.load_best_score(&key) {
            Ok(Some(best)) => scores.seed_best(GameKind::Tap, best),
            Ok(None) => {}
            Err(e) => warn!(%key, error = %e, "Failed to load high score, treating as absent"),
        }
    }

    let improved = scores.record_high_score(GameKind::Tap, *round.score());
    if improved {
        info!(%key, score = round.score(), "New high score");
        if let Some(store) = store {
            if let Err(e) = store.save_best_score(&key, *round.score()) {
                warn!(%key, error = %e, "Failed to save high score");
            }
        }
    }
    improved
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_engine::MemoryStore;

    fn round_with(score_hits: u32) -> TapRound {
        let mut round = TapRound::new(10);
        for _ in 0..score_hits {
            round.hit(Target::Bonus);
        }
        round
    }

    #[test]
    fn test_tap_input_parsing() {
        assert_eq!(TapInput::parse(""), TapInput::Hit(Target::Bonus));
        assert_eq!(TapInput::parse(" R "), TapInput::Hit(Target::Penalty));
        assert_eq!(TapInput::parse("quit"), TapInput::Quit);
        assert_eq!(TapInput::parse("x"), TapInput::Unknown);
    }

    #[test]
    fn test_high_score_only_grows() {
        let store = MemoryStore::new();
        let handle: &dyn ScoreStore = &store;
        let mut scores = ScoreBoard::new();

        assert!(record_round(Some(handle), "p", &mut scores, &round_with(4)));
        assert!(!record_round(Some(handle), "p", &mut scores, &round_with(2)));
        assert_eq!(store.load_best_score("p:tap").unwrap(), Some(4));
        assert_eq!(scores.best_score(GameKind::Tap), Some(4));
    }

    #[test]
    fn test_persisted_high_score_is_respected() {
        let store = MemoryStore::new();
        store.save_best_score("p:tap", 50).unwrap();
        let mut scores = ScoreBoard::new();

        assert!(!record_round(Some(&store as &dyn ScoreStore), "p", &mut scores, &round_with(3)));
        assert_eq!(store.load_best_score("p:tap").unwrap(), Some(50));
    }

    #[test]
    fn test_without_store_still_scores() {
        let mut scores = ScoreBoard::new();
        assert!(record_round(None, "p", &mut scores, &round_with(1)));
        assert_eq!(scores.best_score(GameKind::Tap), Some(1));
    }
}
