//! Parlor - Unified CLI
//!
//! Plays the parlor games in the terminal and reports stored statistics.

#![warn(missing_docs)]

mod cli;

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use parlor::{
    AppConfig, OutputMode, ProfileIdentity, ScoreRepository, play_session, play_tap_round,
    record_round,
};
use parlor_engine::{
    GameKind, GameSession, HeuristicLineGame, NoOpponent, Opponent, ScoreBoard, ScoreStore,
    TapRound, TicTacToe, Variant, session_rng,
};
use strum::IntoEnumIterator;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn,parlor=info,parlor_engine=info";

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config).context("Failed to load configuration")?;
    if let Some(profile) = cli.profile {
        config = config.with_profile(profile);
    }
    if let Some(db_path) = cli.db_path {
        config = config.with_db_path(db_path);
    }
    config.validate().context("Invalid command-line override")?;

    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    match cli.command {
        Command::Play { game, seed } => run_play(&config, game.into(), seed, mode).await,
        Command::Stats => run_stats(&config, mode),
    }
}

/// Logs go to stderr so stdout carries only game output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Everything a game needs from the host besides the rules.
struct PlayContext<'a> {
    config: &'a AppConfig,
    mode: OutputMode,
    store: Option<ScoreRepository>,
    scores: ScoreBoard,
    identity: ProfileIdentity,
}

/// Opens the score database. Playing goes on without one if that fails.
#[instrument(skip(config), fields(db_path = %config.db_path()))]
fn open_store(config: &AppConfig) -> Option<ScoreRepository> {
    match ScoreRepository::open(config.db_path().clone()) {
        Ok(repo) => Some(repo),
        Err(e) => {
            warn!(error = %e, "Score database unavailable, scores will not be saved");
            None
        }
    }
}

/// Run one game in the terminal
#[instrument(skip(config, mode), fields(profile = %config.profile()))]
async fn run_play(
    config: &AppConfig,
    kind: GameKind,
    seed: Option<u64>,
    mode: OutputMode,
) -> Result<()> {
    info!(%kind, ?seed, "Starting game");

    let store = open_store(config);
    let scores = match &store {
        Some(repo) => repo.stats(config.profile()).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load statistics, starting from zero");
            ScoreBoard::new()
        }),
        None => ScoreBoard::new(),
    };
    let ctx = PlayContext {
        config,
        mode,
        store,
        scores,
        identity: ProfileIdentity::from_env(config.player_label().clone()),
    };

    let rng = session_rng(seed);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    match kind {
        GameKind::TicTacToe => {
            let session = GameSession::new(TicTacToe, HeuristicLineGame, rng)
                .with_first_player(*config.first_player());
            drive(session, &ctx, &mut lines).await
        }
        GameKind::Hangman => {
            let session = GameSession::new(config.hangman().rules(), NoOpponent, rng);
            drive(session, &ctx, &mut lines).await
        }
        GameKind::Memory => {
            let session = GameSession::new(config.memory().rules(), NoOpponent, rng);
            drive(session, &ctx, &mut lines).await
        }
        GameKind::Guesser => {
            let session = GameSession::new(config.guesser().rules(), NoOpponent, rng);
            drive(session, &ctx, &mut lines).await
        }
        GameKind::Tap => run_tap(ctx, &mut lines).await,
    }
}

/// Attaches the host ports to a session and plays it until the player quits.
async fn drive<V, O>(
    session: GameSession<V, O>,
    ctx: &PlayContext<'_>,
    lines: &mut InputLines,
) -> Result<()>
where
    V: Variant + 'static,
    O: Opponent<V>,
{
    let kind = session.variant().kind();
    let mut session = session
        .with_sink(ctx.mode.sink(std::io::stdout()))
        .with_identity(&ctx.identity)
        .with_scores(ctx.scores.clone());
    if let Some(repo) = &ctx.store {
        session = session.with_store(ctx.config.profile(), Box::new(repo.clone()));
    }

    let mut out = std::io::stdout();
    play_session(&mut session, lines, &mut out, ctx.mode, ctx.config.opponent_delay())
        .await
        .context("Terminal I/O failed")?;

    let tally = session.scores().tally(kind);
    let summary = format!(
        "{}: {} played, {} won, {} lost, {} drawn",
        kind,
        tally.games(),
        tally.wins(),
        tally.losses(),
        tally.draws()
    );
    ctx.mode.notice(&mut out, &summary)?;
    Ok(())
}

/// Plays a timed tap round and records the score.
async fn run_tap(mut ctx: PlayContext<'_>, lines: &mut InputLines) -> Result<()> {
    let mut out = std::io::stdout();
    let round = TapRound::new(*ctx.config.tap().duration_secs());
    let round = play_tap_round(round, lines, &mut out, ctx.mode, Duration::from_secs(1))
        .await
        .context("Terminal I/O failed")?;

    let store = ctx.store.as_ref().map(|repo| repo as &dyn ScoreStore);
    let improved = record_round(store, ctx.config.profile(), &mut ctx.scores, &round);
    let mut summary = format!(
        "Final score {} (level {}, best combo {})",
        round.score(),
        round.highest_level(),
        round.max_combo()
    );
    if improved {
        summary.push_str(" - new high score!");
    }
    ctx.mode.notice(&mut out, &summary)?;
    Ok(())
}

/// Print stored statistics for the profile
#[instrument(skip(config, mode), fields(profile = %config.profile()))]
fn run_stats(config: &AppConfig, mode: OutputMode) -> Result<()> {
    let repo = ScoreRepository::open(config.db_path().clone())
        .context("Failed to open score database")?;
    let board = repo
        .stats(config.profile())
        .context("Failed to load statistics")?;

    let mut out = std::io::stdout();
    match mode {
        OutputMode::Json => {
            let report = serde_json::json!({ "profile": config.profile(), "scores": board });
            writeln!(out, "{}", report)?;
        }
        OutputMode::Text => {
            writeln!(out, "Statistics for {}", config.profile())?;
            writeln!(
                out,
                "{:<10} {:>6} {:>5} {:>6} {:>6} {:>7} {:>5}",
                "game", "played", "wins", "losses", "draws", "win %", "best"
            )?;
            for kind in GameKind::iter() {
                let tally = board.tally(kind);
                let best = board
                    .best_score(kind)
                    .map_or_else(|| "-".to_string(), |b| b.to_string());
                writeln!(
                    out,
                    "{:<10} {:>6} {:>5} {:>6} {:>6} {:>6.1}% {:>5}",
                    kind.to_string(),
                    tally.games(),
                    tally.wins(),
                    tally.losses(),
                    tally.draws(),
                    tally.win_rate(),
                    best
                )?;
            }
        }
    }
    Ok(())
}
