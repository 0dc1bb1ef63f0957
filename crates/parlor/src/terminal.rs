//! Line-oriented terminal front end: render sinks, commands and the play loop.

use std::cell::RefCell;
use std::io::{self, Write};
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

use parlor_engine::{
    GameKind, GameSession, Opponent, OpponentTurn, RenderSink, SessionPhase, Snapshot, Variant,
};
use rand::Rng;
use tokio::io::{AsyncBufRead, Lines};
use tokio::time::{Sleep, sleep};
use tracing::{debug, info, instrument, warn};

/// How snapshots and notices are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable boards and messages.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl OutputMode {
    /// Builds the render sink for this mode.
    pub fn sink<V, W>(self, out: W) -> Box<dyn RenderSink<V>>
    where
        V: Variant + 'static,
        W: Write + 'static,
    {
        match self {
            OutputMode::Text => Box::new(TextSink::new(out)),
            OutputMode::Json => Box::new(JsonSink::new(out)),
        }
    }

    /// Writes a message for the player.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub fn notice(self, out: &mut impl Write, message: &str) -> io::Result<()> {
        match self {
            OutputMode::Text => writeln!(out, "{}", message)?,
            OutputMode::Json => {
                serde_json::to_writer(&mut *out, &serde_json::json!({ "notice": message }))?;
                writeln!(out)?;
            }
        }
        out.flush()
    }
}

/// Prints each snapshot as text.
#[derive(Debug)]
pub struct TextSink<W> {
    out: W,
}

impl<W: Write> TextSink<W> {
    /// Creates a sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<V: Variant, W: Write> RenderSink<V> for TextSink<W> {
    fn on_state_changed(&mut self, snapshot: &Snapshot<V>) {
        let written = writeln!(self.out, "\n{}", snapshot).and_then(|()| self.out.flush());
        if let Err(e) = written {
            warn!(error = %e, "Failed to render snapshot");
        }
    }
}

/// Prints each snapshot as one JSON line.
#[derive(Debug)]
pub struct JsonSink<W> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    /// Creates a sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<V: Variant, W: Write> RenderSink<V> for JsonSink<W> {
    fn on_state_changed(&mut self, snapshot: &Snapshot<V>) {
        let written = serde_json::to_writer(&mut self.out, snapshot)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            warn!(error = %e, "Failed to render snapshot");
        }
    }
}

/// Cloneable in-memory writer, handy for capturing output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Text handed to the game's move parser.
    Move(&'a str),
    /// Start a fresh game.
    Reset,
    /// Leave the loop.
    Quit,
    /// Show the input help.
    Help,
    /// Nothing typed.
    Blank,
}

impl<'a> Command<'a> {
    /// Classifies an input line. Keywords are case-insensitive.
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Command::Blank,
            "reset" | "restart" | "new" => Command::Reset,
            "quit" | "exit" | "q" => Command::Quit,
            "help" | "?" => Command::Help,
            _ => Command::Move(trimmed),
        }
    }
}

/// Input help for a game.
pub fn help_text(kind: GameKind) -> &'static str {
    match kind {
        GameKind::TicTacToe => "Type 1-9 or a square name (e.g. center, top-left).",
        GameKind::Hangman => "Type one letter.",
        GameKind::Memory => "Type a card number to flip it.",
        GameKind::Guesser => "Type a number.",
        GameKind::Tap => "Press Enter (or b) to hit a target, r for a red one.",
    }
}

const COMMANDS_HELP: &str = "Commands: reset, quit, help.";

type Scheduled = Option<(OpponentTurn, Pin<Box<Sleep>>)>;

enum Event {
    OpponentDue(OpponentTurn),
    Line(Option<String>),
}

/// Waits for the scheduled opponent turn; never resolves if none is scheduled.
async fn next_opponent_turn(scheduled: &mut Scheduled) -> OpponentTurn {
    match scheduled {
        Some((turn, delay)) => {
            delay.as_mut().await;
            *turn
        }
        None => std::future::pending().await,
    }
}

/// Runs a session until the player quits or input ends.
///
/// Player lines and the opponent delay are raced on one task. A line that
/// arrives while the opponent is still thinking is submitted like any other
/// and comes back as an ignored move.
///
/// # Errors
///
/// Returns I/O errors from reading input or writing notices.
#[instrument(skip_all, fields(kind = %session.variant().kind(), delay_ms = delay.as_millis() as u64))]
pub async fn play_session<V, O, R, I, W>(
    session: &mut GameSession<V, O, R>,
    lines: &mut Lines<I>,
    out: &mut W,
    mode: OutputMode,
    delay: Duration,
) -> io::Result<()>
where
    V: Variant,
    O: Opponent<V>,
    R: Rng,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let kind = session.variant().kind();
    mode.notice(out, &format!("{} {}", help_text(kind), COMMANDS_HELP))?;
    session.redraw();

    let mut scheduled: Scheduled = None;
    let mut abandoned: Option<OpponentTurn> = None;
    loop {
        let current = scheduled.as_ref().map(|(turn, _)| *turn);
        match session.pending_opponent_turn() {
            Some(turn) if abandoned == Some(turn) => scheduled = None,
            Some(turn) if current == Some(turn) => {}
            Some(turn) => {
                debug!(?turn, "Opponent turn scheduled");
                scheduled = Some((turn, Box::pin(sleep(delay))));
            }
            None => scheduled = None,
        }

        let event = tokio::select! {
            biased;
            turn = next_opponent_turn(&mut scheduled) => Event::OpponentDue(turn),
            line = lines.next_line() => Event::Line(line?),
        };

        let phase = match event {
            Event::OpponentDue(turn) => match session.play_opponent_turn(turn) {
                Ok(phase) => Some(phase),
                Err(e) => {
                    warn!(error = %e, "Scheduled opponent turn not played");
                    abandoned = Some(turn);
                    None
                }
            },
            Event::Line(None) => {
                info!("Input closed");
                return Ok(());
            }
            Event::Line(Some(line)) => match Command::parse(&line) {
                Command::Quit => {
                    info!("Player quit");
                    return Ok(());
                }
                Command::Reset => Some(session.reset_game()),
                Command::Help => {
                    mode.notice(out, &format!("{} {}", help_text(kind), COMMANDS_HELP))?;
                    None
                }
                Command::Blank => None,
                Command::Move(text) => {
                    let submitted = session
                        .variant()
                        .parse_move(text)
                        .and_then(|mv| session.submit_move(mv));
                    match submitted {
                        Ok(phase) => Some(phase),
                        Err(e) => {
                            mode.notice(out, &e.to_string())?;
                            None
                        }
                    }
                }
            },
        };

        if let Some(SessionPhase::Terminal(status)) = phase {
            debug!(%status, "Game over");
            mode.notice(out, "Type 'reset' to play again or 'quit' to leave.")?;
        }
    }
}
