//! Session controller: turn order, opponent scheduling and scoring.

use super::{FirstPlayer, OpponentTurn, SessionPhase, Snapshot};
use crate::error::MoveError;
#[cfg(debug_assertions)]
use crate::invariants::slots_stay_locked;
use crate::opponent::{NoOpponent, Opponent};
use crate::ports::{
    DEFAULT_PLAYER_LABEL, NullSink, PlayerIdentity, RenderSink, ScoreStore, display_label,
    score_key,
};
use crate::scoreboard::ScoreBoard;
use crate::status::{Player, TerminalStatus};
use crate::variant::Variant;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, error, info, instrument, warn};

struct StoreBinding {
    key: String,
    store: Box<dyn ScoreStore>,
}

/// One game variant played through from reset to terminal status, repeatedly.
///
/// The controller owns its state exclusively. The state changes only
/// through [`GameSession::submit_move`], [`GameSession::play_opponent_turn`]
/// and [`GameSession::reset_game`]; each accepted change is pushed to the
/// render sink as a [`Snapshot`].
///
/// The opponent never moves on its own. When a player move hands the turn
/// over, the returned phase carries an [`OpponentTurn`] ticket; the host
/// waits its presentation delay and redeems the ticket. Player input in
/// between is answered with [`MoveError::IgnoredMove`].
pub struct GameSession<V, O = NoOpponent, R = StdRng>
where
    V: Variant,
    O: Opponent<V>,
    R: Rng,
{
    variant: V,
    opponent: O,
    rng: R,
    first_player: FirstPlayer,
    state: V::State,
    status: TerminalStatus,
    phase: SessionPhase,
    epoch: u64,
    scores: ScoreBoard,
    player_label: String,
    sink: Box<dyn RenderSink<V>>,
    store: Option<StoreBinding>,
}

impl<V, O, R> GameSession<V, O, R>
where
    V: Variant,
    O: Opponent<V>,
    R: Rng,
{
    /// Creates a session with a fresh state, the player moving first.
    #[instrument(skip(opponent, rng), fields(kind = %variant.kind()))]
    pub fn new(variant: V, opponent: O, mut rng: R) -> Self {
        let state = variant.new_state(&mut rng);
        let mut session = Self {
            status: variant.check_terminal(&state),
            variant,
            opponent,
            rng,
            first_player: FirstPlayer::Human,
            state,
            phase: SessionPhase::AwaitingHumanMove,
            epoch: 0,
            scores: ScoreBoard::new(),
            player_label: DEFAULT_PLAYER_LABEL.to_string(),
            sink: Box::new(NullSink),
            store: None,
        };
        session.phase = session.next_phase();
        info!(phase = ?session.phase, "Session created");
        session
    }

    /// Sets who opens and restarts with a fresh state.
    pub fn with_first_player(mut self, first_player: FirstPlayer) -> Self {
        self.first_player = first_player;
        self.start_fresh();
        self
    }

    /// Sends snapshots to `sink`.
    pub fn with_sink(mut self, sink: Box<dyn RenderSink<V>>) -> Self {
        self.sink = sink;
        self
    }

    /// Takes the player label from an identity provider.
    pub fn with_identity(mut self, identity: &dyn PlayerIdentity) -> Self {
        self.player_label = display_label(identity);
        self
    }

    /// Carries over results from earlier sessions.
    pub fn with_scores(mut self, scores: ScoreBoard) -> Self {
        self.scores = scores;
        self
    }

    /// Persists best scores for `profile` in `store`.
    ///
    /// The stored best score is loaded now. A failing store is logged and
    /// treated as empty.
    #[instrument(skip(self, store))]
    pub fn with_store(mut self, profile: &str, store: Box<dyn ScoreStore>) -> Self {
        let kind = self.variant.kind();
        let key = score_key(profile, kind);
        match store.load_best_score(&key) {
            Ok(Some(best)) => {
                debug!(%key, best, "Loaded persisted best score");
                self.scores.seed_best(kind, best);
            }
            Ok(None) => debug!(%key, "No persisted best score"),
            Err(e) => warn!(%key, error = %e, "Failed to load best score, treating as absent"),
        }
        self.store = Some(StoreBinding { key, store });
        self
    }

    /// Submits the player's move.
    ///
    /// Returns the phase after the move. When the opponent is to move next
    /// the phase carries the ticket for [`GameSession::play_opponent_turn`].
    ///
    /// # Errors
    ///
    /// - [`MoveError::IgnoredMove`] while waiting for the opponent
    /// - [`MoveError::GameOver`] once the game has ended
    /// - [`MoveError::InvalidMove`] / [`MoveError::OccupiedSlot`] from the rules
    ///
    /// The state is untouched on every error.
    #[instrument(skip(self), fields(kind = %self.variant.kind()))]
    pub fn submit_move(&mut self, mv: V::Move) -> Result<SessionPhase, MoveError> {
        match self.phase {
            SessionPhase::AwaitingHumanMove => {}
            SessionPhase::AwaitingOpponentMove(_) => {
                debug!(%mv, "Input during opponent turn ignored");
                return Err(MoveError::IgnoredMove);
            }
            SessionPhase::Terminal(_) => {
                debug!(%mv, "Input after game over rejected");
                return Err(MoveError::GameOver);
            }
        }

        let next = self.variant.apply_move(&self.state, mv).map_err(|e| {
            debug!(%mv, error = %e, "Move rejected");
            e
        })?;
        Ok(self.accept(next))
    }

    /// Plays the opponent's scheduled move.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::IgnoredMove`] if `turn` is stale: the session was
    /// reset, or that turn was already played.
    #[instrument(skip(self), fields(kind = %self.variant.kind()))]
    pub fn play_opponent_turn(&mut self, turn: OpponentTurn) -> Result<SessionPhase, MoveError> {
        if self.phase != SessionPhase::AwaitingOpponentMove(turn) {
            debug!(?turn, phase = ?self.phase, "Stale opponent turn dropped");
            return Err(MoveError::IgnoredMove);
        }

        let mv = self
            .opponent
            .choose_move(&self.variant, &self.state, &mut self.rng)
            .ok_or_else(|| {
                error!("Opponent policy produced no move on its turn");
                MoveError::IgnoredMove
            })?;
        let next = self.variant.apply_move(&self.state, mv).map_err(|e| {
            error!(%mv, error = %e, "Opponent policy chose an illegal move");
            e
        })?;
        info!(%mv, "Opponent moved");
        Ok(self.accept(next))
    }

    /// Discards the current game and starts a fresh one.
    ///
    /// Any pending opponent ticket becomes stale.
    #[instrument(skip(self), fields(kind = %self.variant.kind()))]
    pub fn reset_game(&mut self) -> SessionPhase {
        self.start_fresh();
        info!(phase = ?self.phase, "Game reset");
        self.emit();
        self.phase
    }

    /// Pushes the current state to the sink without changing it.
    ///
    /// Hosts call this once to draw the opening frame.
    pub fn redraw(&mut self) {
        self.emit();
    }

    /// Builds a snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot<V> {
        Snapshot {
            kind: self.variant.kind(),
            state: self.state.clone(),
            phase: self.phase,
            status: self.status,
            human: self.human(),
            highlight: self.variant.highlight(&self.state),
            player_label: self.player_label.clone(),
            attempts: self.variant.attempts(&self.state),
            best_score: self.scores.best_score(self.variant.kind()),
        }
    }

    /// Returns the rules this session plays by.
    pub fn variant(&self) -> &V {
        &self.variant
    }

    /// Returns the current state.
    pub fn state(&self) -> &V::State {
        &self.state
    }

    /// Returns the terminal status of the current state.
    pub fn status(&self) -> TerminalStatus {
        self.status
    }

    /// Returns the controller phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Returns the pending opponent ticket, if the opponent is to move.
    pub fn pending_opponent_turn(&self) -> Option<OpponentTurn> {
        self.phase.opponent_turn()
    }

    /// Returns results accumulated over this session's games.
    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    /// The side the player controls.
    ///
    /// X unless an active opponent was given the first move.
    pub fn human(&self) -> Player {
        if self.opponent.is_active() && self.first_player == FirstPlayer::Opponent {
            Player::O
        } else {
            Player::X
        }
    }

    fn start_fresh(&mut self) {
        self.epoch += 1;
        self.state = self.variant.new_state(&mut self.rng);
        self.status = self.variant.check_terminal(&self.state);
        self.phase = self.next_phase();
    }

    fn accept(&mut self, next: V::State) -> SessionPhase {
        #[cfg(debug_assertions)]
        self.check_slots_stay_locked(&next);

        self.epoch += 1;
        self.state = next;
        self.status = self.variant.check_terminal(&self.state);
        if self.status.is_terminal() {
            self.finish();
        }
        self.phase = self.next_phase();
        self.emit();
        self.phase
    }

    /// Debug builds only: a rule engine that unlocks a slot is a bug.
    #[cfg(debug_assertions)]
    fn check_slots_stay_locked(&self, next: &V::State) {
        if let Err(violation) = slots_stay_locked(&self.variant, &self.state, next) {
            panic!("{}", violation);
        }
    }

    fn next_phase(&self) -> SessionPhase {
        if self.status.is_terminal() {
            SessionPhase::Terminal(self.status)
        } else if self.opponent.is_active() && self.variant.to_move(&self.state) != self.human() {
            SessionPhase::AwaitingOpponentMove(OpponentTurn { epoch: self.epoch })
        } else {
            SessionPhase::AwaitingHumanMove
        }
    }

    fn finish(&mut self) {
        let Some(outcome) = self.status.outcome_for(self.human()) else {
            return;
        };
        let kind = self.variant.kind();
        let attempts = self.variant.attempts(&self.state);
        let best_before = self.scores.best_score(kind);
        self.scores.record_outcome(kind, outcome, attempts);
        let best_after = self.scores.best_score(kind);
        info!(%kind, %outcome, attempts, best = ?best_after, "Game finished");

        let Some(binding) = &self.store else {
            return;
        };
        if let Err(e) = binding.store.record_result(&binding.key, kind, outcome, attempts) {
            warn!(key = %binding.key, error = %e, "Failed to record result");
        }
        if let Some(best) = best_after.filter(|_| best_after != best_before) {
            match binding.store.save_best_score(&binding.key, best) {
                Ok(()) => info!(key = %binding.key, best, "New best score saved"),
                Err(e) => warn!(key = %binding.key, error = %e, "Failed to save best score"),
            }
        }
    }

    fn emit(&mut self) {
        let snapshot = self.snapshot();
        self.sink.on_state_changed(&snapshot);
    }
}

impl<V, O, R> std::fmt::Debug for GameSession<V, O, R>
where
    V: Variant,
    O: Opponent<V>,
    R: Rng,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("variant", &self.variant)
            .field("opponent", &self.opponent)
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("epoch", &self.epoch)
            .field("store_key", &self.store.as_ref().map(|b| b.key.as_str()))
            .finish_non_exhaustive()
    }
}
