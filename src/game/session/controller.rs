//! Session controller - the client-side state machine
//!
//! Reconciles the authoritative snapshot with the local board display, the
//! replay cursor and the clock display. The controller performs no I/O: every
//! [`SessionEvent`] is handled to completion and answered with a list of
//! [`Effect`]s for the runtime to carry out.
//!
//! # State Transitions
//!
//! ```text
//! Uninitialized → AwaitingMove(side) → AwaitingMove(side') | Terminal(outcome)
//!       ↑                   (reset from any phase)
//! ```
//!
//! # Invariants
//!
//! - At most one snapshot-bearing request (move, AI move, reset, fetch) is in
//!   flight; the `awaiting` slot guards it.
//! - Replies and ticks stamped with an older generation never touch state.
//! - Replay and live play are mutually exclusive: while the cursor is playing
//!   or shows a past position, live requests are refused without any effect.
//! - Every terminating interaction clears the armed square.

use crate::core::error::{SyncError, SyncResult};
use crate::core::settings::{ClientSettings, SessionConfig, TimeControl};
use crate::game::codec::{notation, position, Placement};
use crate::game::resources::{
    status_text, ClockDisplay, GameOutcome, LiveSessionState, ReplayCursor, Selection,
};
use crate::game::rules::{RuleEngine, StandardRules};
use crate::game::session::events::{Effect, Intent, Reply, Request, SessionEvent};
use crate::game::session::view::{Notice, SessionPhase, SessionView, ViewMode};
use crate::game::types::{BoardLayout, GameSnapshot, PieceKind, Side, Square};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Periods of the two repeating timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub clock_poll: Duration,
    pub replay_step: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            clock_poll: Duration::from_secs(1),
            replay_step: Duration::from_secs(1),
        }
    }
}

impl From<&ClientSettings> for Timing {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            clock_poll: settings.clock_poll_interval(),
            replay_step: settings.replay_interval(),
        }
    }
}

pub struct SessionController {
    config: SessionConfig,
    timing: Timing,
    engine: Box<dyn RuleEngine>,
    phase: SessionPhase,
    live: LiveSessionState,
    live_board: Option<Placement>,
    replay: ReplayCursor,
    selection: Selection,
    clocks: ClockDisplay,
    generation: u64,
    awaiting: Option<Request>,
    retry: Option<Request>,
    clock_running: bool,
    resync_in_flight: bool,
    status: String,
    notice: Option<Notice>,
    disposed: bool,
}

impl SessionController {
    pub fn new(config: SessionConfig, timing: Timing, engine: Box<dyn RuleEngine>) -> Self {
        Self {
            config,
            timing,
            engine,
            phase: SessionPhase::Uninitialized,
            live: LiveSessionState::default(),
            live_board: None,
            replay: ReplayCursor::default(),
            selection: Selection::default(),
            clocks: ClockDisplay::new(config.time_control),
            generation: 0,
            awaiting: None,
            retry: None,
            clock_running: false,
            resync_in_flight: false,
            status: "Connecting...".to_string(),
            notice: None,
            disposed: false,
        }
    }

    /// Controller replaying history with standard chess rules
    pub fn with_standard_rules(config: SessionConfig, timing: Timing) -> Self {
        Self::new(config, timing, Box::new(StandardRules))
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn live(&self) -> &LiveSessionState {
        &self.live
    }

    pub fn replay(&self) -> &ReplayCursor {
        &self.replay
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clocks(&self) -> &ClockDisplay {
        &self.clocks
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock_running
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Begin the session by resetting the authority with the current config
    pub fn start(&mut self) -> Vec<Effect> {
        let config = self.config;
        self.reset(config)
    }

    /// Tear down: invalidate everything in flight and stop both timers
    pub fn dispose(&mut self) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        self.disposed = true;
        self.generation += 1;
        self.awaiting = None;
        self.retry = None;
        self.clock_running = false;
        self.replay.stop();
        self.selection.clear();
        info!("[SESSION] Disposed at generation {}", self.generation);
        vec![Effect::CancelClockTick, Effect::CancelReplayTick]
    }

    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        match event {
            SessionEvent::Intent(intent) => self.handle_intent(intent),
            SessionEvent::Completed {
                generation,
                request,
                result,
            } => self.on_completed(generation, request, result),
            SessionEvent::ClockTick { generation } => self.on_clock_tick(generation),
            SessionEvent::ReplayTick { generation } => self.on_replay_tick(generation),
            SessionEvent::Dispose => self.dispose(),
        }
    }

    pub fn handle_intent(&mut self, intent: Intent) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        match intent {
            Intent::SelectSquare(square) => self.select_square(square),
            Intent::RequestAiMove => self.request_ai_move(),
            Intent::Reset(config) => self.reset(config),
            Intent::ChangeDifficulty(config) => self.change_difficulty(config),
            Intent::StepBack => self.navigate(|cursor, engine| cursor.step_back(engine)),
            Intent::StepForward => self.navigate(|cursor, engine| cursor.step_forward(engine)),
            Intent::JumpTo(index) => self.navigate(|cursor, engine| cursor.jump_to(index, engine)),
            Intent::JumpToStart => self.navigate(|cursor, engine| cursor.jump_to_start(engine)),
            Intent::JumpToLive => self.navigate(|cursor, engine| cursor.jump_to_end(engine)),
            Intent::TogglePlay => self.toggle_play(),
            Intent::Retry => self.retry(),
        }
    }

    /// Layout the display should show right now
    pub fn current_layout(&self) -> BoardLayout {
        if self.replay.blocks_live_play() {
            self.replay.derived_layout().clone()
        } else {
            self.live.layout()
        }
    }

    pub fn view(&self) -> SessionView {
        let mode = if self.replay.blocks_live_play() {
            ViewMode::Replay
        } else {
            ViewMode::Live
        };
        SessionView {
            layout: self.current_layout(),
            mode,
            phase: self.phase,
            status: self.status.clone(),
            armed: self.selection.armed(),
            clocks: self.clocks,
            replay_index: self.replay.index(),
            replay_len: self.replay.len(),
            playing: self.replay.is_playing(),
            awaiting_response: self.awaiting.is_some(),
            can_retry: self.retry.is_some(),
            notice: self.notice.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Live play
    // ------------------------------------------------------------------

    fn select_square(&mut self, square: Square) -> Vec<Effect> {
        if self.live_play_blocked() {
            return Vec::new();
        }

        match self.selection.armed() {
            None => {
                let occupied = self
                    .live_board
                    .as_ref()
                    .is_some_and(|board| board.is_occupied(square));
                if occupied {
                    debug!("[SESSION] Armed {}", square);
                    self.selection.arm(square);
                }
                Vec::new()
            }
            Some(from) if from == square => {
                debug!("[SESSION] Disarmed {}", square);
                self.selection.clear();
                Vec::new()
            }
            Some(from) => {
                let notation = self.notation_for(from, square);
                vec![self.issue(Request::SubmitMove { notation })]
            }
        }
    }

    fn request_ai_move(&mut self) -> Vec<Effect> {
        if self.live_play_blocked() {
            return Vec::new();
        }
        self.selection.clear();
        vec![self.issue(Request::AiMove)]
    }

    fn live_play_blocked(&mut self) -> bool {
        if self.replay.blocks_live_play() {
            self.selection.clear();
            self.notice = Some(Notice::Info(
                "Live play is disabled while reviewing history".to_string(),
            ));
            return true;
        }
        match self.phase {
            SessionPhase::AwaitingMove(_) => {}
            SessionPhase::Terminal(_) => {
                self.notice = Some(Notice::Info(
                    "The game is over. Reset to play again.".to_string(),
                ));
                return true;
            }
            SessionPhase::Uninitialized => return true,
        }
        if self.awaiting.is_some() {
            self.notice = Some(Notice::Info("Waiting for the server...".to_string()));
            return true;
        }
        false
    }

    /// Pawns reaching the last rank promote to a queen
    fn notation_for(&self, from: Square, to: Square) -> String {
        let promotes = self
            .live_board
            .as_ref()
            .and_then(|board| board.piece_at(from))
            .is_some_and(|piece| {
                piece.kind == PieceKind::Pawn
                    && match piece.side {
                        Side::White => to.rank() == 7,
                        Side::Black => to.rank() == 0,
                    }
            });
        if promotes {
            notation::encode_with_promotion(from, to, Some(PieceKind::Queen))
        } else {
            notation::encode(from, to)
        }
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    fn reset(&mut self, config: SessionConfig) -> Vec<Effect> {
        if self.disposed {
            return Vec::new();
        }
        self.generation += 1;
        info!(
            "[SESSION] Reset to {} / {:?} (generation {})",
            config.difficulty, config.time_control, self.generation
        );

        self.config = config;
        self.selection.clear();
        self.replay.stop();
        self.awaiting = None;
        self.retry = None;
        self.clock_running = false;
        self.resync_in_flight = false;
        self.notice = None;
        self.clocks = ClockDisplay::new(config.time_control);
        self.status = "Starting a new game...".to_string();
        self.set_phase(SessionPhase::Uninitialized);

        let issue = self.issue(Request::Reset { config });
        vec![Effect::CancelClockTick, Effect::CancelReplayTick, issue]
    }

    fn change_difficulty(&mut self, config: SessionConfig) -> Vec<Effect> {
        vec![self.issue(Request::Configure { config })]
    }

    fn retry(&mut self) -> Vec<Effect> {
        let Some(request) = self.retry.clone() else {
            self.notice = Some(Notice::Info("Nothing to retry".to_string()));
            return Vec::new();
        };

        let blocked = match request {
            Request::SubmitMove { .. } | Request::AiMove => self.live_play_blocked(),
            _ if request.is_snapshot_bearing() && self.awaiting.is_some() => {
                self.notice = Some(Notice::Info("Waiting for the server...".to_string()));
                true
            }
            _ => false,
        };
        if blocked {
            return Vec::new();
        }

        self.selection.clear();
        info!("[SESSION] Retrying {}", request.label());
        vec![self.issue(request)]
    }

    fn issue(&mut self, request: Request) -> Effect {
        if request.is_snapshot_bearing() {
            self.awaiting = Some(request.clone());
        }
        if request != Request::PollClocks {
            self.retry = None;
        }
        debug!(
            "[NETWORK] Issuing {} (generation {})",
            request.label(),
            self.generation
        );
        Effect::Issue {
            generation: self.generation,
            request,
        }
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            info!("[SESSION] {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    // ------------------------------------------------------------------
    // Replies
    // ------------------------------------------------------------------

    fn on_completed(
        &mut self,
        generation: u64,
        request: Request,
        result: SyncResult<Reply>,
    ) -> Vec<Effect> {
        if generation != self.generation {
            debug!(
                "[SESSION] Discarding stale {} reply (generation {}, current {})",
                request.label(),
                generation,
                self.generation
            );
            return Vec::new();
        }
        if request.is_snapshot_bearing() {
            self.awaiting = None;
        }

        match (&request, result) {
            (Request::PollClocks, result) => self.on_clocks(result),
            (Request::Configure { config }, Ok(_)) => {
                let previous = self.config.time_control;
                self.config = *config;
                info!("[SESSION] Difficulty set to {}", config.difficulty);
                self.notice = Some(Notice::Info(format!(
                    "Difficulty set to {}",
                    config.difficulty
                )));
                if previous == config.time_control {
                    Vec::new()
                } else {
                    self.apply_time_control(previous)
                }
            }
            (Request::Reset { .. }, Ok(Reply::Acknowledged)) => {
                vec![self.issue(Request::FetchSnapshot)]
            }
            (
                Request::SubmitMove { .. } | Request::AiMove | Request::FetchSnapshot,
                Ok(Reply::Snapshot(snapshot)),
            ) => self.accept_snapshot(snapshot),
            (_, Ok(reply)) => {
                let err = SyncError::transport(format!(
                    "unexpected reply to {}: {:?}",
                    request.label(),
                    reply
                ));
                self.on_request_failed(request.clone(), err)
            }
            (_, Err(err)) => self.on_request_failed(request.clone(), err),
        }
    }

    fn on_request_failed(&mut self, request: Request, err: SyncError) -> Vec<Effect> {
        self.selection.clear();
        match err {
            SyncError::Remote { message } => {
                info!("[SESSION] {} rejected: {}", request.label(), message);
                self.notice = Some(Notice::Rejected(message));
                Vec::new()
            }
            err if err.is_retryable() => {
                warn!("[NETWORK] {} failed: {}", request.label(), err);
                self.notice = Some(Notice::Retryable(err.to_string()));
                self.retry = Some(request);
                Vec::new()
            }
            err @ (SyncError::StateIntegrity { .. } | SyncError::MalformedLayout { .. }) => {
                self.on_integrity_violation(err)
            }
            err => {
                error!("[SESSION] {} failed: {}", request.label(), err);
                self.notice = Some(Notice::Integrity(err.to_string()));
                Vec::new()
            }
        }
    }

    fn accept_snapshot(&mut self, snapshot: GameSnapshot) -> Vec<Effect> {
        self.selection.clear();

        let cursor = match ReplayCursor::at_end(snapshot.move_list.clone(), self.engine.as_ref()) {
            Ok(cursor) => cursor,
            Err(err) => return self.on_integrity_violation(err),
        };
        if let Err(err) = self.live.accept(snapshot) {
            return self.on_integrity_violation(err);
        }

        let mut effects = Vec::new();
        if self.replay.is_playing() {
            effects.push(Effect::CancelReplayTick);
        }
        self.replay = cursor;
        self.resync_in_flight = false;
        self.retry = None;
        self.notice = None;

        let (clocks, status, decoded, next_phase) = match self.live.snapshot() {
            Some(held) => (
                held.clocks,
                status_text(held),
                position::decode(&held.layout),
                GameOutcome::from_snapshot(held).map_or(
                    SessionPhase::AwaitingMove(held.side_to_move),
                    SessionPhase::Terminal,
                ),
            ),
            None => return effects,
        };

        self.clocks.update(clocks);
        self.status = status;
        self.live_board = match decoded {
            Ok(board) => Some(board),
            Err(err) => {
                error!("[SESSION] {}", err);
                self.notice = Some(Notice::Integrity(format!("Board unavailable: {err}")));
                None
            }
        };
        self.set_phase(next_phase);

        match next_phase {
            SessionPhase::Terminal(outcome) => {
                info!("[SESSION] {}", outcome);
                self.clock_running = false;
                effects.push(Effect::CancelClockTick);
            }
            SessionPhase::AwaitingMove(_) => {
                if !self.clock_running && !self.config.time_control.is_unlimited() {
                    self.clock_running = true;
                    effects.push(Effect::ScheduleClockTick {
                        generation: self.generation,
                        after: self.timing.clock_poll,
                    });
                }
            }
            SessionPhase::Uninitialized => {}
        }
        effects
    }

    /// One resync attempt per violation streak; a second violation parks the session
    fn on_integrity_violation(&mut self, err: SyncError) -> Vec<Effect> {
        error!("[SESSION] {}", err);
        self.selection.clear();

        let mut effects = Vec::new();
        if self.replay.is_playing() {
            self.replay.stop();
            effects.push(Effect::CancelReplayTick);
        }

        if self.resync_in_flight {
            self.resync_in_flight = false;
            self.clock_running = false;
            self.set_phase(SessionPhase::Uninitialized);
            self.notice = Some(Notice::Integrity(format!("{err}. Reset to continue.")));
            effects.push(Effect::CancelClockTick);
        } else {
            self.resync_in_flight = true;
            self.notice = Some(Notice::Integrity(format!("{err}. Resynchronizing...")));
            if self.awaiting.is_none() {
                effects.push(self.issue(Request::FetchSnapshot));
            }
        }
        effects
    }

    // ------------------------------------------------------------------
    // Clock ticker
    // ------------------------------------------------------------------

    /// Follow an acknowledged time-control change on the display and the ticker
    fn apply_time_control(&mut self, previous: TimeControl) -> Vec<Effect> {
        let control = self.config.time_control;
        let reading = self.clocks.reading();
        self.clocks = ClockDisplay::new(control);
        // An unlimited game has no meaningful reading to carry over.
        if !previous.is_unlimited() {
            self.clocks.update(reading);
        }
        info!("[CLOCK] Time control now {:?}", control);

        if control.is_unlimited() {
            self.clock_running = false;
            return vec![Effect::CancelClockTick];
        }
        if !self.clock_running && matches!(self.phase, SessionPhase::AwaitingMove(_)) {
            self.clock_running = true;
            return vec![Effect::ScheduleClockTick {
                generation: self.generation,
                after: self.timing.clock_poll,
            }];
        }
        Vec::new()
    }

    fn on_clock_tick(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.generation || !self.clock_running {
            return Vec::new();
        }
        if self.config.time_control.is_unlimited()
            || !matches!(self.phase, SessionPhase::AwaitingMove(_))
        {
            self.clock_running = false;
            return Vec::new();
        }
        vec![self.issue(Request::PollClocks)]
    }

    fn on_clocks(&mut self, result: SyncResult<Reply>) -> Vec<Effect> {
        if !self.clock_running {
            return Vec::new();
        }
        match result {
            Ok(Reply::Clocks(reading)) => {
                debug!(
                    "[CLOCK] white {}s, black {}s",
                    reading.white_secs, reading.black_secs
                );
                self.clocks.update(reading);
                self.live.update_clocks(reading);
            }
            Ok(other) => warn!("[CLOCK] Unexpected reply to clock poll: {:?}", other),
            Err(err) => warn!("[CLOCK] Poll failed: {}", err),
        }

        if matches!(self.phase, SessionPhase::AwaitingMove(_))
            && !self.config.time_control.is_unlimited()
        {
            vec![Effect::ScheduleClockTick {
                generation: self.generation,
                after: self.timing.clock_poll,
            }]
        } else {
            self.clock_running = false;
            Vec::new()
        }
    }

    // ------------------------------------------------------------------
    // Replay
    // ------------------------------------------------------------------

    fn navigate<F>(&mut self, step: F) -> Vec<Effect>
    where
        F: FnOnce(&mut ReplayCursor, &dyn RuleEngine) -> SyncResult<bool>,
    {
        let mut effects = Vec::new();
        if self.replay.is_playing() {
            self.replay.stop();
            effects.push(Effect::CancelReplayTick);
        }

        match step(&mut self.replay, self.engine.as_ref()) {
            Ok(moved) => {
                if moved {
                    debug!("[REPLAY] Cursor at {:?}", self.replay.index());
                }
                if self.replay.blocks_live_play() {
                    self.selection.clear();
                }
            }
            Err(err) => effects.extend(self.on_integrity_violation(err)),
        }
        effects
    }

    fn toggle_play(&mut self) -> Vec<Effect> {
        match self.replay.toggle_play(self.engine.as_ref()) {
            Ok(true) => {
                info!("[REPLAY] Playback started");
                self.selection.clear();
                vec![Effect::ScheduleReplayTick {
                    generation: self.generation,
                    after: self.timing.replay_step,
                }]
            }
            Ok(false) => {
                info!("[REPLAY] Playback stopped");
                vec![Effect::CancelReplayTick]
            }
            Err(err) => self.on_integrity_violation(err),
        }
    }

    fn on_replay_tick(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.generation || !self.replay.is_playing() {
            return Vec::new();
        }
        match self.replay.advance_playback(self.engine.as_ref()) {
            Ok(true) => vec![Effect::ScheduleReplayTick {
                generation: self.generation,
                after: self.timing.replay_step,
            }],
            Ok(false) => {
                info!("[REPLAY] Playback reached the live position");
                Vec::new()
            }
            Err(err) => self.on_integrity_violation(err),
        }
    }
}
