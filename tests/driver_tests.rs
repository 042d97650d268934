//! Session Driver Tests
//!
//! Runs the tokio driver against an in-memory authority with the clock
//! paused, so timer behavior is exact and instantaneous.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use xfchess_sync::core::{SessionConfig, SyncResult};
use xfchess_sync::game::rules::{RuleEngine, StandardRules};
use xfchess_sync::game::session::{Intent, SessionController, SessionPhase, SessionView, Timing};
use xfchess_sync::game::types::{ClockReading, GameSnapshot, Side, TerminalKind};
use xfchess_sync::networking::{Renderer, RemoteSession, SessionDriver};

const SCHOLARS_MATE: [&str; 7] = ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"];

fn snapshot(moves: &[&str]) -> GameSnapshot {
    let move_list: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
    GameSnapshot {
        layout: StandardRules.replay(&move_list).unwrap(),
        side_to_move: Side::to_move_after(move_list.len()),
        in_check: false,
        game_over: false,
        terminal: TerminalKind::None,
        clocks: ClockReading {
            white_secs: 600,
            black_secs: 600,
        },
        move_list,
    }
}

fn checkmate() -> GameSnapshot {
    GameSnapshot {
        in_check: true,
        game_over: true,
        terminal: TerminalKind::Checkmate,
        ..snapshot(&SCHOLARS_MATE)
    }
}

/// In-memory authority with scripted replies
struct MockAuthority {
    current: Mutex<GameSnapshot>,
    after_reset: GameSnapshot,
    ai_reply: GameSnapshot,
    move_delay: Duration,
    submitted: Mutex<Vec<String>>,
    resets: AtomicUsize,
    polls: AtomicUsize,
}

impl MockAuthority {
    fn new(after_reset: GameSnapshot) -> Self {
        Self {
            current: Mutex::new(after_reset.clone()),
            after_reset,
            ai_reply: checkmate(),
            move_delay: Duration::ZERO,
            submitted: Mutex::new(Vec::new()),
            resets: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
        }
    }

    fn with_move_delay(mut self, delay: Duration) -> Self {
        self.move_delay = delay;
        self
    }

    fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSession for MockAuthority {
    async fn submit_move(&self, notation: &str) -> SyncResult<GameSnapshot> {
        self.submitted.lock().unwrap().push(notation.to_string());
        tokio::time::sleep(self.move_delay).await;
        let mut moves: Vec<String> = self.current.lock().unwrap().move_list.clone();
        moves.push(notation.to_string());
        let refs: Vec<&str> = moves.iter().map(String::as_str).collect();
        // The stored state is left alone so a later fetch still sees the old game.
        Ok(snapshot(&refs))
    }

    async fn request_ai_move(&self) -> SyncResult<GameSnapshot> {
        *self.current.lock().unwrap() = self.ai_reply.clone();
        Ok(self.ai_reply.clone())
    }

    async fn reset_session(&self, _config: SessionConfig) -> SyncResult<()> {
        self.resets.fetch_add(1, Ordering::SeqCst);
        *self.current.lock().unwrap() = self.after_reset.clone();
        Ok(())
    }

    async fn configure(&self, _config: SessionConfig) -> SyncResult<()> {
        Ok(())
    }

    async fn fetch_snapshot(&self) -> SyncResult<GameSnapshot> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn poll_clocks(&self) -> SyncResult<ClockReading> {
        let n = self.polls.fetch_add(1, Ordering::SeqCst) as u64 + 1;
        Ok(ClockReading {
            white_secs: 600 - n,
            black_secs: 600,
        })
    }
}

/// Forwards every frame to the test
struct ChannelRenderer(mpsc::UnboundedSender<SessionView>);

impl Renderer for ChannelRenderer {
    fn render(&mut self, view: &SessionView) {
        let _ = self.0.send(view.clone());
    }
}

async fn wait_for(
    views: &mut mpsc::UnboundedReceiver<SessionView>,
    pred: impl Fn(&SessionView) -> bool,
) -> SessionView {
    tokio::time::timeout(Duration::from_secs(120), async {
        loop {
            let view = views.recv().await.expect("driver stopped");
            if pred(&view) {
                return view;
            }
        }
    })
    .await
    .expect("timed out waiting for view")
}

fn controller() -> SessionController {
    SessionController::with_standard_rules(SessionConfig::default(), Timing::default())
}

// ============================================================================
// Clock Ticker Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_clock_polls_while_awaiting_and_stops_on_terminal() {
    let remote = Arc::new(MockAuthority::new(snapshot(&[])));
    let (tx, mut views) = mpsc::unbounded_channel();
    let (driver, handle) = SessionDriver::new(controller(), remote.clone(), ChannelRenderer(tx));
    let task = tokio::spawn(driver.run());

    wait_for(&mut views, |v| v.phase == SessionPhase::AwaitingMove(Side::White)).await;
    assert_eq!(remote.resets.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(remote.polls(), 3);

    handle.send(Intent::RequestAiMove).unwrap();
    let view = wait_for(&mut views, |v| matches!(v.phase, SessionPhase::Terminal(_))).await;
    assert_eq!(view.status, "Checkmate! White wins!");

    let polls_at_end = remote.polls();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(remote.polls(), polls_at_end, "No polling after the game ends");

    handle.dispose();
    let controller = task.await.unwrap();
    assert!(controller.is_disposed());
    assert!(!controller.is_clock_running());
}

#[tokio::test(start_paused = true)]
async fn test_clock_readings_reach_the_view() {
    let remote = Arc::new(MockAuthority::new(snapshot(&[])));
    let (tx, mut views) = mpsc::unbounded_channel();
    let (driver, handle) = SessionDriver::new(controller(), remote.clone(), ChannelRenderer(tx));
    let task = tokio::spawn(driver.run());

    let view = wait_for(&mut views, |v| v.clocks.seconds(Side::White) == 598).await;
    assert_eq!(view.clocks.formatted(Side::White), "9:58");

    handle.dispose();
    task.await.unwrap();
}

// ============================================================================
// Generation Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_reset_discards_slow_move_reply() {
    let remote = Arc::new(MockAuthority::new(snapshot(&[])).with_move_delay(Duration::from_secs(5)));
    let (tx, mut views) = mpsc::unbounded_channel();
    let (driver, handle) = SessionDriver::new(controller(), remote.clone(), ChannelRenderer(tx));
    let task = tokio::spawn(driver.run());

    wait_for(&mut views, |v| v.phase == SessionPhase::AwaitingMove(Side::White)).await;
    handle.send(Intent::SelectSquare("e2".parse().unwrap())).unwrap();
    handle.send(Intent::SelectSquare("e4".parse().unwrap())).unwrap();
    wait_for(&mut views, |v| v.awaiting_response).await;

    handle.send(Intent::Reset(SessionConfig::default())).unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(*remote.submitted.lock().unwrap(), vec!["e2e4".to_string()]);
    assert_eq!(remote.resets.load(Ordering::SeqCst), 2);

    handle.dispose();
    let controller = task.await.unwrap();
    assert!(controller.live().move_list().is_empty(), "Stale move reply was applied");
    assert_eq!(controller.replay().len(), 0);
}

// ============================================================================
// Replay Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_auto_play_runs_to_live_position() {
    let remote = Arc::new(MockAuthority::new(snapshot(&["e2e4", "e7e5", "g1f3"])));
    let (tx, mut views) = mpsc::unbounded_channel();
    let (driver, handle) = SessionDriver::new(controller(), remote.clone(), ChannelRenderer(tx));
    let task = tokio::spawn(driver.run());

    wait_for(&mut views, |v| v.phase == SessionPhase::AwaitingMove(Side::Black)).await;

    handle.send(Intent::TogglePlay).unwrap();
    let view = wait_for(&mut views, |v| v.playing).await;
    assert_eq!(view.replay_index, None);

    let view = wait_for(&mut views, |v| !v.playing).await;
    assert_eq!(view.replay_index, Some(2));
    assert_eq!(view.replay_len, 3);

    handle.dispose();
    task.await.unwrap();
}

// ============================================================================
// Shutdown Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_dispose_stops_timers() {
    let remote = Arc::new(MockAuthority::new(snapshot(&[])));
    let (tx, mut views) = mpsc::unbounded_channel();
    let (driver, handle) = SessionDriver::new(controller(), remote.clone(), ChannelRenderer(tx));
    let task = tokio::spawn(driver.run());

    wait_for(&mut views, |v| v.phase == SessionPhase::AwaitingMove(Side::White)).await;
    handle.dispose();
    task.await.unwrap();

    let polls = remote.polls();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(remote.polls(), polls);
    assert!(handle.send(Intent::RequestAiMove).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handles_ends_driver() {
    let remote = Arc::new(MockAuthority::new(snapshot(&[])));
    let (tx, mut views) = mpsc::unbounded_channel();
    let (driver, handle) = SessionDriver::new(controller(), remote, ChannelRenderer(tx));
    let task = tokio::spawn(driver.run());

    wait_for(&mut views, |v| v.phase == SessionPhase::AwaitingMove(Side::White)).await;
    drop(handle);

    let controller = task.await.unwrap();
    assert!(controller.is_disposed());
}
