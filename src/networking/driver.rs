//! Async session driver
//!
//! Owns a [`SessionController`] and carries out the effects it emits:
//!
//! - `Issue` spawns a task that runs the request against the remote session
//!   and posts the reply back into the mailbox.
//! - `Schedule*Tick` spawns a single-shot sleep that posts one tick. A new
//!   schedule aborts the previous timer of the same kind, so at most one
//!   clock timer and one replay timer exist.
//! - `Cancel*Tick` aborts the timer.
//!
//! Events are processed one at a time from an unbounded mailbox, each to
//! completion, then the current [`SessionView`] is handed to the renderer.
//! Spawned tasks only hold a weak sender; once every [`SessionHandle`] is
//! dropped the loop ends as if disposed.

use crate::core::error::{SyncError, SyncResult};
use crate::game::session::{Effect, Intent, Request, SessionController, SessionEvent, SessionView};
use crate::networking::client::{dispatch, RemoteSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Receives a fresh view after every processed event
pub trait Renderer: Send {
    fn render(&mut self, view: &SessionView);
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _view: &SessionView) {}
}

/// Cloneable front-end handle into a running driver
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    pub fn send(&self, intent: Intent) -> SyncResult<()> {
        self.tx
            .send(SessionEvent::Intent(intent))
            .map_err(|_| SyncError::transport("session driver has stopped"))
    }

    /// Stop the driver; pending replies and timers are discarded
    pub fn dispose(&self) {
        let _ = self.tx.send(SessionEvent::Dispose);
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

pub struct SessionDriver<R: Renderer> {
    controller: SessionController,
    remote: Arc<dyn RemoteSession>,
    renderer: R,
    tx: mpsc::WeakUnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    clock_timer: Option<JoinHandle<()>>,
    replay_timer: Option<JoinHandle<()>>,
}

impl<R: Renderer> SessionDriver<R> {
    pub fn new(
        controller: SessionController,
        remote: Arc<dyn RemoteSession>,
        renderer: R,
    ) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = Self {
            controller,
            remote,
            renderer,
            tx: tx.downgrade(),
            rx,
            clock_timer: None,
            replay_timer: None,
        };
        (driver, SessionHandle { tx })
    }

    /// Start the session and process events until disposed
    ///
    /// Returns the controller so callers can inspect the final state.
    pub async fn run(mut self) -> SessionController {
        info!("[SESSION] Driver started");
        let effects = self.controller.start();
        self.apply(effects);
        self.renderer.render(&self.controller.view());

        loop {
            let event = match self.rx.recv().await {
                Some(event) => event,
                None => {
                    debug!("[SESSION] All handles dropped");
                    SessionEvent::Dispose
                }
            };
            let disposing = matches!(event, SessionEvent::Dispose);

            let effects = self.controller.handle(event);
            self.apply(effects);
            self.renderer.render(&self.controller.view());

            if disposing {
                break;
            }
        }

        cancel(&mut self.clock_timer);
        cancel(&mut self.replay_timer);
        self.rx.close();
        info!("[SESSION] Driver stopped");
        self.controller
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Issue {
                    generation,
                    request,
                } => self.issue(generation, request),
                Effect::ScheduleClockTick { generation, after } => {
                    let timer = self.tick_after(after, SessionEvent::ClockTick { generation });
                    replace(&mut self.clock_timer, timer);
                }
                Effect::CancelClockTick => cancel(&mut self.clock_timer),
                Effect::ScheduleReplayTick { generation, after } => {
                    let timer = self.tick_after(after, SessionEvent::ReplayTick { generation });
                    replace(&mut self.replay_timer, timer);
                }
                Effect::CancelReplayTick => cancel(&mut self.replay_timer),
            }
        }
    }

    fn issue(&self, generation: u64, request: Request) {
        let remote = Arc::clone(&self.remote);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = dispatch(remote.as_ref(), &request).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(SessionEvent::Completed {
                    generation,
                    request,
                    result,
                });
            }
        });
    }

    fn tick_after(&self, after: Duration, event: SessionEvent) -> JoinHandle<()> {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(event);
            }
        })
    }
}

fn replace(slot: &mut Option<JoinHandle<()>>, timer: JoinHandle<()>) {
    if let Some(previous) = slot.replace(timer) {
        previous.abort();
    }
}

fn cancel(slot: &mut Option<JoinHandle<()>>) {
    if let Some(timer) = slot.take() {
        timer.abort();
    }
}
