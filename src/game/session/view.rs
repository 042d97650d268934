//! Read-only projection of the controller handed to renderers

use crate::game::resources::{ClockDisplay, GameOutcome};
use crate::game::types::{BoardLayout, Side, Square};
use std::fmt;

/// Phase of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No trusted snapshot yet (fresh, resetting, or out of sync)
    #[default]
    Uninitialized,
    AwaitingMove(Side),
    Terminal(GameOutcome),
}

/// Which feed currently drives the board display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Live,
    Replay,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The authority's rejection, verbatim
    Rejected(String),
    /// Network failure; `retry` re-issues the request
    Retryable(String),
    /// Local view was out of sync or the authority sent bad data
    Integrity(String),
    Info(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Rejected(text)
            | Notice::Retryable(text)
            | Notice::Integrity(text)
            | Notice::Info(text) => text,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub layout: BoardLayout,
    pub mode: ViewMode,
    pub phase: SessionPhase,
    pub status: String,
    pub armed: Option<Square>,
    pub clocks: ClockDisplay,
    pub replay_index: Option<usize>,
    pub replay_len: usize,
    pub playing: bool,
    pub awaiting_response: bool,
    pub can_retry: bool,
    pub notice: Option<Notice>,
}
