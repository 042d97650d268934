//! Events consumed and effects produced by the session controller
//!
//! Every request and timer effect is stamped with the session generation
//! current when it was issued. Replies and ticks carrying an older generation
//! are dropped on arrival.

use crate::core::error::SyncResult;
use crate::core::settings::SessionConfig;
use crate::game::types::{ClockReading, GameSnapshot, Square};
use std::time::Duration;

/// User intent delivered by a front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectSquare(Square),
    RequestAiMove,
    Reset(SessionConfig),
    ChangeDifficulty(SessionConfig),
    StepBack,
    StepForward,
    /// `None` is the initial position
    JumpTo(Option<usize>),
    JumpToStart,
    JumpToLive,
    TogglePlay,
    Retry,
}

/// A single exchange with the authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    SubmitMove { notation: String },
    AiMove,
    Reset { config: SessionConfig },
    Configure { config: SessionConfig },
    FetchSnapshot,
    PollClocks,
}

impl Request {
    /// Requests that replace the snapshot are serialized behind one flag
    pub fn is_snapshot_bearing(&self) -> bool {
        matches!(
            self,
            Request::SubmitMove { .. } | Request::AiMove | Request::Reset { .. } | Request::FetchSnapshot
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Request::SubmitMove { .. } => "move",
            Request::AiMove => "ai_move",
            Request::Reset { .. } => "reset",
            Request::Configure { .. } => "set_difficulty",
            Request::FetchSnapshot => "fetch",
            Request::PollClocks => "get_time",
        }
    }
}

/// Successful reply payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Snapshot(GameSnapshot),
    Acknowledged,
    Clocks(ClockReading),
}

/// Everything that can drive the controller
#[derive(Debug)]
pub enum SessionEvent {
    Intent(Intent),
    Completed {
        generation: u64,
        request: Request,
        result: SyncResult<Reply>,
    },
    ClockTick { generation: u64 },
    ReplayTick { generation: u64 },
    Dispose,
}

impl From<Intent> for SessionEvent {
    fn from(intent: Intent) -> Self {
        SessionEvent::Intent(intent)
    }
}

/// Work the runtime must perform on the controller's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Issue { generation: u64, request: Request },
    ScheduleClockTick { generation: u64, after: Duration },
    CancelClockTick,
    ScheduleReplayTick { generation: u64, after: Duration },
    CancelReplayTick,
}
