//! Session orchestration
//!
//! - `controller` - [`SessionController`], the synchronous state machine
//! - `events` - intents, replies, ticks in; effects out
//! - `view` - [`SessionView`], the read-only projection renderers consume

pub mod controller;
pub mod events;
pub mod view;


pub use controller::{SessionController, Timing};
pub use events::{Effect, Intent, Reply, Request, SessionEvent};
pub use view::{Notice, SessionPhase, SessionView, ViewMode};
