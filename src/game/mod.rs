//! Chess session logic - everything that runs without a network
//!
//! The remote authority owns the game. This module holds the client's view of
//! it: the last accepted snapshot, the board derived for history review, the
//! armed square, and the clocks. All of it is driven by one synchronous state
//! machine so behavior can be tested without a runtime.
//!
//! # Module Organization
//!
//! - `types` - value types shared everywhere (Square, BoardLayout, GameSnapshot)
//! - `codec` - board layout and move notation encoding
//! - `rules` - [`rules::RuleEngine`] and the shakmaty-backed replay
//! - `resources` - session state pieces (live state, replay cursor, selection, clocks)
//! - `session` - [`session::SessionController`] tying the pieces together
//!
//! # Data Flow
//!
//! 1. A front end turns user input into an [`session::Intent`]
//! 2. The controller updates state and emits [`session::Effect`]s
//! 3. The runtime performs the effects and feeds replies back as events
//! 4. The front end renders [`session::SessionView`]

pub mod codec;
pub mod resources;
pub mod rules;
pub mod session;
pub mod types;

pub use session::{Effect, Intent, SessionController, SessionEvent, SessionView};
pub use types::{BoardLayout, GameSnapshot, Side, Square};
