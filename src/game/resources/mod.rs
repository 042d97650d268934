//! Session resources - the state the controller owns
//!
//! # Resource Categories
//!
//! ## Authoritative State
//! - [`LiveSessionState`] - the latest snapshot from the authority
//!
//! ## History Navigation
//! - [`ReplayCursor`] - independent index into the move list with a derived layout
//!
//! ## Player Interaction
//! - [`Selection`] - the armed origin square, if any
//!
//! ## Game Timing
//! - [`ClockDisplay`] - last clock reading and its formatting
//!
//! ## Game Status
//! - [`GameOutcome`] / [`status_text`] - terminal outcome and the status line

pub mod game_over;
pub mod live;
pub mod replay;
pub mod selection;
pub mod timer;


pub use game_over::{status_text, GameOutcome};
pub use live::LiveSessionState;
pub use replay::ReplayCursor;
pub use selection::Selection;
pub use timer::ClockDisplay;
