//! Client-side session synchronizer for a remote chess authority
//!
//! The authority owns the game; this crate keeps a local view consistent
//! with it: submitting moves, polling clocks, and replaying the move history
//! without ever letting the two drift apart.

pub mod core;
pub mod game;
pub mod networking;
pub mod ui;
