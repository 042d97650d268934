//! Core module - error taxonomy, settings and logging
//!
//! Infrastructure shared by every other module:
//!
//! - [`error`] - [`SyncError`] and the [`SyncResult`] alias
//! - [`settings`] - [`ClientSettings`] persistence and the [`SessionConfig`] sent to the authority
//! - [`logging`] - `tracing` subscriber installation

pub mod error;
pub mod logging;
pub mod settings;

pub use error::{SyncError, SyncResult};
pub use settings::{ClientSettings, Difficulty, SessionConfig, TimeControl};
