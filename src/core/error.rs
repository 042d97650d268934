//! Error types for the session synchronizer
//!
//! Every layer (codecs, remote client, controller, settings) reports failures
//! through [`SyncError`]. The codec and client layers never recover on their
//! own; the session controller decides whether a failure is surfaced, retried
//! by the user, or answered with a resync.
//!
//! # Taxonomy
//!
//! - [`SyncError::MalformedLayout`] - the authority sent a board layout that
//!   does not decode to 64 squares. Fatal to that render only.
//! - [`SyncError::Remote`] - the authority answered with a well-formed
//!   rejection. Shown to the user verbatim.
//! - [`SyncError::Transport`] - network or parse failure. Retryable.
//! - [`SyncError::StateIntegrity`] - the client's view disagrees with itself
//!   (move parity, unreplayable history). Answered with a resync.

use thiserror::Error;

/// Errors that can occur while synchronizing with the remote authority
#[derive(Error, Debug)]
pub enum SyncError {
    /// Board layout string did not decode to exactly 64 squares
    #[error("Malformed board layout '{layout}': {reason}")]
    MalformedLayout { layout: String, reason: String },

    /// Move notation could not be parsed
    #[error("Invalid move notation: '{notation}'")]
    InvalidNotation { notation: String },

    /// The authority rejected the request; the message is passed through untouched
    #[error("{message}")]
    Remote { message: String },

    /// The exchange itself failed (connection, status, body parse)
    #[error("Transport failure: {message}")]
    Transport { message: String },

    /// The local view of the session contradicts itself
    #[error("Session state integrity violated: {message}")]
    StateIntegrity { message: String },

    /// Difficulty string outside easy/medium/hard
    #[error("Invalid difficulty level: '{value}'")]
    InvalidDifficulty { value: String },

    /// Settings file I/O error
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("Settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),
}

impl SyncError {
    pub fn malformed_layout(layout: &str, reason: impl Into<String>) -> Self {
        SyncError::MalformedLayout {
            layout: layout.to_string(),
            reason: reason.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        SyncError::Transport {
            message: message.into(),
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        SyncError::StateIntegrity {
            message: message.into(),
        }
    }

    /// Only transport failures may be re-issued by the user unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Transport { .. })
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SyncError::Remote { .. })
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport {
            message: err.to_string(),
        }
    }
}

/// Result type alias for synchronizer operations
pub type SyncResult<T> = Result<T, SyncError>;
