//! Rule engine seam used for history replay
//!
//! The client never judges legality of live moves; that is the authority's
//! job. It does need to rebuild past positions for the replay cursor, which
//! means playing the move list forward from the initial position. That work
//! goes through [`RuleEngine`] so the replay logic stays testable with a
//! scripted engine.
//!
//! # Module Structure
//!
//! - `standard` - [`StandardRules`], standard chess backed by `shakmaty`

pub mod standard;

#[cfg(test)]
mod tests;

use crate::core::error::SyncResult;
use crate::game::types::BoardLayout;

/// Rebuilds a position from the initial position and a move prefix
pub trait RuleEngine: Send + Sync {
    /// Layout after playing `moves` in order from the initial position
    ///
    /// Fails with `StateIntegrity` when a move cannot be parsed or played.
    fn replay(&self, moves: &[String]) -> SyncResult<BoardLayout>;
}

pub use standard::StandardRules;
