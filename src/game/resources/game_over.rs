//! Game outcome and status text
//!
//! Status text is a pure function of the snapshot. For a finished game the
//! side that was to move at termination is the side that got mated, so the
//! *other* side wins a checkmate; stalemate is always a draw.
//!
//! ```text
//! Current turn: white
//! Current turn: black | Check!
//! Checkmate! White wins!
//! Stalemate! The game is a draw.
//! Game over!
//! ```

use crate::game::types::{GameSnapshot, Side, TerminalKind};
use std::fmt;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// `winner` delivered mate
    Checkmate { winner: Side },
    Stalemate,
    /// The authority reported the game over without naming checkmate or stalemate
    Other,
}

impl GameOutcome {
    /// Outcome of a snapshot, `None` while the game is still running
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Option<Self> {
        if !snapshot.game_over {
            return None;
        }
        Some(match snapshot.terminal {
            TerminalKind::Checkmate => GameOutcome::Checkmate {
                winner: snapshot.side_to_move.opposite(),
            },
            TerminalKind::Stalemate => GameOutcome::Stalemate,
            TerminalKind::None => GameOutcome::Other,
        })
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            GameOutcome::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Checkmate { winner } => write!(f, "Checkmate! {} wins!", winner.title()),
            GameOutcome::Stalemate => f.write_str("Stalemate! The game is a draw."),
            GameOutcome::Other => f.write_str("Game over!"),
        }
    }
}

/// Status line for a snapshot
pub fn status_text(snapshot: &GameSnapshot) -> String {
    if let Some(outcome) = GameOutcome::from_snapshot(snapshot) {
        return outcome.to_string();
    }
    let mut status = format!("Current turn: {}", snapshot.side_to_move);
    if snapshot.in_check {
        status.push_str(" | Check!");
    }
    status
}
