//! Live session state
//!
//! Holds the single authoritative [`GameSnapshot`] most recently received
//! from the authority. Snapshots are replaced wholesale, never patched; a
//! snapshot whose move parity disagrees with its side to move is refused.

use crate::core::error::SyncResult;
use crate::game::codec::{position, Placement};
use crate::game::types::{BoardLayout, ClockReading, GameSnapshot, Side};

#[derive(Debug, Default, Clone)]
pub struct LiveSessionState {
    snapshot: Option<GameSnapshot>,
}

impl LiveSessionState {
    /// Replace the held snapshot after checking its parity invariant
    ///
    /// On failure the previous snapshot is kept.
    pub fn accept(&mut self, snapshot: GameSnapshot) -> SyncResult<&GameSnapshot> {
        snapshot.verify_parity()?;
        let held: &GameSnapshot = self.snapshot.insert(snapshot);
        Ok(held)
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Layout to display in live mode; the initial position before the first snapshot
    pub fn layout(&self) -> BoardLayout {
        self.snapshot
            .as_ref()
            .map_or_else(BoardLayout::initial, |s| s.layout.clone())
    }

    /// Decoded live board
    pub fn placement(&self) -> SyncResult<Placement> {
        position::decode(&self.layout())
    }

    pub fn side_to_move(&self) -> Side {
        self.snapshot.as_ref().map_or(Side::White, |s| s.side_to_move)
    }

    pub fn move_list(&self) -> &[String] {
        self.snapshot
            .as_ref()
            .map(|s| s.move_list.as_slice())
            .unwrap_or(&[])
    }

    /// Clocks travel independently of moves; only the clock fields change
    pub fn update_clocks(&mut self, clocks: ClockReading) {
        if let Some(snapshot) = self.snapshot.as_mut() {
            snapshot.clocks = clocks;
        }
    }
}
