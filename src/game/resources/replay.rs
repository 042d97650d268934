//! Replay cursor over the live move list
//!
//! An index into the move list that is independent of the live snapshot, used
//! to inspect earlier positions without touching live state.
//!
//! # Derivation
//!
//! The displayed layout is always rebuilt by replaying `moves[0..=index]`
//! from the initial position through a [`RuleEngine`]. Nothing is ever
//! applied or undone incrementally, so arbitrary interleaving of forward and
//! backward steps cannot drift.
//!
//! # Index
//!
//! `None` is the initial position before any move; `Some(i)` is the position
//! after move `i`. The cursor is "at the live end" when the index names the
//! last move (or is `None` with an empty move list).
//!
//! # Lifecycle
//!
//! Recreated by the session controller whenever a new snapshot arrives,
//! positioned at the end of the new move list. Only navigation intents and the
//! auto-play tick move it afterwards.

use crate::core::error::SyncResult;
use crate::game::rules::RuleEngine;
use crate::game::types::BoardLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayCursor {
    moves: Vec<String>,
    index: Option<usize>,
    derived: BoardLayout,
    playing: bool,
}

impl Default for ReplayCursor {
    fn default() -> Self {
        Self {
            moves: Vec::new(),
            index: None,
            derived: BoardLayout::initial(),
            playing: false,
        }
    }
}

impl ReplayCursor {
    /// Cursor positioned after the last move of `moves`
    pub fn at_end(moves: Vec<String>, engine: &dyn RuleEngine) -> SyncResult<Self> {
        let derived = engine.replay(&moves)?;
        let index = moves.len().checked_sub(1);
        Ok(Self {
            moves,
            index,
            derived,
            playing: false,
        })
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn derived_layout(&self) -> &BoardLayout {
        &self.derived
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn last_index(&self) -> Option<usize> {
        self.moves.len().checked_sub(1)
    }

    pub fn is_at_end(&self) -> bool {
        self.index == self.last_index()
    }

    pub fn is_at_start(&self) -> bool {
        self.index.is_none()
    }

    /// Live play is disabled while auto-playing or looking at a past position
    pub fn blocks_live_play(&self) -> bool {
        self.playing || !self.is_at_end()
    }

    /// Move one ply back; `Ok(false)` at the initial position
    pub fn step_back(&mut self, engine: &dyn RuleEngine) -> SyncResult<bool> {
        match self.index {
            None => Ok(false),
            Some(0) => self.seek(None, engine).map(|_| true),
            Some(i) => self.seek(Some(i - 1), engine).map(|_| true),
        }
    }

    /// Move one ply forward; `Ok(false)` at the last move
    pub fn step_forward(&mut self, engine: &dyn RuleEngine) -> SyncResult<bool> {
        if self.is_at_end() {
            return Ok(false);
        }
        let next = self.index.map_or(0, |i| i + 1);
        self.seek(Some(next), engine).map(|_| true)
    }

    /// Jump to any index; out-of-range targets are refused with `Ok(false)`
    pub fn jump_to(&mut self, index: Option<usize>, engine: &dyn RuleEngine) -> SyncResult<bool> {
        if let Some(i) = index {
            if i >= self.moves.len() {
                return Ok(false);
            }
        }
        self.seek(index, engine).map(|_| true)
    }

    pub fn jump_to_start(&mut self, engine: &dyn RuleEngine) -> SyncResult<bool> {
        self.jump_to(None, engine)
    }

    pub fn jump_to_end(&mut self, engine: &dyn RuleEngine) -> SyncResult<bool> {
        self.jump_to(self.last_index(), engine)
    }

    /// Start or stop auto-play, returning the new playing state
    ///
    /// Starting from the live end rewinds to the initial position first so
    /// the whole game plays back. An empty move list never starts playing.
    pub fn toggle_play(&mut self, engine: &dyn RuleEngine) -> SyncResult<bool> {
        if self.playing {
            self.playing = false;
            return Ok(false);
        }
        if self.moves.is_empty() {
            return Ok(false);
        }
        if self.is_at_end() {
            self.seek(None, engine)?;
        }
        self.playing = true;
        Ok(true)
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// One auto-play step; stops playing once the last move is shown
    ///
    /// Returns whether playback should continue.
    pub fn advance_playback(&mut self, engine: &dyn RuleEngine) -> SyncResult<bool> {
        if !self.playing {
            return Ok(false);
        }
        if let Err(e) = self.step_forward(engine) {
            self.playing = false;
            return Err(e);
        }
        if self.is_at_end() {
            self.playing = false;
        }
        Ok(self.playing)
    }

    fn seek(&mut self, index: Option<usize>, engine: &dyn RuleEngine) -> SyncResult<()> {
        let prefix = match index {
            None => &self.moves[..0],
            Some(i) => &self.moves[..=i],
        };
        // Index and layout only change together.
        self.derived = engine.replay(prefix)?;
        self.index = index;
        Ok(())
    }
}
