//! Selection resource for tracking the armed origin square

use crate::game::types::Square;

/// At most one square is armed, awaiting a destination
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    armed: Option<Square>,
}

impl Selection {
    pub fn arm(&mut self, square: Square) {
        self.armed = Some(square);
    }

    pub fn clear(&mut self) {
        self.armed = None;
    }

    pub fn armed(&self) -> Option<Square> {
        self.armed
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}
