//! Move notation codec
//!
//! Coordinate notation as the authority expects it: origin file, origin rank,
//! destination file, destination rank (`"e2e4"`). Files are `a`-`h`, ranks
//! are one-based. A fifth character names a promotion piece (`"e7e8q"`).
//!
//! This codec knows nothing about legality; the authority and the replay
//! rule engine decide whether a move can be played.

use crate::core::error::{SyncError, SyncResult};
use crate::game::types::{PieceKind, Square};
use std::fmt;

/// A decoded coordinate move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveNotation {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl fmt::Display for MoveNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", promotion_char(kind))?;
        }
        Ok(())
    }
}

/// Four-character notation for a plain move
pub fn encode(from: Square, to: Square) -> String {
    format!("{from}{to}")
}

/// Notation with an optional promotion suffix
pub fn encode_with_promotion(from: Square, to: Square, promotion: Option<PieceKind>) -> String {
    MoveNotation {
        from,
        to,
        promotion,
    }
    .to_string()
}

/// Inverse of [`encode`] / [`encode_with_promotion`]
pub fn decode(notation: &str) -> SyncResult<MoveNotation> {
    let invalid = || SyncError::InvalidNotation {
        notation: notation.to_string(),
    };

    if !notation.is_ascii() || !(4..=5).contains(&notation.len()) {
        return Err(invalid());
    }

    let from: Square = notation[0..2].parse().map_err(|_| invalid())?;
    let to: Square = notation[2..4].parse().map_err(|_| invalid())?;
    let promotion = match notation[4..].chars().next() {
        None => None,
        Some(c) => Some(promotion_kind(c).ok_or_else(invalid)?),
    };

    Ok(MoveNotation {
        from,
        to,
        promotion,
    })
}

fn promotion_char(kind: PieceKind) -> char {
    match kind {
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::Pawn => 'p',
        PieceKind::King => 'k',
    }
}

fn promotion_kind(c: char) -> Option<PieceKind> {
    match c.to_ascii_lowercase() {
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        _ => None,
    }
}
