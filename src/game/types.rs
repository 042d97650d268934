//! Type definitions for board state and authoritative snapshots
//!
//! Provides newtype patterns for squares and layouts so square indices,
//! notation strings and layout strings cannot be mixed up.
//!
//! # Square indexing
//!
//! `a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63`. File 0 is 'a', rank 0
//! is rank 1.

use crate::core::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placement field of the standard starting position
pub const INITIAL_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Side to move after `plies` half-moves from the initial position
    pub fn to_move_after(plies: usize) -> Side {
        if plies % 2 == 0 {
            Side::White
        } else {
            Side::Black
        }
    }

    /// Capitalized name for status text ("White"/"Black")
    pub fn title(self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("white"),
            Side::Black => f.write_str("black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// A piece on the board; letter case in layouts encodes the side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    /// Parse a layout letter (`P N B R Q K`, lowercase for Black)
    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        Some(Self { side, kind })
    }

    pub fn to_char(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// Unicode chess glyph used by the text renderer
    pub fn glyph(self) -> char {
        match (self.side, self.kind) {
            (Side::White, PieceKind::King) => '♔',
            (Side::White, PieceKind::Queen) => '♕',
            (Side::White, PieceKind::Rook) => '♖',
            (Side::White, PieceKind::Bishop) => '♗',
            (Side::White, PieceKind::Knight) => '♘',
            (Side::White, PieceKind::Pawn) => '♙',
            (Side::Black, PieceKind::King) => '♚',
            (Side::Black, PieceKind::Queen) => '♛',
            (Side::Black, PieceKind::Rook) => '♜',
            (Side::Black, PieceKind::Bishop) => '♝',
            (Side::Black, PieceKind::Knight) => '♞',
            (Side::Black, PieceKind::Pawn) => '♟',
        }
    }
}

/// Board square, `a1 = 0` through `h8 = 63`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Create a square from zero-based file (0 = 'a') and rank (0 = rank 1)
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Square(rank * 8 + file))
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn file(self) -> u8 {
        self.0 % 8
    }

    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    pub fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    /// One-based rank digit as it appears in notation
    pub fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SyncError::InvalidNotation {
            notation: s.to_string(),
        };
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Square::new(file - b'a', rank - b'1').ok_or_else(invalid)
    }
}

/// Layout string as received from the authority
///
/// The authority packs auxiliary fields after the placement, separated by
/// whitespace (`"<placement> w KQkq - 0 1"`). Only the placement is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardLayout(String);

impl BoardLayout {
    pub fn new(layout: impl Into<String>) -> Self {
        BoardLayout(layout.into())
    }

    pub fn initial() -> Self {
        BoardLayout(INITIAL_PLACEMENT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Piece-placement field, without any auxiliary fields
    pub fn placement(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or("")
    }
}

impl fmt::Display for BoardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalKind {
    #[default]
    None,
    Checkmate,
    Stalemate,
}

/// Remaining time per side in whole seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockReading {
    pub white_secs: u64,
    pub black_secs: u64,
}

/// The authoritative game state, replaced wholesale on every response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub layout: BoardLayout,
    pub side_to_move: Side,
    pub in_check: bool,
    pub game_over: bool,
    pub terminal: TerminalKind,
    pub clocks: ClockReading,
    /// Play order; index 0 is White's first move
    pub move_list: Vec<String>,
}

impl GameSnapshot {
    /// Snapshot of a fresh game with the given clocks
    pub fn initial(clocks: ClockReading) -> Self {
        Self {
            layout: BoardLayout::initial(),
            side_to_move: Side::White,
            in_check: false,
            game_over: false,
            terminal: TerminalKind::None,
            clocks,
            move_list: Vec::new(),
        }
    }

    /// Move-count parity must agree with the reported side to move
    pub fn verify_parity(&self) -> SyncResult<()> {
        let expected = Side::to_move_after(self.move_list.len());
        if expected != self.side_to_move {
            return Err(SyncError::integrity(format!(
                "{} moves played implies {} to move, authority reports {}",
                self.move_list.len(),
                expected,
                self.side_to_move
            )));
        }
        Ok(())
    }

    pub fn last_index(&self) -> Option<usize> {
        self.move_list.len().checked_sub(1)
    }
}
