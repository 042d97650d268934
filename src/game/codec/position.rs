//! Position codec
//!
//! Converts between the compact rank-delimited layout string and a
//! square-indexed piece map. Ranks appear from rank 8 down to rank 1, files
//! from 'a' to 'h'; a digit is a run of that many empty squares.
//!
//! Both directions are pure. Any layout that does not describe exactly eight
//! ranks of eight squares is a contract violation by the authority and comes
//! back as [`SyncError::MalformedLayout`].

use crate::core::error::{SyncError, SyncResult};
use crate::game::types::{BoardLayout, Piece, Square};

const RANK_DELIMITER: char = '/';

/// Square-indexed piece map (`a1 = 0`, `h8 = 63`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    squares: [Option<Piece>; 64],
}

impl Default for Placement {
    fn default() -> Self {
        Self { squares: [None; 64] }
    }
}

impl Placement {
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|p| p.is_some()).count()
    }

    /// Occupied squares in index order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().enumerate().filter_map(|(index, piece)| {
            let piece = (*piece)?;
            Square::from_index(index).map(|sq| (sq, piece))
        })
    }
}

/// Decode the placement field of `layout` into a piece map
pub fn decode(layout: &BoardLayout) -> SyncResult<Placement> {
    let text = layout.placement();
    let ranks: Vec<&str> = text.split(RANK_DELIMITER).collect();
    if ranks.len() != 8 {
        return Err(SyncError::malformed_layout(
            text,
            format!("expected 8 ranks, found {}", ranks.len()),
        ));
    }

    let mut placement = Placement::default();
    for (row, rank_text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file: u8 = 0;

        for c in rank_text.chars() {
            if let Some(run) = c.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(SyncError::malformed_layout(
                        text,
                        format!("empty run '{c}' outside 1-8"),
                    ));
                }
                file += run as u8;
            } else if let Some(piece) = Piece::from_char(c) {
                let square = Square::new(file, rank).ok_or_else(|| {
                    SyncError::malformed_layout(text, format!("rank {} overflows", rank + 1))
                })?;
                placement.set(square, Some(piece));
                file += 1;
            } else {
                return Err(SyncError::malformed_layout(
                    text,
                    format!("unrecognized character '{c}'"),
                ));
            }

            if file > 8 {
                return Err(SyncError::malformed_layout(
                    text,
                    format!("rank {} overflows", rank + 1),
                ));
            }
        }

        if file != 8 {
            return Err(SyncError::malformed_layout(
                text,
                format!("rank {} covers {} squares", rank + 1, file),
            ));
        }
    }

    Ok(placement)
}

/// Encode a piece map back into a placement-only layout
pub fn encode(placement: &Placement) -> BoardLayout {
    let mut out = String::with_capacity(71);

    for rank in (0..8u8).rev() {
        let mut empty = 0u8;
        for file in 0..8u8 {
            let piece = Square::new(file, rank).and_then(|sq| placement.piece_at(sq));
            match piece {
                Some(piece) => {
                    if empty > 0 {
                        out.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    out.push(piece.to_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push((b'0' + empty) as char);
        }
        if rank > 0 {
            out.push(RANK_DELIMITER);
        }
    }

    BoardLayout::new(out)
}
