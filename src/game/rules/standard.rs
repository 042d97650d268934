//! Standard chess replay backed by `shakmaty`

use crate::core::error::{SyncError, SyncResult};
use crate::game::codec::{notation, position, Placement};
use crate::game::rules::RuleEngine;
use crate::game::types::{BoardLayout, Piece, PieceKind, Side, Square};
use shakmaty::uci::UciMove;
use shakmaty::{Chess, Color, Position, Role};

/// Standard chess rules from the usual starting position
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRules;

impl RuleEngine for StandardRules {
    fn replay(&self, moves: &[String]) -> SyncResult<BoardLayout> {
        let mut pos = Chess::default();

        for (ply, text) in moves.iter().enumerate() {
            let parsed = notation::decode(text).map_err(|e| {
                SyncError::integrity(format!("history entry {} is unreadable: {e}", ply + 1))
            })?;
            let uci: UciMove = parsed.to_string().parse().map_err(|_| {
                SyncError::integrity(format!("history entry {} ({text}) is unreadable", ply + 1))
            })?;
            let m = uci.to_move(&pos).map_err(|_| {
                SyncError::integrity(format!(
                    "history entry {} ({text}) is not playable in the replayed position",
                    ply + 1
                ))
            })?;
            pos.play_unchecked(&m);
        }

        Ok(position::encode(&placement_of(&pos)))
    }
}

fn placement_of(pos: &Chess) -> Placement {
    let mut placement = Placement::default();
    let board = pos.board();

    for sq in shakmaty::Square::ALL {
        let Some(piece) = board.piece_at(sq) else {
            continue;
        };
        let kind = match piece.role {
            Role::Pawn => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King => PieceKind::King,
        };
        let side = if piece.color == Color::White {
            Side::White
        } else {
            Side::Black
        };
        if let Some(square) = Square::from_index(sq as usize) {
            placement.set(square, Some(Piece::new(side, kind)));
        }
    }

    placement
}
