//! JSON bodies exchanged with the game authority
//!
//! Field names are fixed by the authority and must not be renamed. The
//! authority reports rejections as `{"error": "..."}`, usually with a 200
//! status, so every payload is parsed through [`Envelope`] first.

use crate::core::settings::SessionConfig;
use crate::game::types::{BoardLayout, ClockReading, GameSnapshot, Side, TerminalKind};
use serde::{Deserialize, Serialize};

/// Sentinel move that asks for the current state without moving
pub const INITIAL_SENTINEL: &str = "initial";

/// Body of `POST /move`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub notation: String,
}

impl MoveRequest {
    pub fn new(notation: impl Into<String>) -> Self {
        Self {
            notation: notation.into(),
        }
    }

    pub fn initial() -> Self {
        Self::new(INITIAL_SENTINEL)
    }

    pub fn is_initial(&self) -> bool {
        self.notation == INITIAL_SENTINEL
    }
}

/// Body of `POST /reset` and `POST /set_difficulty`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRequest {
    pub difficulty: String,
    /// Seconds per side, 0 for unlimited
    pub time_limit: u32,
}

impl From<SessionConfig> for ConfigRequest {
    fn from(config: SessionConfig) -> Self {
        Self {
            difficulty: config.difficulty.as_str().to_string(),
            time_limit: config.time_control.as_wire_seconds(),
        }
    }
}

/// `{"status": "ok"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusAck {
    pub status: String,
}

/// Reply of `GET /get_time`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWire {
    pub white_time: u64,
    pub black_time: u64,
}

impl From<TimeWire> for ClockReading {
    fn from(wire: TimeWire) -> Self {
        ClockReading {
            white_secs: wire.white_time,
            black_secs: wire.black_time,
        }
    }
}

/// Game state as the authority serializes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotWire {
    pub fen: String,
    pub turn: Side,
    pub in_check: bool,
    pub game_over: bool,
    #[serde(default)]
    pub checkmate: bool,
    #[serde(default)]
    pub stalemate: bool,
    #[serde(default)]
    pub white_time: u64,
    #[serde(default)]
    pub black_time: u64,
    #[serde(default)]
    pub move_history: Vec<String>,
}

impl From<SnapshotWire> for GameSnapshot {
    fn from(wire: SnapshotWire) -> Self {
        let terminal = if wire.checkmate {
            TerminalKind::Checkmate
        } else if wire.stalemate {
            TerminalKind::Stalemate
        } else {
            TerminalKind::None
        };
        GameSnapshot {
            layout: BoardLayout::new(wire.fen),
            side_to_move: wire.turn,
            in_check: wire.in_check,
            game_over: wire.game_over,
            terminal,
            clocks: ClockReading {
                white_secs: wire.white_time,
                black_secs: wire.black_time,
            },
            move_list: wire.move_history,
        }
    }
}

impl From<&GameSnapshot> for SnapshotWire {
    fn from(snapshot: &GameSnapshot) -> Self {
        SnapshotWire {
            fen: snapshot.layout.as_str().to_string(),
            turn: snapshot.side_to_move,
            in_check: snapshot.in_check,
            game_over: snapshot.game_over,
            checkmate: snapshot.terminal == TerminalKind::Checkmate,
            stalemate: snapshot.terminal == TerminalKind::Stalemate,
            white_time: snapshot.clocks.white_secs,
            black_time: snapshot.clocks.black_secs,
            move_history: snapshot.move_list.clone(),
        }
    }
}

/// `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Any authority reply: a rejection or the expected payload
///
/// The rejection arm is tried first, so a payload that happens to carry an
/// `error` field is always treated as a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Rejected(ErrorBody),
    Payload(T),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::{Difficulty, TimeControl};

    #[test]
    fn test_move_request_uses_move_field() {
        let body = serde_json::to_value(MoveRequest::new("e2e4")).unwrap();
        assert_eq!(body, serde_json::json!({ "move": "e2e4" }));
        assert!(MoveRequest::initial().is_initial());
    }

    #[test]
    fn test_config_request_encodes_unlimited_as_zero() {
        let config = SessionConfig {
            difficulty: Difficulty::Hard,
            time_control: TimeControl::Unlimited,
        };
        let body = serde_json::to_value(ConfigRequest::from(config)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "difficulty": "hard", "time_limit": 0 })
        );
    }

    #[test]
    fn test_snapshot_wire_to_game_snapshot() {
        let json = serde_json::json!({
            "fen": "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "turn": "black",
            "in_check": false,
            "game_over": false,
            "checkmate": false,
            "stalemate": false,
            "white_time": 598,
            "black_time": 600,
            "move_history": ["e2e4"]
        });
        let wire: SnapshotWire = serde_json::from_value(json).unwrap();
        let snapshot = GameSnapshot::from(wire);

        assert_eq!(snapshot.side_to_move, Side::Black);
        assert_eq!(snapshot.terminal, TerminalKind::None);
        assert_eq!(snapshot.clocks.white_secs, 598);
        assert_eq!(snapshot.move_list, vec!["e2e4".to_string()]);
        assert!(snapshot.verify_parity().is_ok());
    }

    #[test]
    fn test_checkmate_flag_maps_to_terminal_kind() {
        let json = serde_json::json!({
            "fen": "8/8/8/8/8/8/8/8 w - - 0 1",
            "turn": "black",
            "in_check": true,
            "game_over": true,
            "checkmate": true,
            "stalemate": false
        });
        let wire: SnapshotWire = serde_json::from_value(json).unwrap();
        assert_eq!(GameSnapshot::from(wire).terminal, TerminalKind::Checkmate);
    }

    #[test]
    fn test_envelope_prefers_rejection() {
        let envelope: Envelope<SnapshotWire> =
            serde_json::from_str(r#"{"error": "Illegal move"}"#).unwrap();
        assert_eq!(
            envelope,
            Envelope::Rejected(ErrorBody {
                error: "Illegal move".to_string()
            })
        );

        let envelope: Envelope<TimeWire> =
            serde_json::from_str(r#"{"white_time": 10, "black_time": 20}"#).unwrap();
        assert!(matches!(envelope, Envelope::Payload(_)));
    }

    #[test]
    fn test_missing_required_field_fails() {
        let result: Result<Envelope<SnapshotWire>, _> =
            serde_json::from_str(r#"{"fen": "8/8/8/8/8/8/8/8"}"#);
        assert!(result.is_err());
    }
}
