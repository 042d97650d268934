//! Replay rule engine tests
//!
//! Validates that replaying a move list from the initial position produces
//! the expected layout and that unplayable history is reported as an
//! integrity violation rather than silently skipped.

use super::*;
use crate::core::error::SyncError;
use crate::game::types::INITIAL_PLACEMENT;

fn moves(list: &[&str]) -> Vec<String> {
    list.iter().map(|m| m.to_string()).collect()
}

// ============================================================================
// Replay Tests
// ============================================================================

#[test]
fn test_empty_history_is_initial_position() {
    let layout = StandardRules.replay(&[]).unwrap();
    assert_eq!(layout.as_str(), INITIAL_PLACEMENT);
}

#[test]
fn test_replay_single_pawn_push() {
    let layout = StandardRules.replay(&moves(&["e2e4"])).unwrap();
    assert_eq!(layout.as_str(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR");
}

#[test]
fn test_replay_open_game() {
    let layout = StandardRules
        .replay(&moves(&["e2e4", "e7e5", "g1f3", "b8c6"]))
        .unwrap();
    assert_eq!(
        layout.as_str(),
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"
    );
}

#[test]
fn test_replay_castling_moves_rook() {
    let layout = StandardRules
        .replay(&moves(&["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "e1g1"]))
        .unwrap();
    assert_eq!(
        layout.as_str(),
        "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQ1RK1"
    );
}

#[test]
fn test_replay_is_deterministic() {
    //! Replaying the same prefix twice yields the same layout
    let history = moves(&["d2d4", "d7d5", "c2c4", "e7e6", "b1c3", "g8f6"]);
    for i in 0..=history.len() {
        let first = StandardRules.replay(&history[..i]).unwrap();
        let second = StandardRules.replay(&history[..i]).unwrap();
        assert_eq!(first, second, "prefix of length {i} must replay identically");
    }
}

#[test]
fn test_illegal_history_is_integrity_error() {
    let err = StandardRules.replay(&moves(&["e2e5"])).unwrap_err();
    assert!(matches!(err, SyncError::StateIntegrity { .. }));
}

#[test]
fn test_garbage_history_is_integrity_error() {
    let err = StandardRules.replay(&moves(&["e2e4", "nonsense"])).unwrap_err();
    assert!(matches!(err, SyncError::StateIntegrity { .. }));
    assert!(err.to_string().contains("history entry 2"));
}
