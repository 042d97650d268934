//! Text rendering of the board and session HUD

use crate::core::error::SyncResult;
use crate::game::codec::position;
use crate::game::session::{SessionView, ViewMode};
use crate::game::types::{BoardLayout, Side, Square};
use crate::networking::driver::Renderer;
use std::fmt::Write as _;
use std::io::{self, Write};
use tracing::warn;

const EMPTY_SQUARE: char = '·';
const FILES_FOOTER: &str = "   a  b  c  d  e  f  g  h";

/// Draw `layout` with rank 8 on top, marking `armed` with brackets
pub fn render(layout: &BoardLayout, armed: Option<Square>) -> SyncResult<String> {
    let board = position::decode(layout)?;
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let _ = write!(out, "{} ", rank + 1);
        for file in 0..8u8 {
            let square = Square::new(file, rank);
            let glyph = square
                .and_then(|sq| board.piece_at(sq))
                .map_or(EMPTY_SQUARE, |piece| piece.glyph());
            if square.is_some() && square == armed {
                let _ = write!(out, "[{glyph}]");
            } else {
                let _ = write!(out, " {glyph} ");
            }
        }
        out.push('\n');
    }
    out.push_str(FILES_FOOTER);
    out.push('\n');
    Ok(out)
}

/// Board plus status, clocks, replay position and notice
pub fn render_view(view: &SessionView) -> String {
    let mut out = match render(&view.layout, view.armed) {
        Ok(board) => board,
        Err(e) => {
            warn!("[SESSION] Cannot draw board: {}", e);
            format!("Board unavailable: {e}\n")
        }
    };

    let _ = writeln!(out, "{}", view.status);
    let _ = writeln!(
        out,
        "White {}  Black {}",
        view.clocks.formatted(Side::White),
        view.clocks.formatted(Side::Black)
    );

    let position = view.replay_index.map_or(0, |i| i + 1);
    let mut replay_line = format!("Move {}/{}", position, view.replay_len);
    if view.mode == ViewMode::Replay {
        replay_line.push_str(" (replay)");
    }
    if view.playing {
        replay_line.push_str(" ▶");
    }
    let _ = writeln!(out, "{replay_line}");

    if view.awaiting_response {
        let _ = writeln!(out, "Waiting for the server...");
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    if view.can_retry {
        let _ = writeln!(out, "Type 'retry' to send the last request again.");
    }
    out
}

/// [`Renderer`] writing frames to any writer, stdout by default
pub struct TerminalRenderer<W: Write + Send = io::Stdout> {
    out: W,
    last_frame: Option<String>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_frame: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &SessionView) {
        let frame = render_view(view);
        // Clock polls with unchanged readings produce identical frames.
        if self.last_frame.as_deref() == Some(frame.as_str()) {
            return;
        }
        if let Err(e) = writeln!(self.out, "{frame}").and_then(|_| self.out.flush()) {
            warn!("[SESSION] Failed to draw frame: {}", e);
        }
        self.last_frame = Some(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::TimeControl;
    use crate::game::resources::ClockDisplay;
    use crate::game::session::SessionPhase;
    use crate::game::types::ClockReading;

    fn view() -> SessionView {
        SessionView {
            layout: BoardLayout::initial(),
            mode: ViewMode::Live,
            phase: SessionPhase::AwaitingMove(Side::White),
            status: "Current turn: white".to_string(),
            armed: None,
            clocks: ClockDisplay::new(TimeControl::Seconds(600)),
            replay_index: None,
            replay_len: 0,
            playing: false,
            awaiting_response: false,
            can_retry: false,
            notice: None,
        }
    }

    #[test]
    fn test_initial_board_rank_order() {
        let board = render(&BoardLayout::initial(), None).unwrap();
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8  ♜  ♞  ♝  ♛  ♚  ♝  ♞  ♜ ");
        assert_eq!(lines[6], "2  ♙  ♙  ♙  ♙  ♙  ♙  ♙  ♙ ");
        assert_eq!(lines[8], FILES_FOOTER);
        assert!(lines[4].contains(EMPTY_SQUARE));
    }

    #[test]
    fn test_armed_square_is_bracketed() {
        let armed = "e2".parse().ok();
        let board = render(&BoardLayout::initial(), armed).unwrap();
        let rank_two = board.lines().nth(6).unwrap();
        assert!(rank_two.contains("[♙]"));
        assert_eq!(rank_two.matches('[').count(), 1);
    }

    #[test]
    fn test_malformed_layout_is_error() {
        assert!(render(&BoardLayout::new("8/8/8"), None).is_err());

        let mut v = view();
        v.layout = BoardLayout::new("8/8/8");
        assert!(render_view(&v).starts_with("Board unavailable"));
    }

    #[test]
    fn test_hud_lines() {
        let mut v = view();
        v.clocks.update(ClockReading {
            white_secs: 65,
            black_secs: 600,
        });
        v.replay_index = Some(2);
        v.replay_len = 5;
        v.mode = ViewMode::Replay;
        v.can_retry = true;

        let frame = render_view(&v);
        assert!(frame.contains("Current turn: white"));
        assert!(frame.contains("White 1:05  Black 10:00"));
        assert!(frame.contains("Move 3/5 (replay)"));
        assert!(frame.contains("retry"));
    }

    #[test]
    fn test_unlimited_clocks_show_dashes() {
        let mut v = view();
        v.clocks = ClockDisplay::new(TimeControl::Unlimited);
        assert!(render_view(&v).contains("White --:--  Black --:--"));
    }

    #[test]
    fn test_renderer_skips_identical_frames() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&view());
        let first_len = renderer.out.len();
        renderer.render(&view());
        assert_eq!(renderer.out.len(), first_len);

        let mut v = view();
        v.status = "Current turn: black".to_string();
        renderer.render(&v);
        assert!(renderer.into_inner().len() > first_len);
    }
}
