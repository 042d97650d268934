//! UI module - terminal front end
//!
//! - **terminal**: Unicode board drawing and the HUD (status, clocks, replay
//!   position, notices), plus [`TerminalRenderer`] for the session driver
//! - **commands**: parsing of the line commands typed on stdin

pub mod commands;
pub mod terminal;

pub use commands::{parse_command, Command};
pub use terminal::{render, render_view, TerminalRenderer};
