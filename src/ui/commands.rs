//! Line commands typed at the terminal
//!
//! ```text
//! e2                      select a square
//! ai                      let the authority move
//! reset [level] [secs]    new game (secs 0 = unlimited)
//! difficulty <level> [secs]
//! back | forward | start | live | jump <n> | play
//! retry | help | quit
//! ```
//!
//! `jump <n>` counts moves from 1; `jump 0` shows the initial position.

use crate::core::settings::{Difficulty, SessionConfig, TimeControl};
use crate::game::session::Intent;
use crate::game::types::Square;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  <square>                  select a square, e.g. e2 then e4
  ai                        ask the server to move
  reset [level] [seconds]   start a new game (seconds 0 = unlimited)
  difficulty <level> [secs] change difficulty (easy, medium, hard)
  back | forward            step through the move history
  start | live | jump <n>   jump to the start, the live position, or move n
  play                      start or stop auto-play
  retry                     resend the last failed request
  quit                      leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list.")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Invalid argument '{value}' for '{command}'")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}

/// Parse one input line; blank lines yield `None`
///
/// `current` fills in whatever `reset` and `difficulty` leave unspecified.
pub fn parse_command(line: &str, current: SessionConfig) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => Command::Quit,
        "help" | "?" => Command::Help,
        "ai" => Command::Intent(Intent::RequestAiMove),
        "back" | "b" => Command::Intent(Intent::StepBack),
        "forward" | "f" => Command::Intent(Intent::StepForward),
        "start" => Command::Intent(Intent::JumpToStart),
        "live" | "end" => Command::Intent(Intent::JumpToLive),
        "play" => Command::Intent(Intent::TogglePlay),
        "retry" => Command::Intent(Intent::Retry),
        "jump" => {
            let raw = args.first().ok_or(CommandError::MissingArgument {
                command: "jump",
                expected: "a move number",
            })?;
            let n: usize = raw.parse().map_err(|_| CommandError::InvalidArgument {
                command: "jump",
                value: raw.to_string(),
            })?;
            Command::Intent(Intent::JumpTo(n.checked_sub(1)))
        }
        "reset" => {
            let config = config_from_args("reset", &args, current)?;
            Command::Intent(Intent::Reset(config))
        }
        "difficulty" => {
            if args.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "difficulty",
                    expected: "easy, medium or hard",
                });
            }
            let config = config_from_args("difficulty", &args, current)?;
            Command::Intent(Intent::ChangeDifficulty(config))
        }
        other => match other.parse::<Square>() {
            Ok(square) => Command::Intent(Intent::SelectSquare(square)),
            Err(_) => return Err(CommandError::Unknown(head.to_string())),
        },
    };
    Ok(Some(command))
}

/// Config that later commands should build on after `intent` is sent
///
/// A difficulty change only takes effect once the authority acknowledges it,
/// so only a reset moves the baseline here.
pub fn baseline_after(intent: &Intent, current: SessionConfig) -> SessionConfig {
    match intent {
        Intent::Reset(next) => *next,
        _ => current,
    }
}

fn config_from_args(
    command: &'static str,
    args: &[&str],
    current: SessionConfig,
) -> Result<SessionConfig, CommandError> {
    let mut config = current;
    if let Some(raw) = args.first() {
        config.difficulty = raw
            .parse::<Difficulty>()
            .map_err(|_| CommandError::InvalidArgument {
                command,
                value: raw.to_string(),
            })?;
    }
    if let Some(raw) = args.get(1) {
        let secs: u32 = raw.parse().map_err(|_| CommandError::InvalidArgument {
            command,
            value: raw.to_string(),
        })?;
        config.time_control = TimeControl::from_wire_seconds(secs);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        parse_command(line, SessionConfig::default())
    }

    #[test]
    fn test_blank_line_is_nothing() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn test_square_selects() {
        assert_eq!(
            parse("e2"),
            Ok(Some(Command::Intent(Intent::SelectSquare("e2".parse().unwrap()))))
        );
        assert!(matches!(parse("z9"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn test_jump_counts_from_one() {
        assert_eq!(parse("jump 0"), Ok(Some(Command::Intent(Intent::JumpTo(None)))));
        assert_eq!(parse("jump 3"), Ok(Some(Command::Intent(Intent::JumpTo(Some(2))))));
        assert!(matches!(parse("jump"), Err(CommandError::MissingArgument { .. })));
        assert!(matches!(parse("jump x"), Err(CommandError::InvalidArgument { .. })));
    }

    #[test]
    fn test_reset_keeps_unspecified_fields() {
        assert_eq!(
            parse("reset"),
            Ok(Some(Command::Intent(Intent::Reset(SessionConfig::default()))))
        );
        assert_eq!(
            parse("reset hard 0"),
            Ok(Some(Command::Intent(Intent::Reset(SessionConfig {
                difficulty: Difficulty::Hard,
                time_control: TimeControl::Unlimited,
            }))))
        );
    }

    #[test]
    fn test_difficulty_requires_level() {
        assert!(matches!(parse("difficulty"), Err(CommandError::MissingArgument { .. })));
        assert!(matches!(parse("difficulty insane"), Err(CommandError::InvalidArgument { .. })));
        assert_eq!(
            parse("difficulty Easy 300"),
            Ok(Some(Command::Intent(Intent::ChangeDifficulty(SessionConfig {
                difficulty: Difficulty::Easy,
                time_control: TimeControl::Seconds(300),
            }))))
        );
    }

    #[test]
    fn test_only_reset_moves_the_baseline() {
        let current = SessionConfig::default();
        let next = SessionConfig {
            difficulty: Difficulty::Hard,
            time_control: TimeControl::Unlimited,
        };
        assert_eq!(baseline_after(&Intent::ChangeDifficulty(next), current), current);
        assert_eq!(baseline_after(&Intent::Reset(next), current), next);
        assert_eq!(baseline_after(&Intent::RequestAiMove, current), current);
    }

    #[test]
    fn test_navigation_words() {
        assert_eq!(parse("back"), Ok(Some(Command::Intent(Intent::StepBack))));
        assert_eq!(parse("LIVE"), Ok(Some(Command::Intent(Intent::JumpToLive))));
        assert_eq!(parse("play"), Ok(Some(Command::Intent(Intent::TogglePlay))));
        assert_eq!(parse("quit"), Ok(Some(Command::Quit)));
    }
}
