//! Client settings and persistence
//!
//! Saves and loads [`ClientSettings`] to/from a JSON file in the user's
//! configuration directory. Load failures fall back to defaults with a logged
//! warning; a broken settings file never prevents a session from starting.
//!
//! [`SessionConfig`] is the slice of the settings the authority cares about
//! (difficulty and time control). It is sent on reset and on difficulty
//! change and lives only as long as the session that owns it.

use crate::core::error::{SyncError, SyncResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

/// AI strength requested from the authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(SyncError::InvalidDifficulty {
                value: s.to_string(),
            }),
        }
    }
}

/// Per-side clock budget for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeControl {
    Unlimited,
    Seconds(u32),
}

impl TimeControl {
    /// Wire encoding: unlimited travels as `0`
    pub fn as_wire_seconds(self) -> u32 {
        match self {
            TimeControl::Unlimited => 0,
            TimeControl::Seconds(secs) => secs,
        }
    }

    pub fn from_wire_seconds(secs: u32) -> Self {
        if secs == 0 {
            TimeControl::Unlimited
        } else {
            TimeControl::Seconds(secs)
        }
    }

    pub fn is_unlimited(self) -> bool {
        matches!(self, TimeControl::Unlimited)
    }
}

impl From<Option<u32>> for TimeControl {
    fn from(value: Option<u32>) -> Self {
        value.map_or(TimeControl::Unlimited, TimeControl::from_wire_seconds)
    }
}

/// Configuration sent to the authority on reset and difficulty change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub time_control: TimeControl,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            time_control: TimeControl::Seconds(600),
        }
    }
}

/// Persistent user settings for the client
///
/// # Fields
///
/// - `server_url`: base URL of the authority
/// - `difficulty` / `time_limit_secs`: initial [`SessionConfig`] (`None` = unlimited)
/// - `clock_poll_interval_ms`: period of the clock ticker
/// - `replay_interval_ms`: period of replay auto-play
/// - `request_timeout_ms`: per-request HTTP timeout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub server_url: String,
    pub difficulty: Difficulty,
    pub time_limit_secs: Option<u32>,
    pub clock_poll_interval_ms: u64,
    pub replay_interval_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            difficulty: Difficulty::Medium,
            time_limit_secs: Some(600),
            clock_poll_interval_ms: 1000,
            replay_interval_ms: 1000,
            request_timeout_ms: 10_000,
        }
    }
}

impl ClientSettings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            difficulty: self.difficulty,
            time_control: self.time_limit_secs.into(),
        }
    }

    pub fn clock_poll_interval(&self) -> Duration {
        Duration::from_millis(self.clock_poll_interval_ms.max(1))
    }

    pub fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Read settings from an explicit path
    pub fn load_from(path: &Path) -> SyncResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Write settings as pretty JSON, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> SyncResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("[SETTINGS] Saved settings to {:?}", path);
        Ok(())
    }

    /// Load settings from the user's config directory, falling back to defaults
    pub fn load() -> Self {
        let settings_path = settings_path();

        if !settings_path.exists() {
            info!(
                "[SETTINGS] No settings file found at {:?}. Using defaults.",
                settings_path
            );
            return Self::default();
        }

        match Self::load_from(&settings_path) {
            Ok(settings) => {
                info!("[SETTINGS] Loaded settings from {:?}", settings_path);
                settings
            }
            Err(e) => {
                warn!(
                    "[SETTINGS] Failed to load settings file at {:?}: {}. Using defaults.",
                    settings_path, e
                );
                Self::default()
            }
        }
    }

    pub fn save(&self) -> SyncResult<()> {
        self.save_to(&settings_path())
    }
}

/// Resolve the settings file path
///
/// Returns `settings.json` in the platform config directory, or the current
/// directory when no config directory can be determined.
pub fn settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "XFChessSync") {
        proj_dirs.config_dir().join(SETTINGS_FILENAME)
    } else {
        PathBuf::from(SETTINGS_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parses_case_insensitively() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" Medium ".parse::<Difficulty>().unwrap(), Difficulty::Medium);
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let err = "grandmaster".parse::<Difficulty>().unwrap_err();
        assert!(matches!(err, SyncError::InvalidDifficulty { .. }));
    }

    #[test]
    fn test_unlimited_time_control_travels_as_zero() {
        assert_eq!(TimeControl::Unlimited.as_wire_seconds(), 0);
        assert_eq!(TimeControl::Seconds(300).as_wire_seconds(), 300);
        assert_eq!(TimeControl::from_wire_seconds(0), TimeControl::Unlimited);
        assert_eq!(TimeControl::from(None), TimeControl::Unlimited);
        assert_eq!(TimeControl::from(Some(60)), TimeControl::Seconds(60));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.server_url, "http://127.0.0.1:5000");
        assert_eq!(settings.session_config(), SessionConfig::default());
        assert_eq!(settings.clock_poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_settings_file_fills_defaults() {
        let settings: ClientSettings =
            serde_json::from_str(r#"{"difficulty":"hard","time_limit_secs":null}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.session_config().time_control, TimeControl::Unlimited);
        assert_eq!(settings.replay_interval_ms, 1000);
    }

    #[test]
    fn test_settings_save_and_load() {
        let dir = std::env::temp_dir().join(format!("xfchess-sync-settings-{}", std::process::id()));
        let path = dir.join(SETTINGS_FILENAME);

        let settings = ClientSettings {
            server_url: "http://example.test:8080".to_string(),
            difficulty: Difficulty::Easy,
            ..ClientSettings::default()
        };
        settings.save_to(&path).unwrap();

        let loaded = ClientSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("xfchess-sync-definitely-missing/settings.json");
        assert!(matches!(
            ClientSettings::load_from(&path),
            Err(SyncError::SettingsIo(_))
        ));
    }
}
