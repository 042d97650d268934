//! Logging setup
//!
//! Installs a `tracing_subscriber` formatter. `RUST_LOG` wins when set,
//! otherwise the level passed by the caller (usually from the CLI) applies.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber; a second call is a no-op
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("xfchess_sync={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
