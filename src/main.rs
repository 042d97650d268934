use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use xfchess_sync::core::{logging, ClientSettings, Difficulty};
use xfchess_sync::game::session::{SessionController, Timing};
use xfchess_sync::networking::{HttpSessionClient, SessionDriver};
use xfchess_sync::ui::commands::{baseline_after, HELP};
use xfchess_sync::ui::{parse_command, Command, TerminalRenderer};

/// Play chess against a remote authority from the terminal
#[derive(Parser, Debug)]
#[command(name = "xfchess-sync", author, version, about)]
struct Args {
    /// Base URL of the game server
    #[arg(long)]
    server: Option<String>,

    /// AI difficulty: easy, medium or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Seconds per side; 0 for no time limit
    #[arg(long = "time-limit")]
    time_limit: Option<u32>,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,

    /// Ignore and do not write the settings file
    #[arg(long = "no-settings")]
    no_settings: bool,
}

impl Args {
    fn apply(&self, settings: &mut ClientSettings) {
        if let Some(server) = &self.server {
            settings.server_url = server.clone();
        }
        if let Some(difficulty) = self.difficulty {
            settings.difficulty = difficulty;
        }
        if let Some(secs) = self.time_limit {
            settings.time_limit_secs = (secs > 0).then_some(secs);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    let mut settings = if args.no_settings {
        ClientSettings::default()
    } else {
        ClientSettings::load()
    };
    args.apply(&mut settings);

    let remote = HttpSessionClient::from_settings(&settings)
        .with_context(|| format!("cannot use server '{}'", settings.server_url))?;
    let controller =
        SessionController::with_standard_rules(settings.session_config(), Timing::from(&settings));
    let (driver, handle) =
        SessionDriver::new(controller, Arc::new(remote), TerminalRenderer::stdout());
    let driver_task = tokio::spawn(driver.run());

    println!("{HELP}\n");

    let mut config = settings.session_config();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_command(&line, config) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(Command::Intent(intent))) => {
                config = baseline_after(&intent, config);
                if handle.send(intent).is_err() {
                    warn!("[SESSION] Driver stopped; exiting");
                    break;
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    handle.dispose();
    let controller = driver_task.await.context("session driver task failed")?;

    if !args.no_settings {
        let last = controller.config();
        settings.difficulty = last.difficulty;
        settings.time_limit_secs = match last.time_control.as_wire_seconds() {
            0 => None,
            secs => Some(secs),
        };
        if let Err(e) = settings.save() {
            warn!("[SETTINGS] Could not save settings: {}", e);
        }
    }

    info!("[SESSION] Goodbye");
    Ok(())
}
