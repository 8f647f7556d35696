use std::io::{self, BufRead, Write};

use anyhow::Context;
use serde_json::json;
use shared::Command;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use expense_tracker_backend::{JsonConnection, Tracker, TrackerConfig};

fn main() -> anyhow::Result<()> {
    let config = TrackerConfig::load()?;

    // Initialize logging; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    info!("Using data directory {}", config.data_directory.display());
    let connection = JsonConnection::new(&config.data_directory)?;
    let mut tracker = Tracker::open(connection)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Command>(&line) {
            Ok(command) => match tracker.execute(command) {
                Ok(outcome) => json!({ "ok": true, "outcome": outcome }),
                Err(e) => json!({ "ok": false, "error": e.to_payload() }),
            },
            Err(e) => {
                warn!("Rejected malformed command: {}", e);
                json!({
                    "ok": false,
                    "error": { "kind": "invalid_command", "message": e.to_string() }
                })
            }
        };

        writeln!(stdout, "{}", response).context("Failed to write response")?;
        stdout.flush().context("Failed to flush stdout")?;
    }

    info!("Input closed, shutting down");
    Ok(())
}
