//! RegalDB interactive catalog shell.
//!
//! Reads configuration from environment variables (see [`config::Config`]),
//! optionally preloads a database file, then executes commands from stdin
//! line by line until `quit` or end of input. Command output goes to stdout;
//! logs go to the tracing subscriber.
//!
//! ## Quick start
//!
//! ```bash
//! # Interactive session
//! cargo run --bin regal
//!
//! # Scripted session with a preloaded database
//! REGAL_DATABASE=catalog.db \
//! REGAL_LOG_LEVEL=warn \
//!   printf 'recommend S1 1\nquit\n' | cargo run --bin regal
//! ```

use std::io::{self, BufRead, Write};

use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use regal_graph::{load_database, Graph};

mod commands;
mod config;

use commands::{handle_command, Outcome};
use config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .compact()
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "RegalDB starting");

    let mut graph = Graph::new();

    if let Some(path) = &config.database {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read database at {path}: {e}"))?;
        match load_database(&mut graph, &text) {
            Ok(report) => info!(
                path     = %path,
                nodes    = graph.node_count(),
                edges    = report.edges_added,
                rejected = report.rejected,
                "database preloaded"
            ),
            Err(e) => warn!(path = %path, error = %e, "database preload failed"),
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if handle_command(&mut graph, &line, &mut out)? == Outcome::Quit {
            break;
        }
        out.flush()?;
    }

    info!("RegalDB shutdown");
    Ok(())
}
