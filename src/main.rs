use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use chime::cli::commands::Cli;
use chime::cli::handlers;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Send logs to `path` as plain text. Without a log file nothing is
/// installed, so the alternate screen never sees log output.
fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chime=info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);
    tracing_subscriber::registry().with(file_layer).try_init()?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    let config_path = cli.config.as_deref();
    match cli.command {
        // No subcommand → launch TUI
        None => chime::tui::run(handlers::load_config(config_path)?),
        Some(cmd) => handlers::dispatch(cmd, config_path),
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
