use anyhow::{Context, Result};
use clap::Parser;
use dashdeck::cli::{Cli, CliHandler};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    if cli.debug {
        tracing::info!("debug logging enabled");
    }

    let handler = CliHandler::new(cli.config.clone())?;
    handler.handle_command(cli.command).await
}

/// Interactive runs log to a file so output does not corrupt the screen;
/// headless commands log to stderr.
fn init_logging(cli: &Cli) -> Result<()> {
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    if !cli.is_interactive() && cli.log_file.is_none() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(log_level)
            .init();
        return Ok(());
    }

    let path = match &cli.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_max_level(log_level)
        .init();
    Ok(())
}

fn default_log_path() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join("dashdeck").join("dashdeck.log"))
        .context("cannot determine a data directory for the log file")
}
