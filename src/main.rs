use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Declare modules
mod cli;
mod clock;
mod config;
mod driver;
mod error;
mod extract;
mod models;
mod normalize;
mod writer;

use crate::{cli::Cli, clock::SystemClock, config::Settings};

fn main() -> Result<()> {
    // Load .env file first. Ignore errors (e.g., file not found)
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration, then let the command line override it
    let settings = Settings::new()?.with_overrides(cli.directory, cli.debug);

    // Initialize logging; RUST_LOG wins over the debug toggle
    let default_filter = if settings.debug {
        "yad2_summary=debug"
    } else {
        "yad2_summary=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer())
        .init();

    tracing::debug!(?settings, "Configuration loaded");

    let summary = driver::process_directory(Path::new(&settings.directory), settings.debug, &SystemClock)?;
    tracing::info!(
        "Wrote {} rows from {} page(s) ({} failed)",
        summary.rows_written,
        summary.files_processed,
        summary.files_failed
    );

    Ok(())
}
