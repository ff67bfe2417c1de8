//! Command-line interface for trend-report
//!
//! Provides `generate`, `preview`, and `inspect` subcommands over the
//! report engine. Collectors hand over a batch as JSON; the CLI builds the
//! canonical model and drives the renderers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::domain::CollectorBatch;

mod generate;
mod inspect;
mod preview;

/// Aggregate hot-topic feeds into merged daily reports
#[derive(Parser)]
#[command(name = "trend-report")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a report from a collector batch and write its artifacts
    Generate(generate::GenerateArgs),

    /// Print per-destination formatted titles for a collector batch
    Preview(preview::PreviewArgs),

    /// Decode a running summary file and print what it holds
    Inspect(inspect::InspectArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Wire verbose flag to the tracing log level.
    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Preview(args) => preview::run(args),
        Commands::Inspect(args) => inspect::run(args),
    }
}

/// Read one collector batch from its JSON hand-over file.
fn read_batch(path: &Path) -> Result<CollectorBatch> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed reading collector batch: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid collector batch JSON: {}", path.display()))
}
