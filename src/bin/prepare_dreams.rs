//! Dream report CSV to dream table converter.
//!
//! Cleans each report, scores its mood with keyword counts and tags its
//! emotions, settings and themes, then writes the table the service loads.
//!
//! Usage:
//!   cargo run --bin prepare-dreams -- --input data/dreambank.csv
//!   cargo run --bin prepare-dreams -- --input data/dreambank.csv --output processed_dreams.csv

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use dreamscape::config::defaults;
use dreamscape::prepare::prepare_file;

/// Build the processed dream table from raw dream reports.
#[derive(Parser)]
#[command(name = "prepare-dreams")]
#[command(version)]
struct Args {
    /// CSV export with a `dream_report` column.
    #[arg(long, short)]
    input: PathBuf,

    /// Output dream table path.
    #[arg(long, short, default_value = defaults::DATASET_PATH)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    info!(input = %args.input.display(), "Preparing dream table");

    let stats = prepare_file(&args.input, &args.output).with_context(|| {
        format!(
            "Failed to prepare {} -> {}",
            args.input.display(),
            args.output.display()
        )
    })?;

    println!(
        "Wrote {} dreams to {} ({} read, {} skipped as too short)",
        stats.kept,
        args.output.display(),
        stats.read,
        stats.skipped
    );
    Ok(())
}
