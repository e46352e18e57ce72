//! Dreamscape service entry point
//!
//! Loads the model artifact and dream table once, then serves
//! `POST /generate_dream` and `GET /health` until Ctrl+C or SIGTERM.
//!
//! ```text
//! dreamscape --model dream_model.json --dataset processed_dreams.csv
//! dreamscape demo-model --output dream_model.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use dreamscape::api::create_app;
use dreamscape::config::{defaults, ServiceConfig};
use dreamscape::{AppContext, SequenceRegressor};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "dreamscape")]
#[command(about = "Physiology-driven dream prompt service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:5000")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to the model weight artifact
    #[arg(long)]
    model: Option<PathBuf>,

    /// Path to the processed dream table CSV
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Number of similar dreams used to build the prompt
    #[arg(short = 'k', long)]
    neighbors: Option<usize>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Write a randomly initialised (untrained) model artifact
    DemoModel {
        /// Output path for the artifact
        #[arg(short, long, default_value = defaults::MODEL_PATH)]
        output: PathBuf,
        /// RNG seed; the same seed always yields the same weights
        #[arg(long, default_value_t = defaults::DEMO_MODEL_SEED)]
        seed: u64,
        /// LSTM width
        #[arg(long, default_value_t = defaults::DEMO_MODEL_UNITS)]
        units: usize,
    },
}

impl CliArgs {
    /// CLI flags take precedence over env and file values.
    fn apply_to(&self, config: &mut ServiceConfig) {
        if let Some(addr) = &self.addr {
            config.server.addr.clone_from(addr);
        }
        if let Some(model) = &self.model {
            config.artifacts.model_path.clone_from(model);
        }
        if let Some(dataset) = &self.dataset {
            config.artifacts.dataset_path.clone_from(dataset);
        }
        if let Some(neighbors) = self.neighbors {
            config.lookup.neighbors = neighbors;
        }
    }
}

fn write_demo_model(output: &Path, seed: u64, units: usize) -> Result<()> {
    let model = SequenceRegressor::seeded(seed, units);
    model
        .save(output)
        .with_context(|| format!("Failed to write model artifact to {}", output.display()))?;
    info!(
        path = %output.display(),
        seed,
        params = model.artifact().num_params(),
        "Demo model written (untrained weights)"
    );
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    // Subcommand dispatch
    if let Some(SubCommand::DemoModel { output, seed, units }) = &args.command {
        return write_demo_model(output, *seed, *units);
    }

    let mut config = ServiceConfig::resolve().context("Failed to load configuration")?;
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    info!(
        addr = %config.server.addr,
        model = %config.artifacts.model_path.display(),
        dataset = %config.artifacts.dataset_path.display(),
        neighbors = config.lookup.neighbors,
        "Starting dreamscape"
    );

    let ctx = AppContext::load(&config);
    let app = create_app(ctx, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.addr))?;
    info!("HTTP server listening on {}", config.server.addr);

    // Graceful shutdown
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Received shutdown signal, draining connections...");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    info!("Graceful shutdown complete");
    Ok(())
}
