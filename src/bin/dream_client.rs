//! Smoke test for a running dreamscape service.
//!
//! Posts one sample physiology reading to `/generate_dream` and prints the
//! status and response body.
//!
//! Usage:
//!   cargo run --bin dream-client
//!   cargo run --bin dream-client -- --url http://10.0.0.5:5000

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use dreamscape::PhysiologySample;

#[derive(Parser)]
#[command(name = "dream-client")]
#[command(version)]
struct Args {
    /// Base URL of the service.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    url: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

/// A light REM reading.
const SAMPLE: PhysiologySample = PhysiologySample {
    eeg_theta_power: 91.9,
    eeg_gamma_power: 14.8,
    eeg_delta_power: 80.5,
    heart_rate_bpm: 80.8,
    hrv_ms: 41.0,
    rem_bursts: 1.0,
    chin_emg: 12.7,
    respiration_rate: 12.3,
    resp_irregularity: 0.041,
    skin_conductance: 2.35,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let endpoint = format!("{}/generate_dream", args.url.trim_end_matches('/'));

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    println!("POST {endpoint}");
    println!("{}", serde_json::to_string_pretty(&SAMPLE)?);

    let resp = http
        .post(&endpoint)
        .json(&SAMPLE)
        .send()
        .await
        .with_context(|| format!("Request to {endpoint} failed"))?;

    let status = resp.status();
    let body = resp.text().await.context("Failed to read response body")?;

    println!("\nStatus: {status}");
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{body}"),
    }
    Ok(())
}
