//! Episode runner CLI.
//!
//! Loads a scenario TOML, runs one deterministic episode and prints the
//! result record as JSON on stdout.

use av_common::config::ScenarioConfig;
use av_sim::run_scenario;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Deterministic AV simulation episode runner.
#[derive(Debug, Parser)]
#[command(name = "av_sim", version, about)]
struct Args {
    /// Scenario TOML file.
    scenario: PathBuf,

    /// Override the episode seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the episode duration [s].
    #[arg(long)]
    duration: Option<f64>,

    /// Write per-step telemetry to this JSONL file at shutdown.
    #[arg(long)]
    telemetry: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut cfg = ScenarioConfig::load_validated(&args.scenario)?;
    if let Some(seed) = args.seed {
        cfg.episode.seed = seed;
    }
    if let Some(duration) = args.duration {
        cfg.episode.duration_s = duration;
    }
    cfg.validate()?;

    info!(scenario = %args.scenario.display(), "loaded scenario");
    let result = run_scenario(&cfg, args.telemetry)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
