//! Election Tactics - Entry Point
//!
//! Generates a map, lets nations expand over it and holds a series of
//! general elections in the districts of the largest nation.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use election_tactics::core::config::SimulationConfig;
use election_tactics::core::error::Result;
use election_tactics::history::simulate;

/// Territorial election simulation
#[derive(Parser, Debug)]
#[command(name = "election-tactics")]
#[command(about = "Simulate nation expansion and district elections on a generated map")]
struct Args {
    /// TOML configuration file; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overrides the configured map seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of general elections to hold
    #[arg(long)]
    elections: Option<u32>,

    /// Number of history ticks before the campaign starts
    #[arg(long)]
    ticks: Option<u32>,

    /// Write the full output as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("election_tactics=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.map.seed = seed;
    }
    if let Some(elections) = args.elections {
        config.campaign.elections = elections;
    }
    if let Some(ticks) = args.ticks {
        config.world.ticks = ticks;
    }

    tracing::info!(
        seed = config.map.seed,
        width = config.map.width,
        height = config.map.height,
        nations = config.world.nations,
        "starting simulation"
    );

    let output = simulate(&config)?;
    println!("{}", output.summary());

    if let Some(path) = &args.json {
        std::fs::write(path, output.to_json())?;
        println!("\nFull output written to {}", path.display());
    }

    Ok(())
}
