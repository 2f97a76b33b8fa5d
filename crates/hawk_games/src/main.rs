//! Game Hawk - console front end
//!
//! Drives the session engine from the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use hawk_games::console::{self, SoloOptions};
use hawk_games::{GameEngine, HawkConfig};
use tokio::io::BufReader;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => HawkConfig::from_file(path)?,
        None => {
            debug!("No config file given, using defaults");
            HawkConfig::default()
        }
    };

    let engine = match &cli.command {
        Command::Solo { seed: Some(seed), .. } => GameEngine::with_seed(&config, *seed),
        _ => GameEngine::new(&config),
    };

    let sweeper = tokio::spawn(sweep_loop(engine.clone(), config.sweep_interval()));

    let input = BufReader::new(tokio::io::stdin());
    let mut out = tokio::io::stdout();

    let result = match cli.command {
        Command::Solo {
            symbol,
            difficulty,
            rounds,
            ..
        } => {
            let options = SoloOptions::new(
                symbol,
                difficulty.unwrap_or(*config.default_difficulty()),
                rounds.unwrap_or(*config.default_rounds()),
            );
            console::play_solo(&engine, options, input, &mut out, cli.json).await
        }
        Command::Friend => console::play_friend(&engine, input, &mut out, cli.json).await,
    };

    sweeper.abort();
    info!("Goodbye");
    result
}

/// Periodically drops sessions idle past their lifetime.
async fn sweep_loop(engine: GameEngine, every: std::time::Duration) {
    let mut interval = tokio::time::interval(every);
    // The first tick completes immediately.
    interval.tick().await;
    loop {
        interval.tick().await;
        let removed = engine.sweep_expired();
        debug!(removed, "Sweep finished");
    }
}
