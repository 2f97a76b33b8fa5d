//! Command-line interface for the hawk console.

use clap::{Parser, Subcommand};
use hawk_games::Rounds;
use hawk_tictactoe::{Difficulty, Mark};
use std::path::PathBuf;

/// Game Hawk - tic-tac-toe against the computer or a friend
#[derive(Parser, Debug)]
#[command(name = "hawk")]
#[command(about = "Play Game Hawk tic-tac-toe in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print each report as JSON instead of a board
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a series against the computer
    Solo {
        /// Mark to play (x or o)
        #[arg(long, default_value = "x")]
        symbol: Mark,

        /// Computer strength (easy, medium, hard); config default if omitted
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Rounds in the series (1, 3 or 6); config default if omitted
        #[arg(long)]
        rounds: Option<Rounds>,

        /// Seed for reproducible easy/medium play
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play a hot-seat game between two local players
    Friend,
}
