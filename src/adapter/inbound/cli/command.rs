//! Command-line interface definitions.
//!
//! Defines the CLI structure for the drawbrain application using `clap`.
//! Subcommands feed outcomes to the pipeline and query what it stored.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::DrawDate;

/// Adaptive multi-strategy ticket generation and evaluation CLI
#[derive(Parser, Debug)]
#[command(name = "drawbrain")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file [default: config.toml if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the drawbrain CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record one outcome and run the pipeline on it
    Run(RunArgs),

    /// Run the pipeline on every new outcome in a JSON file
    Sync(SyncArgs),

    /// Show the latest generated batch
    Tickets(TicketsArgs),

    /// Show per-strategy weights and performance
    Performance,

    /// List the built-in strategies and which are enabled
    Strategies,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Date of the draw, YYYY-MM-DD
    #[arg(long)]
    pub draw_date: DrawDate,

    /// Drawn primary numbers, comma-separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub primary: Vec<u8>,

    /// Drawn secondary number
    #[arg(long)]
    pub secondary: u8,
}

/// Arguments for the `sync` subcommand.
#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// JSON file holding an array of outcomes
    #[arg(long)]
    pub source: PathBuf,
}

/// Arguments for the `tickets` subcommand.
#[derive(Parser, Debug)]
pub struct TicketsArgs {
    /// Target draw date [default: latest generated]
    #[arg(long)]
    pub target: Option<DrawDate>,

    /// Only tickets credited to this strategy
    #[arg(long)]
    pub strategy: Option<String>,

    /// Only tickets at or above this confidence
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Maximum number of tickets to show
    #[arg(long)]
    pub limit: Option<usize>,
}
