use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Reference forecast generator for forecast verification.
#[derive(Parser)]
#[command(
    name = "refcast",
    version,
    about = "Climatology and persistence baselines for forecast verification"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Persist the value observed N steps before each forecast.
    Persistence(PersistenceArgs),
    /// Build an ensemble from the same instant in other years.
    Climatology(ClimatologyArgs),
}

/// Arguments for the `persistence` subcommand.
#[derive(clap::Args)]
pub struct PersistenceArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON array of observed series.
    #[arg(short, long)]
    pub source: PathBuf,

    /// JSON array of single-valued template series.
    #[arg(short, long)]
    pub templates: PathBuf,

    /// Path for the JSON output. Written to stdout when absent.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the order of persistence from config.
    #[arg(long)]
    pub order: Option<i64>,
}

/// Arguments for the `climatology` subcommand.
#[derive(clap::Args)]
pub struct ClimatologyArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON array of observed series.
    #[arg(short, long)]
    pub source: PathBuf,

    /// JSON array of ensemble template series.
    #[arg(short, long)]
    pub templates: PathBuf,

    /// Path for the JSON output. Written to stdout when absent.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
