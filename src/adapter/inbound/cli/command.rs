//! Command-line interface definitions.
//!
//! Defines the CLI structure for waybill using `clap`: running the live
//! pipeline, triggering a cutover, and inspecting classification, resolution,
//! stored records, and configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Configuration file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Store/DC movement ingestion and historical cutover
#[derive(Parser, Debug)]
#[command(name = "waybill")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file [default: config.toml]
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

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the feed, run the startup cutover, and ingest movements
    Run(RunArgs),

    /// Run one cutover now, regardless of `cutover.enabled`
    Cutover(CutoverArgs),

    /// Classify location ids
    Classify(ClassifyArgs),

    /// Resolve and validate NDJSON movements without storing them
    Resolve(InputArgs),

    /// Show record store statistics
    Stats,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `waybill config`.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate a configuration file for correctness.
    Validate,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// NDJSON movements to publish into the first feed unit ("-" for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

/// Arguments for the `cutover` subcommand.
#[derive(Parser, Debug, Default)]
pub struct CutoverArgs {
    /// Override the configured gap window in days
    #[arg(long)]
    pub gap_days: Option<u32>,

    /// Fetch one date at a time instead of in parallel sub-batches
    #[arg(long)]
    pub sequential: bool,
}

/// Arguments for the `classify` subcommand.
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// Location ids to classify
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// NDJSON input source.
#[derive(Parser, Debug, Default)]
pub struct InputArgs {
    /// NDJSON file ("-" or omitted for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}
