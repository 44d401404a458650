//! Command dispatch and config discovery.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::command::{Cli, Commands, DEFAULT_CONFIG_PATH};
use super::{classify, config, cutover, output, resolve, run, stats};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Run the parsed command. Errors are left to the caller to report.
///
/// # Errors
///
/// Returns configuration, storage, and I/O failures.
pub async fn execute(cli: Cli) -> Result<ExitCode> {
    output::configure(output::OutputConfig::new(cli.json, cli.quiet));

    if let Commands::Config(command) = cli.command {
        return config::execute(command, &config_path(cli.config.as_deref()));
    }

    let config = load_config(cli.config.as_deref())?;
    config.init_logging();

    match cli.command {
        Commands::Run(args) => run::execute(config, &args).await,
        Commands::Cutover(args) => cutover::execute(config, &args).await,
        Commands::Classify(args) => classify::execute(&config, &args),
        Commands::Resolve(args) => resolve::execute(&config, &args).await,
        Commands::Stats => stats::execute(&config).await,
        Commands::Config(_) => Ok(ExitCode::SUCCESS),
    }
}

fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), Path::to_path_buf)
}

/// Load the explicit config file, or `config.toml` when present, or defaults.
///
/// # Errors
///
/// Returns an error when an explicit file is missing or any file is invalid.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH),
        None => Config::parse_toml(""),
    }
}
