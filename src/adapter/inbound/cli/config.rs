//! Handler for the `config` command group.

use std::path::Path;
use std::process::ExitCode;

use serde_json::json;

use crate::adapter::inbound::cli::command::ConfigCommand;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::{Config, HISTORY_API_TOKEN_ENV};

/// Execute a `config` subcommand against `path`.
pub fn execute(command: ConfigCommand, path: &Path) -> Result<ExitCode> {
    match command {
        ConfigCommand::Validate => execute_validate(path),
        ConfigCommand::Show => execute_show(path),
    }
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<ExitCode> {
    Config::load(path)?;

    if output::is_json() {
        output::json_output(&json!({
            "command": "config.validate",
            "path": path.display().to_string(),
            "valid": true,
        }));
    } else {
        output::success(&format!("{} is valid", path.display()));
    }
    Ok(ExitCode::SUCCESS)
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<ExitCode> {
    let config = Config::load(path)?;
    let token_loaded = config.cutover.api.token.is_some();

    if output::is_json() {
        output::json_output(&json!({
            "command": "config.show",
            "path": path.display().to_string(),
            "database": config.database,
            "logging": { "level": config.logging.level, "format": config.logging.format },
            "location": {
                "cache_enabled": config.location.cache_enabled,
                "store_prefix": config.location.store_prefix,
                "dc_prefix": config.location.dc_prefix,
                "known_locations": config.location.known.len(),
            },
            "validation": {
                "strict_mode": config.validation.strict_mode,
                "allow_unknown_locations": config.validation.allow_unknown_locations,
                "max_timestamp_future_hours": config.validation.max_timestamp_future_hours,
                "max_timestamp_past_days": config.validation.max_timestamp_past_days,
            },
            "cutover": {
                "enabled": config.cutover.enabled,
                "gap_days": config.cutover.gap_days,
                "batch_size": config.cutover.batch_size,
                "parallel_processing": config.cutover.parallel_processing,
                "worker_pool_size": config.cutover.worker_pool_size,
                "sub_batch_days": config.cutover.sub_batch_days,
                "skip_existing": config.cutover.skip_existing,
                "base_url": config.cutover.api.base_url,
                "token_loaded": token_loaded,
            },
            "feed": {
                "units": config.feed.units,
                "channel_capacity": config.feed.channel_capacity,
            },
        }));
        return Ok(ExitCode::SUCCESS);
    }

    output::section("Effective Configuration");
    output::field("Path", path.display());
    output::field("Database", &config.database);
    output::field("Log level", &config.logging.level);

    output::section("Locations");
    output::field("Cache", enabled(config.location.cache_enabled));
    output::field("Store prefix", &config.location.store_prefix);
    output::field("DC prefix", &config.location.dc_prefix);
    output::field("Known", config.location.known.len());

    output::section("Validation");
    output::field("Strict mode", enabled(config.validation.strict_mode));
    output::field(
        "Unknown locs",
        if config.validation.allow_unknown_locations {
            "allowed"
        } else {
            "rejected"
        },
    );
    output::field(
        "Future limit",
        format!("{}h", config.validation.max_timestamp_future_hours),
    );
    output::field(
        "Past limit",
        format!("{}d", config.validation.max_timestamp_past_days),
    );

    output::section("Cutover");
    output::field("On startup", enabled(config.cutover.enabled));
    output::field("Gap", format!("{} days", config.cutover.gap_days));
    output::field(
        "Mode",
        if config.cutover.parallel_processing {
            format!(
                "parallel ({} workers, {}-day sub-batches)",
                config.cutover.worker_pool_size, config.cutover.sub_batch_days
            )
        } else {
            "sequential".to_string()
        },
    );
    output::field("Batch size", config.cutover.batch_size);
    output::field("Skip existing", config.cutover.skip_existing);
    output::field("API", &config.cutover.api.base_url);
    if token_loaded {
        output::success(&format!("API token loaded from {HISTORY_API_TOKEN_ENV}"));
    } else {
        output::note(&format!("{HISTORY_API_TOKEN_ENV} not set"));
    }

    output::section("Feed");
    output::field("Units", config.feed.units.join(", "));
    output::field("Capacity", config.feed.channel_capacity);
    Ok(ExitCode::SUCCESS)
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}
