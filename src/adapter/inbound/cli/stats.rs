//! Handler for the `stats` command.

use std::process::ExitCode;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_store;
use crate::infrastructure::config::settings::Config;

/// Execute `stats`.
pub async fn execute(config: &Config) -> Result<ExitCode> {
    let store = build_store(config)?;
    let stats = store.statistics().await?;

    if output::is_json() {
        output::json_output(&json!({
            "command": "stats",
            "store": store.store_name(),
            "statistics": stats,
        }));
        return Ok(ExitCode::SUCCESS);
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Record Store");
    output::field("Store", store.store_name());
    output::field("Database", &config.database);
    output::field("Total", stats.total_count);
    output::field("Historical", stats.historical_count);
    output::field("Cutover", stats.cutover_count);
    Ok(ExitCode::SUCCESS)
}
