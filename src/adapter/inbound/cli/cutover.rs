//! Handler for the `cutover` command.

use std::process::ExitCode;

use serde_json::json;

use crate::adapter::inbound::cli::command::CutoverArgs;
use crate::adapter::inbound::cli::output;
use crate::domain::CutoverRun;
use crate::error::{ConfigError, Result};
use crate::infrastructure::bootstrap::Runtime;
use crate::infrastructure::config::settings::Config;

/// Execute `cutover`. Exits non-zero when the run failed.
pub async fn execute(config: Config, args: &CutoverArgs) -> Result<ExitCode> {
    let mut cutover = config.cutover.clone();
    if let Some(gap_days) = args.gap_days {
        cutover.gap_days = gap_days;
    }
    if args.sequential {
        cutover.parallel_processing = false;
    }
    if cutover.api.base_url.trim().is_empty() {
        return Err(ConfigError::MissingField { field: "base_url" }.into());
    }
    url::Url::parse(&cutover.api.base_url)?;

    let runtime = Runtime::build(config)?;
    runtime.feed.start();
    let run = runtime.cutover(&cutover).execute().await;
    runtime.feed.shutdown().await;

    print_run(&run);
    Ok(if run.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Print a finished run.
pub fn print_run(run: &CutoverRun) {
    if output::is_json() {
        output::json_output(&json!({ "command": "cutover", "run": run }));
        return;
    }

    output::section("Cutover");
    output::field(
        "Window",
        format!("{} .. {}", run.window.start_date, run.window.end_date),
    );
    output::field("Phase", run.phase);
    output::field("Fetched", run.historical.records_fetched);
    output::field("Stored", run.total_records_processed());
    output::field("Duplicates", run.historical.duplicates_skipped);
    output::field("Failed batches", run.historical.failed_batches);
    output::field(
        "Validated",
        format!(
            "{} ({} invalid)",
            run.validation.total_records_validated, run.validation.invalid_records
        ),
    );
    output::field("Duration", format!("{} ms", run.duration_ms()));

    if !run.failed_dates().is_empty() {
        let dates: Vec<String> = run.failed_dates().iter().map(ToString::to_string).collect();
        output::field("Failed dates", dates.join(", "));
    }
    for message in &run.validation.validation_errors {
        output::note(message);
    }
    if !run.resumed {
        output::warning("feed was not resumed after the cutover");
    }

    if run.success {
        output::success("Cutover completed");
    } else {
        output::error(run.error_message.as_deref().unwrap_or("Cutover failed"));
    }
}
