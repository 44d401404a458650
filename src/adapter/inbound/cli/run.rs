//! Handler for the `run` command.

use std::path::Path;
use std::process::ExitCode;

use tokio::signal;
use tracing::{info, warn};

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::{cutover, input, output};
use crate::error::{IngestionError, Result};
use crate::infrastructure::bootstrap::Runtime;
use crate::infrastructure::config::settings::Config;

/// Execute the run command.
///
/// Without `--input` the process consumes until Ctrl-C. With an input, it
/// exits once every movement has been published and consumed.
pub async fn execute(config: Config, args: &RunArgs) -> Result<ExitCode> {
    let runtime = Runtime::build(config)?;
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Store", runtime.store.store_name());
    output::field("Units", runtime.config.feed.units.join(", "));

    runtime.feed.start();
    info!("waybill starting");

    if let Some(run) = runtime.cutover(&runtime.config.cutover).on_startup().await {
        cutover::print_run(&run);
    }

    let result = tokio::select! {
        result = ingest(&runtime, args.input.as_deref()) => result,
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(0)
        }
    };

    runtime.feed.drain().await;
    let published = result?;
    if args.input.is_some() {
        output::success(&format!("Published {published} movements"));
    }
    info!("waybill stopped");
    Ok(ExitCode::SUCCESS)
}

async fn ingest(runtime: &Runtime, path: Option<&Path>) -> Result<usize> {
    let Some(path) = path else {
        std::future::pending::<()>().await;
        return Ok(0);
    };

    let unit = runtime
        .config
        .feed
        .units
        .first()
        .ok_or_else(|| IngestionError::Registry("no feed units configured".into()))?;
    let publisher = runtime
        .feed
        .publisher(unit)
        .ok_or_else(|| IngestionError::Registry(format!("feed unit '{unit}' is closed")))?;

    let mut lines = input::open(Some(path)).await?;
    let mut line_number = 0usize;
    let mut published = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        match input::parse_line(&line) {
            None => {}
            Some(Ok(movement)) => {
                publisher.publish(movement).await?;
                published += 1;
            }
            Some(Err(e)) => warn!(line = line_number, error = %e, "Skipping unparsable movement"),
        }
    }
    Ok(published)
}
