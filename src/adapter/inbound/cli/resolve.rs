//! Handler for the `resolve` command: a dry run of the live pipeline.

use std::process::ExitCode;

use serde_json::json;

use crate::adapter::inbound::cli::command::InputArgs;
use crate::adapter::inbound::cli::{input, output};
use crate::application::movement::ProcessedMovement;
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_classifier, build_processor};
use crate::infrastructure::config::settings::Config;

/// Execute `resolve`. Exits non-zero when any line fails to parse.
pub async fn execute(config: &Config, args: &InputArgs) -> Result<ExitCode> {
    let classifier = build_classifier(config);
    let processor = build_processor(config, &classifier);
    let mut lines = input::open(args.input.as_deref()).await?;

    let mut line_number = 0usize;
    let mut processed_count = 0usize;
    let mut invalid = 0usize;
    let mut unparsable = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        match input::parse_line(&line) {
            None => {}
            Some(Ok(raw)) => {
                let processed = processor.process(raw);
                processed_count += 1;
                if !processed.validation.is_valid() {
                    invalid += 1;
                }
                print_result(line_number, &processed);
            }
            Some(Err(e)) => {
                unparsable += 1;
                output::error(&format!("line {line_number}: {e}"));
            }
        }
    }

    if !output::is_json() {
        output::section("Summary");
        output::field("Processed", processed_count);
        output::field("Invalid", invalid);
        output::field("Unparsable", unparsable);
    }

    Ok(if unparsable == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_result(line: usize, processed: &ProcessedMovement) {
    let resolved = &processed.resolved;
    let validation = &processed.validation;

    if output::is_json() {
        output::json_output(&json!({
            "line": line,
            "movement_type": resolved.movement_type(),
            "flow_direction": resolved.flow_direction(),
            "actual_origin": resolved.actual_origin(),
            "actual_destination": resolved.actual_destination(),
            "valid": validation.is_valid(),
            "code": validation.code(),
            "message": validation.message(),
            "valid_route": processed.valid_route,
        }));
        return;
    }

    let verdict = if validation.is_valid() {
        output::positive(validation.code())
    } else {
        output::negative(format!(
            "{}: {}",
            validation.code(),
            validation.message().unwrap_or_default()
        ))
    };
    output::field(
        &format!("line {line}"),
        format!(
            "{} → {} {} {} {verdict}",
            resolved.actual_origin(),
            resolved.actual_destination(),
            resolved.movement_type(),
            resolved.flow_direction(),
        ),
    );
    if !processed.valid_route {
        output::warning("store-to-store movement");
    }
}
