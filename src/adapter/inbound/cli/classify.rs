//! Handler for the `classify` command.

use std::process::ExitCode;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ClassifyArgs;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_classifier;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "Location")]
    id: String,
    #[tabled(rename = "Type")]
    location_type: String,
}

/// Execute `classify`.
pub fn execute(config: &Config, args: &ClassifyArgs) -> Result<ExitCode> {
    let classifier = build_classifier(config);
    let rows: Vec<LocationRow> = args
        .ids
        .iter()
        .map(|id| LocationRow {
            id: id.clone(),
            location_type: classifier.classify(id).to_string(),
        })
        .collect();

    if output::is_json() {
        let locations: Vec<_> = rows
            .iter()
            .map(|row| json!({ "id": row.id, "type": row.location_type }))
            .collect();
        output::json_output(&json!({
            "command": "classify",
            "locations": locations,
        }));
        return Ok(ExitCode::SUCCESS);
    }

    output::table(&Table::new(&rows).to_string());
    Ok(ExitCode::SUCCESS)
}
