//! Builders for domain primitives used across tests.
//!
//! Concise factories for [`RawMovement`] and the processing pipeline so
//! tests focus on assertions rather than construction boilerplate.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::application::location::LocationClassifier;
use crate::application::movement::{MovementProcessor, MovementResolver, MovementValidator};
use crate::domain::RawMovement;

/// A planned movement stamped now.
///
/// Argument order follows the feed fields: `sourceLocation`,
/// `destinationLocation`, `destination`, `servicingNodes`.
pub fn movement(
    source_location: &str,
    destination_location: &str,
    destination: &str,
    servicing_nodes: &[&str],
) -> RawMovement {
    movement_at(
        source_location,
        destination_location,
        destination,
        servicing_nodes,
        Utc::now(),
    )
}

/// Like [`movement`] with an explicit timestamp.
pub fn movement_at(
    source_location: &str,
    destination_location: &str,
    destination: &str,
    servicing_nodes: &[&str],
    timestamp: DateTime<Utc>,
) -> RawMovement {
    RawMovement {
        destination: destination.to_string(),
        source_location: source_location.to_string(),
        destination_location: destination_location.to_string(),
        servicing_nodes: servicing_nodes.iter().map(|n| (*n).to_string()).collect(),
        status: Some("PLANNED".to_string()),
        timestamp: Some(timestamp),
        correlation_id: None,
    }
}

/// DC 960 to store 2352, the canonical normal movement.
pub fn normal_movement() -> RawMovement {
    movement("960", "2352", "2352", &["960", "1001", "1002"])
}

/// Store 2352 back to DC 960, the canonical reverse movement.
pub fn reverse_movement() -> RawMovement {
    movement("2352", "960", "960", &["960", "1001", "1002"])
}

/// `n` distinct normal movements on `date`, one minute apart from noon.
pub fn movements_on(date: NaiveDate, n: usize) -> Vec<RawMovement> {
    let noon = date
        .and_hms_opt(12, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or_else(Utc::now);
    (0..n)
        .map(|i| {
            let minutes = i64::try_from(i).unwrap_or(i64::MAX);
            movement_at(
                "960",
                "2352",
                "2352",
                &["960", "1001"],
                noon + chrono::Duration::minutes(minutes),
            )
        })
        .collect()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Processor over the default classifier and validator.
pub fn processor() -> MovementProcessor {
    let classifier = Arc::new(LocationClassifier::default());
    MovementProcessor::new(
        MovementResolver::new(classifier.clone()),
        MovementValidator::with_classifier(Default::default(), classifier),
    )
}
