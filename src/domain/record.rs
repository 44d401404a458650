//! Persisted movement records and store query types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::movement::{FlowDirection, MovementType, RawMovement, ResolvedMovement};
use super::validation::ValidationResult;

/// Where a persisted record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    Live,
    HistoricalApi,
}

impl DataSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::HistoricalApi => "HISTORICAL_API",
        }
    }

    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "LIVE" => Some(Self::Live),
            "HISTORICAL_API" => Some(Self::HistoricalApi),
            _ => None,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Valid,
    Invalid,
}

impl ValidationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
        }
    }

    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "VALID" => Some(Self::Valid),
            "INVALID" => Some(Self::Invalid),
            _ => None,
        }
    }
}

/// How a record entered the system.
///
/// Historical records are permanent: there is no way to build a record that
/// is historical and later clear the flag, because records are insert-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrigin {
    /// Consumed from the live feed.
    Live,
    /// Replayed from the historical API during cutover.
    Cutover,
}

/// A movement as written to the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedMovementRecord {
    /// Store-assigned id, `None` until saved.
    pub id: Option<i64>,
    pub destination: String,
    pub source_location: String,
    pub destination_location: String,
    pub servicing_nodes: Vec<String>,
    pub status: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub is_historical: bool,
    pub processed_during_cutover: bool,
    pub movement_type: Option<MovementType>,
    pub flow_direction: Option<FlowDirection>,
    pub actual_origin: Option<String>,
    pub actual_destination: Option<String>,
    pub validation_status: Option<ValidationStatus>,
    pub validation_error: Option<String>,
    pub processed_at: DateTime<Utc>,
    pub data_source: DataSource,
    pub correlation_id: Option<String>,
}

impl PersistedMovementRecord {
    /// Build a record from a resolved and validated movement.
    ///
    /// The correlation id is taken from the raw event, or generated.
    #[must_use]
    pub fn from_processed(
        resolved: ResolvedMovement,
        validation: &ValidationResult,
        origin: RecordOrigin,
    ) -> Self {
        let movement_type = resolved.movement_type();
        let flow_direction = resolved.flow_direction();
        let actual_origin = resolved.actual_origin().to_string();
        let actual_destination = resolved.actual_destination().to_string();
        let processed_at = resolved.processed_at();

        let mut record = Self::from_raw(resolved.into_raw(), origin, processed_at);
        record.movement_type = Some(movement_type);
        record.flow_direction = Some(flow_direction);
        record.actual_origin = Some(actual_origin);
        record.actual_destination = Some(actual_destination);
        record.validation_status = Some(if validation.is_valid() {
            ValidationStatus::Valid
        } else {
            ValidationStatus::Invalid
        });
        record.validation_error = validation.message().map(str::to_string);
        record
    }

    /// Build an unresolved record carrying only the raw fields.
    #[must_use]
    pub fn from_raw(raw: RawMovement, origin: RecordOrigin, processed_at: DateTime<Utc>) -> Self {
        let (is_historical, processed_during_cutover, data_source) = match origin {
            RecordOrigin::Live => (false, false, DataSource::Live),
            RecordOrigin::Cutover => (true, true, DataSource::HistoricalApi),
        };
        let correlation_id = raw
            .correlation_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Self {
            id: None,
            destination: raw.destination,
            source_location: raw.source_location,
            destination_location: raw.destination_location,
            servicing_nodes: raw.servicing_nodes,
            status: raw.status,
            timestamp: raw.timestamp,
            is_historical,
            processed_during_cutover,
            movement_type: None,
            flow_direction: None,
            actual_origin: None,
            actual_destination: None,
            validation_status: None,
            validation_error: None,
            processed_at,
            data_source,
            correlation_id: Some(correlation_id),
        }
    }

    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.movement_type == Some(MovementType::Reverse)
    }

    #[must_use]
    pub fn is_validation_passed(&self) -> bool {
        self.validation_status == Some(ValidationStatus::Valid)
    }

    /// Human-readable direction, e.g. `960 → 2352 (Reverse)`.
    #[must_use]
    pub fn direction_display(&self) -> String {
        let origin = self.actual_origin.as_deref().unwrap_or("?");
        let destination = self.actual_destination.as_deref().unwrap_or("?");
        let label = if self.is_reverse() { "Reverse" } else { "Normal" };
        format!("{origin} → {destination} ({label})")
    }
}

/// Filter over persisted records. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementFilter {
    pub source_location: Option<String>,
    pub destination_location: Option<String>,
    pub destination: Option<String>,
    pub servicing_node: Option<String>,
    pub status: Option<String>,
    pub movement_type: Option<MovementType>,
    pub historical_only: bool,
    pub cutover_only: bool,
    /// Inclusive lower timestamp bound.
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper timestamp bound.
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl MovementFilter {
    #[must_use]
    pub fn route(source_location: impl Into<String>, destination_location: impl Into<String>) -> Self {
        Self {
            source_location: Some(source_location.into()),
            destination_location: Some(destination_location.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn historical() -> Self {
        Self {
            historical_only: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn cutover() -> Self {
        Self {
            cutover_only: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            since: Some(start),
            until: Some(end),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn recent(since: DateTime<Utc>) -> Self {
        Self {
            since: Some(since),
            ..Self::default()
        }
    }

    /// In-memory evaluation, shared by stores that cannot push filters down.
    #[must_use]
    pub fn matches(&self, record: &PersistedMovementRecord) -> bool {
        fn eq(expected: Option<&String>, actual: &str) -> bool {
            expected.map_or(true, |e| e == actual)
        }

        if self.historical_only && !record.is_historical {
            return false;
        }
        if self.cutover_only && !record.processed_during_cutover {
            return false;
        }
        if !eq(self.source_location.as_ref(), &record.source_location)
            || !eq(self.destination_location.as_ref(), &record.destination_location)
            || !eq(self.destination.as_ref(), &record.destination)
        {
            return false;
        }
        if let Some(status) = &self.status {
            if record.status.as_ref() != Some(status) {
                return false;
            }
        }
        if let Some(node) = &self.servicing_node {
            if !record.servicing_nodes.contains(node) {
                return false;
            }
        }
        if let Some(movement_type) = self.movement_type {
            if record.movement_type != Some(movement_type) {
                return false;
            }
        }
        if self.since.is_some() || self.until.is_some() {
            let Some(ts) = record.timestamp else {
                return false;
            };
            if self.since.is_some_and(|since| ts < since) || self.until.is_some_and(|until| ts > until) {
                return false;
            }
        }
        true
    }
}

/// Record counts for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MovementStatistics {
    pub total_count: u64,
    pub historical_count: u64,
    pub cutover_count: u64,
}
