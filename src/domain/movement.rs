//! Movement domain types.
//!
//! - [`RawMovement`] - An inbound movement event as reported by the feed or
//!   the historical API
//! - [`MovementType`] / [`FlowDirection`] - Resolved direction tags
//! - [`ResolvedMovement`] - A raw movement with its true origin and destination

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Movement event as received, never mutated after creation.
///
/// The serialized form follows the feed's camelCase message schema. The
/// `destination` field names the planned recipient regardless of the
/// direction goods actually moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMovement {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub source_location: String,
    #[serde(default)]
    pub destination_location: String,
    /// Ordered servicing DCs. Duplicates are kept as received.
    #[serde(default)]
    pub servicing_nodes: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Message or correlation id assigned upstream, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

/// Direction of a resolved movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// DC to store, matching the feed's literal field semantics.
    Normal,
    /// Store to DC; origin and destination must be swapped.
    Reverse,
}

impl MovementType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Reverse => "REVERSE",
        }
    }

    /// Parse the persisted label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "NORMAL" => Some(Self::Normal),
            "REVERSE" => Some(Self::Reverse),
            _ => None,
        }
    }

    /// The flow direction a movement of this type must carry.
    #[must_use]
    pub const fn expected_flow(self) -> FlowDirection {
        match self {
            Self::Normal => FlowDirection::DcToStore,
            Self::Reverse => FlowDirection::StoreToDc,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowDirection {
    DcToStore,
    StoreToDc,
}

impl FlowDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DcToStore => "DC_TO_STORE",
            Self::StoreToDc => "STORE_TO_DC",
        }
    }

    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "DC_TO_STORE" => Some(Self::DcToStore),
            "STORE_TO_DC" => Some(Self::StoreToDc),
            _ => None,
        }
    }
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw movement tagged with its resolved direction.
///
/// Exactly one is produced per [`RawMovement`]. Fields are private; all
/// construction goes through [`ResolvedMovement::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMovement {
    raw: RawMovement,
    movement_type: MovementType,
    actual_origin: String,
    actual_destination: String,
    flow_direction: FlowDirection,
    processed_at: DateTime<Utc>,
}

impl ResolvedMovement {
    pub fn new(
        raw: RawMovement,
        movement_type: MovementType,
        actual_origin: impl Into<String>,
        actual_destination: impl Into<String>,
        flow_direction: FlowDirection,
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            raw,
            movement_type,
            actual_origin: actual_origin.into(),
            actual_destination: actual_destination.into(),
            flow_direction,
            processed_at,
        }
    }

    #[must_use]
    pub const fn raw(&self) -> &RawMovement {
        &self.raw
    }

    #[must_use]
    pub const fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    #[must_use]
    pub fn actual_origin(&self) -> &str {
        &self.actual_origin
    }

    #[must_use]
    pub fn actual_destination(&self) -> &str {
        &self.actual_destination
    }

    #[must_use]
    pub const fn flow_direction(&self) -> FlowDirection {
        self.flow_direction
    }

    #[must_use]
    pub const fn processed_at(&self) -> DateTime<Utc> {
        self.processed_at
    }

    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.movement_type == MovementType::Reverse
    }

    /// Consume the movement, returning the raw event it was resolved from.
    #[must_use]
    pub fn into_raw(self) -> RawMovement {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_movement_reads_feed_schema() {
        let json = r#"{
            "destination": "960",
            "servicingNodes": ["960", "1001"],
            "sourceLocation": "2352",
            "destinationLocation": "960",
            "status": "PLANNED",
            "timestamp": "2024-05-01T10:00:00Z"
        }"#;

        let raw: RawMovement = serde_json::from_str(json).unwrap();
        assert_eq!(raw.source_location, "2352");
        assert_eq!(raw.servicing_nodes, vec!["960", "1001"]);
        assert_eq!(raw.status.as_deref(), Some("PLANNED"));
        assert!(raw.timestamp.is_some());
        assert!(raw.correlation_id.is_none());
    }

    #[test]
    fn raw_movement_tolerates_missing_fields() {
        let raw: RawMovement = serde_json::from_str(r#"{"destination": "960"}"#).unwrap();
        assert!(raw.source_location.is_empty());
        assert!(raw.servicing_nodes.is_empty());
        assert!(raw.timestamp.is_none());
    }

    #[test]
    fn movement_type_maps_to_expected_flow() {
        assert_eq!(MovementType::Normal.expected_flow(), FlowDirection::DcToStore);
        assert_eq!(MovementType::Reverse.expected_flow(), FlowDirection::StoreToDc);
    }

    #[test]
    fn labels_round_trip_through_parse() {
        assert_eq!(MovementType::parse("REVERSE"), Some(MovementType::Reverse));
        assert_eq!(FlowDirection::parse("DC_TO_STORE"), Some(FlowDirection::DcToStore));
        assert_eq!(MovementType::parse("reverse"), None);
    }
}
