//! Movement direction resolution.
//!
//! The feed's `destination` names the originally planned recipient no matter
//! which way goods moved. Reverse (store to DC) movements therefore arrive
//! with origin and destination swapped, and the resolver un-swaps them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::application::location::LocationClassifier;
use crate::domain::{FlowDirection, LocationType, MovementType, RawMovement, ResolvedMovement};

/// Resolves raw movements into their true direction.
///
/// Stateless apart from the shared classifier; resolution never fails and
/// defaults to [`MovementType::Normal`] when nothing points the other way.
#[derive(Debug, Clone)]
pub struct MovementResolver {
    classifier: Arc<LocationClassifier>,
}

impl MovementResolver {
    #[must_use]
    pub const fn new(classifier: Arc<LocationClassifier>) -> Self {
        Self { classifier }
    }

    #[must_use]
    pub fn classifier(&self) -> &Arc<LocationClassifier> {
        &self.classifier
    }

    /// Decide NORMAL vs REVERSE for a raw movement.
    pub fn detect_type(&self, raw: &RawMovement) -> MovementType {
        let source = self.classifier.classify(&raw.source_location);
        let destination = self.classifier.classify(&raw.destination_location);

        if source == LocationType::Store && destination == LocationType::Dc {
            return MovementType::Reverse;
        }
        // Fallback signal when classification is inconclusive.
        if raw.servicing_nodes.iter().any(|node| *node == raw.destination) {
            return MovementType::Reverse;
        }
        MovementType::Normal
    }

    /// Resolve a movement, stamping it with the current time.
    pub fn resolve(&self, raw: RawMovement) -> ResolvedMovement {
        self.resolve_at(raw, Utc::now())
    }

    /// Resolve a movement with an explicit processing time.
    pub fn resolve_at(&self, raw: RawMovement, processed_at: DateTime<Utc>) -> ResolvedMovement {
        let movement_type = self.detect_type(&raw);

        let (origin, destination) = match movement_type {
            MovementType::Normal => (raw.source_location.clone(), raw.destination_location.clone()),
            MovementType::Reverse => {
                info!(
                    source = %raw.source_location,
                    destination = %raw.destination_location,
                    "Reverse movement detected, swapping origin and destination"
                );
                (raw.destination_location.clone(), raw.source_location.clone())
            }
        };
        let flow_direction = match movement_type {
            MovementType::Normal => FlowDirection::DcToStore,
            MovementType::Reverse => FlowDirection::StoreToDc,
        };

        ResolvedMovement::new(
            raw,
            movement_type,
            origin,
            destination,
            flow_direction,
            processed_at,
        )
    }
}
