//! Resolve-then-validate pipeline shared by live ingestion and cutover.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use super::resolver::MovementResolver;
use super::validator::MovementValidator;
use crate::domain::{
    PersistedMovementRecord, RawMovement, RecordOrigin, ResolvedMovement, ValidationResult,
};
use crate::port::inbound::handler::MovementHandler;
use crate::port::outbound::store::MovementStore;

/// A resolved movement with its verdict.
#[derive(Debug, Clone)]
pub struct ProcessedMovement {
    pub resolved: ResolvedMovement,
    pub validation: ValidationResult,
    /// Advisory route check; false only for store-to-store.
    pub valid_route: bool,
}

impl ProcessedMovement {
    /// Convert into a persisted record tagged with how it entered the system.
    #[must_use]
    pub fn into_record(self, origin: RecordOrigin) -> PersistedMovementRecord {
        PersistedMovementRecord::from_processed(self.resolved, &self.validation, origin)
    }
}

/// Runs the resolver and validator over raw movements.
#[derive(Debug, Clone)]
pub struct MovementProcessor {
    resolver: MovementResolver,
    validator: MovementValidator,
}

impl MovementProcessor {
    #[must_use]
    pub const fn new(resolver: MovementResolver, validator: MovementValidator) -> Self {
        Self {
            resolver,
            validator,
        }
    }

    #[must_use]
    pub const fn resolver(&self) -> &MovementResolver {
        &self.resolver
    }

    #[must_use]
    pub const fn validator(&self) -> &MovementValidator {
        &self.validator
    }

    pub fn process(&self, raw: RawMovement) -> ProcessedMovement {
        self.process_at(raw, Utc::now())
    }

    /// Resolve and validate with `now` as both processing time and timestamp reference.
    pub fn process_at(&self, raw: RawMovement, now: DateTime<Utc>) -> ProcessedMovement {
        let resolved = self.resolver.resolve_at(raw, now);
        let validation = self.validator.validate_at(&resolved, now);

        if !validation.is_valid() {
            warn!(
                origin = resolved.actual_origin(),
                destination = resolved.actual_destination(),
                errors = validation.message().unwrap_or_default(),
                "Movement failed validation"
            );
        }

        // Advisory only; the movement is still persisted.
        let valid_route = self
            .resolver
            .classifier()
            .is_valid_movement(resolved.actual_origin(), resolved.actual_destination());

        ProcessedMovement {
            resolved,
            validation,
            valid_route,
        }
    }
}

/// Live feed consumer: processes each movement and saves it.
pub struct LiveIngestService {
    processor: Arc<MovementProcessor>,
    store: Arc<dyn MovementStore>,
}

impl LiveIngestService {
    #[must_use]
    pub fn new(processor: Arc<MovementProcessor>, store: Arc<dyn MovementStore>) -> Self {
        Self { processor, store }
    }
}

#[async_trait]
impl MovementHandler for LiveIngestService {
    async fn handle(&self, unit: &str, movement: RawMovement) {
        let processed = self.processor.process(movement);
        let record = processed.into_record(RecordOrigin::Live);
        let direction = record.direction_display();

        match self.store.save_batch(vec![record]).await {
            Ok(_) => debug!(unit, direction = %direction, "Stored live movement"),
            Err(e) => error!(
                unit,
                store = self.store.store_name(),
                error = %e,
                "Failed to store live movement"
            ),
        }
    }
}
