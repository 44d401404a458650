//! Business-rule validation of resolved movements.
//!
//! All checks run independently and every error is collected; the verdict is
//! returned as a [`ValidationResult`], never as an `Err`.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::application::location::LocationClassifier;
use crate::domain::location::is_location_format;
use crate::domain::{
    LocationType, MovementType, ResolvedMovement, ValidationCode, ValidationResult,
    ValidationSummary,
};
use crate::infrastructure::config::validation::ValidationConfig;

/// Validates resolved movements against configured tolerances.
#[derive(Debug, Clone)]
pub struct MovementValidator {
    config: ValidationConfig,
    /// Needed only to reject unknown locations.
    classifier: Option<Arc<LocationClassifier>>,
}

impl MovementValidator {
    #[must_use]
    pub const fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            classifier: None,
        }
    }

    /// Validator that can enforce `allow_unknown_locations = false`.
    #[must_use]
    pub const fn with_classifier(
        config: ValidationConfig,
        classifier: Arc<LocationClassifier>,
    ) -> Self {
        Self {
            config,
            classifier: Some(classifier),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate against the current time.
    pub fn validate(&self, movement: &ResolvedMovement) -> ValidationResult {
        self.validate_at(movement, Utc::now())
    }

    /// Validate a possibly missing movement.
    pub fn validate_optional(&self, movement: Option<&ResolvedMovement>) -> ValidationResult {
        match movement {
            Some(movement) => self.validate(movement),
            None => ValidationResult::failure(ValidationCode::MovementNull, "Movement cannot be null"),
        }
    }

    /// Validate with `now` as the reference for timestamp tolerances.
    pub fn validate_at(&self, movement: &ResolvedMovement, now: DateTime<Utc>) -> ValidationResult {
        let mut errors = Vec::new();

        Self::check_required_fields(movement, &mut errors);
        self.check_locations(movement, &mut errors);
        self.check_timestamp(movement, now, &mut errors);
        Self::check_flow_direction(movement, &mut errors);
        Self::check_servicing_nodes(movement, &mut errors);

        ValidationResult::from_errors(&errors)
    }

    /// Validate every movement; no early exit.
    pub fn validate_batch(&self, movements: &[ResolvedMovement]) -> Vec<ValidationResult> {
        let now = Utc::now();
        movements
            .iter()
            .map(|movement| self.validate_at(movement, now))
            .collect()
    }

    #[must_use]
    pub fn summary(results: &[ValidationResult]) -> ValidationSummary {
        ValidationSummary::from_results(results)
    }

    fn check_required_fields(movement: &ResolvedMovement, errors: &mut Vec<String>) {
        let raw = movement.raw();
        let required = [
            (raw.destination.as_str(), "Destination is required"),
            (raw.source_location.as_str(), "Source location is required"),
            (raw.destination_location.as_str(), "Destination location is required"),
            (movement.actual_origin(), "Actual origin is required"),
            (movement.actual_destination(), "Actual destination is required"),
        ];
        for (value, message) in required {
            if value.trim().is_empty() {
                errors.push(message.to_string());
            }
        }
    }

    fn check_locations(&self, movement: &ResolvedMovement, errors: &mut Vec<String>) {
        let origin = movement.actual_origin();
        let destination = movement.actual_destination();

        if !origin.is_empty() && origin == destination {
            errors.push(format!("Origin and destination cannot be the same: {origin}"));
        }
        if !is_location_format(origin) {
            errors.push(format!("Invalid origin location format: {origin}"));
        }
        if !is_location_format(destination) {
            errors.push(format!("Invalid destination location format: {destination}"));
        }

        if !self.config.allow_unknown_locations {
            if let Some(classifier) = &self.classifier {
                if !origin.trim().is_empty() && classifier.classify(origin) == LocationType::Unknown {
                    errors.push(format!("Unknown origin location: {origin}"));
                }
                if !destination.trim().is_empty()
                    && classifier.classify(destination) == LocationType::Unknown
                {
                    errors.push(format!("Unknown destination location: {destination}"));
                }
            }
        }

        if self.config.strict_mode {
            Self::check_location_consistency(movement, errors);
        }
    }

    /// Format-based heuristic, independent of the classifier: stores start with '2'.
    fn check_location_consistency(movement: &ResolvedMovement, errors: &mut Vec<String>) {
        let origin_is_store_shaped = movement.actual_origin().starts_with('2');
        let destination_is_store_shaped = movement.actual_destination().starts_with('2');

        match movement.movement_type() {
            MovementType::Normal if origin_is_store_shaped && destination_is_store_shaped => {
                errors.push(
                    "Normal movement should be DC to Store, but both look like stores".to_string(),
                );
            }
            MovementType::Reverse if !origin_is_store_shaped && destination_is_store_shaped => {
                errors.push(
                    "Reverse movement should be Store to DC, but origin doesn't look like store"
                        .to_string(),
                );
            }
            _ => {}
        }
    }

    fn check_timestamp(
        &self,
        movement: &ResolvedMovement,
        now: DateTime<Utc>,
        errors: &mut Vec<String>,
    ) {
        let Some(timestamp) = movement.raw().timestamp else {
            errors.push("Timestamp is required".to_string());
            return;
        };

        let latest = now + Duration::hours(i64::from(self.config.max_timestamp_future_hours));
        let earliest = now - Duration::days(i64::from(self.config.max_timestamp_past_days));
        let display = timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true);

        if timestamp > latest {
            errors.push(format!("Timestamp is too far in the future: {display}"));
        }
        if timestamp < earliest {
            errors.push(format!("Timestamp is too far in the past: {display}"));
        }
    }

    fn check_flow_direction(movement: &ResolvedMovement, errors: &mut Vec<String>) {
        let flow = movement.flow_direction();
        let movement_type = movement.movement_type();
        if flow == movement_type.expected_flow() {
            return;
        }
        let label = match movement_type {
            MovementType::Normal => "Normal",
            MovementType::Reverse => "Reverse",
        };
        errors.push(format!(
            "{label} movement should have {} flow direction, but found: {flow}",
            movement_type.expected_flow()
        ));
    }

    fn check_servicing_nodes(movement: &ResolvedMovement, errors: &mut Vec<String>) {
        let raw = movement.raw();
        let nodes = &raw.servicing_nodes;

        if nodes.is_empty() {
            errors.push("Servicing nodes cannot be empty".to_string());
            return;
        }

        let distinct: HashSet<&str> = nodes.iter().map(String::as_str).collect();
        if distinct.len() != nodes.len() {
            errors.push("Duplicate servicing nodes found".to_string());
        }

        // One format error is enough.
        if let Some(bad) = nodes.iter().find(|node| !is_location_format(node)) {
            errors.push(format!("Invalid servicing node format: {bad}"));
        }

        if movement.is_reverse() && !nodes.contains(&raw.destination) {
            errors.push("For reverse movements, destination should be in servicing nodes".to_string());
        }
    }
}

impl Default for MovementValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
