//! Classification, resolution, and validation through the public API.

use std::sync::Arc;

use chrono::{Duration, Utc};
use waybill::application::location::LocationClassifier;
use waybill::application::movement::{MovementResolver, MovementValidator};
use waybill::domain::{FlowDirection, LocationType, MovementType, ValidationCode};
use waybill::infrastructure::config::location::LocationConfig;
use waybill::infrastructure::config::validation::ValidationConfig;
use waybill::testkit::domain::{movement, movement_at, normal_movement, processor, reverse_movement};

fn classifier() -> Arc<LocationClassifier> {
    Arc::new(LocationClassifier::default())
}

// -------------------------------------------------------------------------
// Classification
// -------------------------------------------------------------------------

#[test]
fn pattern_rules_classify_unseen_ids() {
    let classifier = classifier();

    assert_eq!(classifier.classify("2999"), LocationType::Store);
    assert_eq!(classifier.classify("977"), LocationType::Dc);
    assert_eq!(classifier.classify("1500"), LocationType::Dc);
    assert_eq!(classifier.classify("ABC"), LocationType::Unknown);
    assert_eq!(classifier.classify("  "), LocationType::Unknown);
}

#[test]
fn known_locations_take_priority_over_patterns() {
    let mut config = LocationConfig::default();
    config.known.insert("2999".into(), LocationType::Dc);
    let classifier = LocationClassifier::new(&config);

    assert_eq!(classifier.classify("2999"), LocationType::Dc);

    classifier.add_known_location("977", LocationType::Store);
    assert_eq!(classifier.classify("977"), LocationType::Store);
}

#[test]
fn classification_is_stable_across_cache_clears() {
    let classifier = classifier();
    let first = classifier.classify("2400");
    classifier.clear_cache();
    assert_eq!(classifier.classify("2400"), first);
    assert_eq!(classifier.cache_statistics().size, 1);
}

#[test]
fn only_store_to_store_is_an_invalid_route() {
    let classifier = classifier();

    assert!(classifier.is_valid_movement("960", "2352"));
    assert!(classifier.is_valid_movement("2352", "960"));
    assert!(classifier.is_valid_movement("XYZ", "2352"));
    assert!(!classifier.is_valid_movement("2352", "2353"));
}

// -------------------------------------------------------------------------
// Resolution
// -------------------------------------------------------------------------

#[test]
fn reverse_movement_swaps_endpoints() {
    let resolver = MovementResolver::new(classifier());

    let resolved = resolver.resolve(reverse_movement());

    assert_eq!(resolved.movement_type(), MovementType::Reverse);
    assert_eq!(resolved.flow_direction(), FlowDirection::StoreToDc);
    assert_eq!(resolved.actual_origin(), "960");
    assert_eq!(resolved.actual_destination(), "2352");
    assert_eq!(resolved.raw().source_location, "2352");
}

#[test]
fn normal_movement_keeps_endpoints() {
    let resolver = MovementResolver::new(classifier());

    let resolved = resolver.resolve(normal_movement());

    assert_eq!(resolved.movement_type(), MovementType::Normal);
    assert_eq!(resolved.flow_direction(), FlowDirection::DcToStore);
    assert_eq!(resolved.actual_origin(), "960");
    assert_eq!(resolved.actual_destination(), "2352");
}

#[test]
fn destination_in_servicing_nodes_marks_unclassified_movement_reverse() {
    let resolver = MovementResolver::new(classifier());

    let resolved = resolver.resolve(movement("X1", "Y1", "Y1", &["Y1", "960"]));

    assert_eq!(resolved.movement_type(), MovementType::Reverse);
    assert_eq!(resolved.actual_origin(), "Y1");
    assert_eq!(resolved.actual_destination(), "X1");
}

#[test]
fn resolving_is_deterministic() {
    let resolver = MovementResolver::new(classifier());
    let raw = reverse_movement();

    let first = resolver.resolve(raw.clone());
    let second = resolver.resolve(raw);

    assert_eq!(first.movement_type(), second.movement_type());
    assert_eq!(first.actual_origin(), second.actual_origin());
    assert_eq!(first.actual_destination(), second.actual_destination());
}

// -------------------------------------------------------------------------
// Validation
// -------------------------------------------------------------------------

#[test]
fn dc_to_store_with_servicing_nodes_is_valid() {
    let processed = processor().process(normal_movement());

    assert!(processed.validation.is_valid());
    assert_eq!(processed.validation.code(), ValidationCode::Valid);
    assert!(processed.valid_route);
}

#[test]
fn same_endpoints_are_rejected() {
    let processed = processor().process(movement("2352", "2352", "2352", &["960"]));

    assert!(!processed.validation.is_valid());
    assert_eq!(processed.validation.code(), ValidationCode::ValidationFailed);
    assert!(processed
        .validation
        .message()
        .is_some_and(|m| m.contains("Origin and destination cannot be the same: 2352")));
}

#[test]
fn every_failed_rule_is_reported_together() {
    let processed = processor().process(movement("960", "2352", "2352", &[]));
    let message = processed.validation.message().unwrap_or_default().to_string();

    assert!(message.contains("Servicing nodes cannot be empty"));

    let far_future = Utc::now() + Duration::days(3);
    let processed = processor().process(movement_at("960", "2352", "2352", &["960", "960"], far_future));
    let message = processed.validation.message().unwrap_or_default().to_string();

    assert!(message.contains("Timestamp is too far in the future"));
    assert!(message.contains("Duplicate servicing nodes found"));
    assert!(message.contains("; "));
}

#[test]
fn unknown_locations_fail_only_when_disallowed() {
    let classifier = classifier();
    let resolver = MovementResolver::new(classifier.clone());
    let resolved = resolver.resolve(movement("555", "556", "556", &["960"]));

    let lenient = MovementValidator::with_classifier(ValidationConfig::default(), classifier.clone());
    assert!(lenient.validate(&resolved).is_valid());

    let strict = MovementValidator::with_classifier(
        ValidationConfig {
            allow_unknown_locations: false,
            ..ValidationConfig::default()
        },
        classifier,
    );
    let result = strict.validate(&resolved);
    assert!(!result.is_valid());
    assert!(result.message().is_some_and(|m| m.contains("Unknown origin location: 555")));
}

#[test]
fn missing_movement_is_movement_null() {
    let result = MovementValidator::default().validate_optional(None);

    assert!(!result.is_valid());
    assert_eq!(result.code(), ValidationCode::MovementNull);
    assert_eq!(result.message(), Some("Movement cannot be null"));
}

#[test]
fn batch_summary_counts_valid_and_invalid() {
    let resolver = MovementResolver::new(classifier());
    let validator = MovementValidator::default();
    let movements = vec![
        resolver.resolve(normal_movement()),
        resolver.resolve(reverse_movement()),
        resolver.resolve(movement("2352", "2352", "2352", &["960"])),
    ];

    let results = validator.validate_batch(&movements);
    let summary = MovementValidator::summary(&results);

    assert_eq!(summary.total_validated, 3);
    assert_eq!(summary.valid_count, 2);
    assert_eq!(summary.invalid_count, 1);
    assert!((summary.validation_rate - 66.666).abs() < 0.01);
}
