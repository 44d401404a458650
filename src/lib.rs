//! Waybill - store/DC movement ingestion with historical cutover.
//!
//! Movements arrive on a live feed as raw `sourceLocation` /
//! `destinationLocation` pairs whose literal direction cannot be trusted.
//! Waybill classifies each location as a store or a distribution center,
//! resolves the true direction (swapping reverse store-to-DC flows),
//! validates the result, and persists it. On startup it can pause the live
//! feed, backfill a gap window from a historical API, and resume.
//!
//! # Architecture
//!
//! Hexagonal layout:
//!
//! - [`domain`] - Pure value types: movements, records, cutover runs
//! - [`port`] - Traits for the feed, historical source, and record store
//! - [`application`] - Classifier, resolver, validator, ingestion control, cutover
//! - [`adapter`] - Channel feed, HTTP history client, SQLite and memory stores, CLI
//! - [`infrastructure`] - Configuration, logging, and wiring
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use waybill::application::location::LocationClassifier;
//! use waybill::application::movement::MovementResolver;
//! use waybill::domain::{MovementType, RawMovement};
//!
//! let resolver = MovementResolver::new(Arc::new(LocationClassifier::default()));
//! let raw = RawMovement {
//!     destination: "960".into(),
//!     source_location: "2352".into(),
//!     destination_location: "960".into(),
//!     servicing_nodes: vec!["960".into(), "1001".into()],
//!     status: None,
//!     timestamp: None,
//!     correlation_id: None,
//! };
//! let resolved = resolver.resolve(raw);
//! assert_eq!(resolved.movement_type(), MovementType::Reverse);
//! assert_eq!(resolved.actual_origin(), "960");
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
