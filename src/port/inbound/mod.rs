//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`handler`]: Per-message entry point the feed drives

pub mod handler;
