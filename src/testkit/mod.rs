//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] — Movement builders and a default processing pipeline.
//! - [`config`] — Canonical test configurations.
//! - [`feed`] — `ScriptedFeed`, an in-memory `FeedControl` recording calls.
//! - [`history`] — `ScriptedHistory`, per-date scripted fetch results.
//! - [`store`] — `FlakyStore`, a store failing selected batches.

pub mod config;
pub mod domain;
pub mod feed;
pub mod history;
pub mod store;
