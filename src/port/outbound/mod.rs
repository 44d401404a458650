//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the pipeline depends on:
//! the feed subscription, the historical movement API, and the record store.

pub mod feed;
pub mod history;
pub mod store;
