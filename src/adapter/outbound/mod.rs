//! Outbound adapters (driven side).

pub mod feed;
pub mod history;
pub mod memory;
pub mod sqlite;
