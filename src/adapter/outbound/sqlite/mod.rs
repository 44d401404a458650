//! SQLite persistence adapter.
//!
//! Provides the SQLite-backed movement store using Diesel ORM.

pub mod database;
pub mod store;
