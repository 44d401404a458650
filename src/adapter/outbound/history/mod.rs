//! Historical movement API adapter.

mod client;

pub use client::HistoricalApiClient;
