//! Historical gap backfill run once at startup.

mod fetch;
mod orchestrator;

pub use fetch::{FetchMode, FetchedWindow, WindowFetcher};
pub use orchestrator::CutoverOrchestrator;
