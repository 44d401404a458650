//! Movement resolution, validation, and live ingestion.

mod processor;
mod resolver;
mod validator;

pub use processor::{LiveIngestService, MovementProcessor, ProcessedMovement};
pub use resolver::MovementResolver;
pub use validator::MovementValidator;
