//! Movement domain: pure value types with no I/O.

pub mod cutover;
pub mod feed;
pub mod location;
pub mod movement;
pub mod record;
pub mod validation;

pub use cutover::{CutoverPhase, CutoverRun, CutoverValidationSummary, GapWindow, HistoricalDataResult};
pub use feed::{FeedStatus, FeedUnitInfo};
pub use location::{CacheStatistics, LocationType};
pub use movement::{FlowDirection, MovementType, RawMovement, ResolvedMovement};
pub use record::{
    DataSource, MovementFilter, MovementStatistics, PersistedMovementRecord, RecordOrigin,
    ValidationStatus,
};
pub use validation::{ValidationCode, ValidationResult, ValidationSummary};
