//! Persistence port for movement records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{MovementFilter, MovementStatistics, PersistedMovementRecord};
use crate::error::Result;

/// Insert-only record store with filtered queries.
#[async_trait]
pub trait MovementStore: Send + Sync {
    /// Persist a batch atomically. Returns the number of records written.
    ///
    /// On error nothing from the batch is persisted.
    async fn save_batch(&self, records: Vec<PersistedMovementRecord>) -> Result<usize>;

    /// Records matching `filter`, newest timestamp first.
    async fn query(&self, filter: &MovementFilter) -> Result<Vec<PersistedMovementRecord>>;

    /// A record with the same route and timestamp, if one exists.
    async fn find_existing(
        &self,
        source_location: &str,
        destination_location: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<PersistedMovementRecord>>;

    /// Historical records written by a cutover.
    async fn count_historical_cutover(&self) -> Result<u64>;

    async fn statistics(&self) -> Result<MovementStatistics>;

    /// Delete historical records older than `cutoff`. Returns the count deleted.
    async fn delete_historical_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    /// Store name for logging.
    fn store_name(&self) -> &'static str;
}
