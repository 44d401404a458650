//! Store wrapper that fails selected save batches.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::adapter::outbound::memory::MemoryMovementStore;
use crate::domain::{MovementFilter, MovementStatistics, PersistedMovementRecord};
use crate::error::{Error, Result};
use crate::port::outbound::store::MovementStore;

/// Delegates to a [`MemoryMovementStore`], failing the listed `save_batch`
/// calls (0-based, in call order) without persisting them.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryMovementStore,
    failing_batches: HashSet<usize>,
    batch_calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new(failing_batches: impl IntoIterator<Item = usize>) -> Self {
        Self {
            inner: MemoryMovementStore::new(),
            failing_batches: failing_batches.into_iter().collect(),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &MemoryMovementStore {
        &self.inner
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MovementStore for FlakyStore {
    async fn save_batch(&self, records: Vec<PersistedMovementRecord>) -> Result<usize> {
        let call = self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_batches.contains(&call) {
            return Err(Error::Database(format!("scripted failure for batch {call}")));
        }
        self.inner.save_batch(records).await
    }

    async fn query(&self, filter: &MovementFilter) -> Result<Vec<PersistedMovementRecord>> {
        self.inner.query(filter).await
    }

    async fn find_existing(
        &self,
        source_location: &str,
        destination_location: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<PersistedMovementRecord>> {
        self.inner
            .find_existing(source_location, destination_location, timestamp)
            .await
    }

    async fn count_historical_cutover(&self) -> Result<u64> {
        self.inner.count_historical_cutover().await
    }

    async fn statistics(&self) -> Result<MovementStatistics> {
        self.inner.statistics().await
    }

    async fn delete_historical_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.inner.delete_historical_before(cutoff).await
    }

    fn store_name(&self) -> &'static str {
        "flaky"
    }
}
