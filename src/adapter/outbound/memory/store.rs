//! In-memory movement store, used for `database = ":memory:"` and in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{MovementFilter, MovementStatistics, PersistedMovementRecord};
use crate::error::Result;
use crate::port::outbound::store::MovementStore;

#[derive(Debug, Default)]
struct Records {
    rows: Vec<PersistedMovementRecord>,
    next_id: i64,
}

/// Movement store backed by a vector under a read-write lock.
#[derive(Debug, Default)]
pub struct MemoryMovementStore {
    records: RwLock<Records>,
}

impl MemoryMovementStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Newest first; records without a timestamp sort last.
fn sort_newest_first(rows: &mut [PersistedMovementRecord]) {
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

#[async_trait]
impl MovementStore for MemoryMovementStore {
    async fn save_batch(&self, records: Vec<PersistedMovementRecord>) -> Result<usize> {
        let mut guard = self.records.write();
        let count = records.len();
        for mut record in records {
            guard.next_id += 1;
            record.id = Some(guard.next_id);
            guard.rows.push(record);
        }
        Ok(count)
    }

    async fn query(&self, filter: &MovementFilter) -> Result<Vec<PersistedMovementRecord>> {
        let mut rows: Vec<_> = self
            .records
            .read()
            .rows
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_newest_first(&mut rows);
        if let Some(limit) = filter.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn find_existing(
        &self,
        source_location: &str,
        destination_location: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<PersistedMovementRecord>> {
        Ok(self
            .records
            .read()
            .rows
            .iter()
            .find(|r| {
                r.source_location == source_location
                    && r.destination_location == destination_location
                    && r.timestamp == Some(timestamp)
            })
            .cloned())
    }

    async fn count_historical_cutover(&self) -> Result<u64> {
        let count = self
            .records
            .read()
            .rows
            .iter()
            .filter(|r| r.is_historical && r.processed_during_cutover)
            .count();
        Ok(count as u64)
    }

    async fn statistics(&self) -> Result<MovementStatistics> {
        let guard = self.records.read();
        let historical = guard.rows.iter().filter(|r| r.is_historical).count();
        let cutover = guard
            .rows
            .iter()
            .filter(|r| r.processed_during_cutover)
            .count();
        Ok(MovementStatistics {
            total_count: guard.rows.len() as u64,
            historical_count: historical as u64,
            cutover_count: cutover as u64,
        })
    }

    async fn delete_historical_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut guard = self.records.write();
        let before = guard.rows.len();
        guard
            .rows
            .retain(|r| !(r.is_historical && r.timestamp.is_some_and(|ts| ts < cutoff)));
        Ok(before - guard.rows.len())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
