//! SQLite movement store implementation.
//!
//! Provides persistent storage for movement records using SQLite and Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{MovementRow, NewMovementRow};
use crate::adapter::outbound::sqlite::database::schema::movements;
use crate::domain::{
    DataSource, FlowDirection, MovementFilter, MovementStatistics, MovementType,
    PersistedMovementRecord, ValidationStatus,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::MovementStore;

/// Fixed-width UTC encoding; lexical order equals chronological order.
fn encode_time(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_time(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("invalid timestamp '{text}': {e}")))
}

fn decode_label<T>(label: Option<String>, parse: fn(&str) -> Option<T>, what: &str) -> Result<Option<T>> {
    label
        .map(|l| parse(&l).ok_or_else(|| Error::Parse(format!("unknown {what} '{l}'"))))
        .transpose()
}

/// SQLite-backed movement store.
///
/// Implements the [`MovementStore`] trait; every batch is written in one
/// transaction.
pub struct SqliteMovementStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteMovementStore {
    /// Create a new SQLite movement store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }

    fn to_row(record: &PersistedMovementRecord) -> Result<NewMovementRow> {
        Ok(NewMovementRow {
            destination: record.destination.clone(),
            source_location: record.source_location.clone(),
            destination_location: record.destination_location.clone(),
            servicing_nodes: serde_json::to_string(&record.servicing_nodes)?,
            status: record.status.clone(),
            timestamp: record.timestamp.map(encode_time),
            is_historical: record.is_historical,
            processed_during_cutover: record.processed_during_cutover,
            movement_type: record.movement_type.map(|t| t.as_str().to_string()),
            flow_direction: record.flow_direction.map(|f| f.as_str().to_string()),
            actual_origin: record.actual_origin.clone(),
            actual_destination: record.actual_destination.clone(),
            validation_status: record.validation_status.map(|s| s.as_str().to_string()),
            validation_error: record.validation_error.clone(),
            processed_at: encode_time(record.processed_at),
            data_source: record.data_source.as_str().to_string(),
            correlation_id: record.correlation_id.clone(),
        })
    }

    fn from_row(row: MovementRow) -> Result<PersistedMovementRecord> {
        let servicing_nodes: Vec<String> = serde_json::from_str(&row.servicing_nodes)?;
        let timestamp = row.timestamp.as_deref().map(decode_time).transpose()?;
        let data_source = DataSource::parse(&row.data_source)
            .ok_or_else(|| Error::Parse(format!("unknown data source '{}'", row.data_source)))?;

        Ok(PersistedMovementRecord {
            id: Some(i64::from(row.id)),
            destination: row.destination,
            source_location: row.source_location,
            destination_location: row.destination_location,
            servicing_nodes,
            status: row.status,
            timestamp,
            is_historical: row.is_historical,
            processed_during_cutover: row.processed_during_cutover,
            movement_type: decode_label(row.movement_type, MovementType::parse, "movement type")?,
            flow_direction: decode_label(row.flow_direction, FlowDirection::parse, "flow direction")?,
            actual_origin: row.actual_origin,
            actual_destination: row.actual_destination,
            validation_status: decode_label(
                row.validation_status,
                ValidationStatus::parse,
                "validation status",
            )?,
            validation_error: row.validation_error,
            processed_at: decode_time(&row.processed_at)?,
            data_source,
            correlation_id: row.correlation_id,
        })
    }
}

#[async_trait]
impl MovementStore for SqliteMovementStore {
    async fn save_batch(&self, records: Vec<PersistedMovementRecord>) -> Result<usize> {
        let rows = records
            .iter()
            .map(Self::to_row)
            .collect::<Result<Vec<_>>>()?;
        let mut conn = self.connection()?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::insert_into(movements::table)
                .values(&rows)
                .execute(conn)
        })
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn query(&self, filter: &MovementFilter) -> Result<Vec<PersistedMovementRecord>> {
        let mut conn = self.connection()?;
        let mut query = movements::table.into_boxed();

        if let Some(source) = &filter.source_location {
            query = query.filter(movements::source_location.eq(source.clone()));
        }
        if let Some(destination_location) = &filter.destination_location {
            query = query.filter(movements::destination_location.eq(destination_location.clone()));
        }
        if let Some(destination) = &filter.destination {
            query = query.filter(movements::destination.eq(destination.clone()));
        }
        if let Some(status) = &filter.status {
            query = query.filter(movements::status.eq(status.clone()));
        }
        if let Some(movement_type) = filter.movement_type {
            query = query.filter(movements::movement_type.eq(movement_type.as_str()));
        }
        if filter.historical_only {
            query = query.filter(movements::is_historical.eq(true));
        }
        if filter.cutover_only {
            query = query.filter(movements::processed_during_cutover.eq(true));
        }
        if let Some(since) = filter.since {
            query = query.filter(movements::timestamp.ge(encode_time(since)));
        }
        if let Some(until) = filter.until {
            query = query.filter(movements::timestamp.le(encode_time(until)));
        }
        // Membership is checked exactly after loading; LIKE only narrows the scan.
        if let Some(node) = &filter.servicing_node {
            query = query.filter(movements::servicing_nodes.like(format!("%\"{node}\"%")));
        } else if let Some(limit) = filter.limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows: Vec<MovementRow> = query
            .order((movements::timestamp.desc(), movements::id.desc()))
            .select(MovementRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut records = rows
            .into_iter()
            .map(Self::from_row)
            .collect::<Result<Vec<_>>>()?;
        if filter.servicing_node.is_some() {
            records.retain(|r| filter.matches(r));
            if let Some(limit) = filter.limit {
                records.truncate(limit);
            }
        }
        Ok(records)
    }

    async fn find_existing(
        &self,
        source_location: &str,
        destination_location: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<PersistedMovementRecord>> {
        let mut conn = self.connection()?;

        let row: Option<MovementRow> = movements::table
            .filter(movements::source_location.eq(source_location))
            .filter(movements::destination_location.eq(destination_location))
            .filter(movements::timestamp.eq(encode_time(timestamp)))
            .select(MovementRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    async fn count_historical_cutover(&self) -> Result<u64> {
        let mut conn = self.connection()?;

        let count: i64 = movements::table
            .filter(movements::is_historical.eq(true))
            .filter(movements::processed_during_cutover.eq(true))
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn statistics(&self) -> Result<MovementStatistics> {
        let mut conn = self.connection()?;
        let db = |e: diesel::result::Error| Error::Database(e.to_string());

        let total: i64 = movements::table.count().get_result(&mut conn).map_err(db)?;
        let historical: i64 = movements::table
            .filter(movements::is_historical.eq(true))
            .count()
            .get_result(&mut conn)
            .map_err(db)?;
        let cutover: i64 = movements::table
            .filter(movements::processed_during_cutover.eq(true))
            .count()
            .get_result(&mut conn)
            .map_err(db)?;

        Ok(MovementStatistics {
            total_count: u64::try_from(total).unwrap_or_default(),
            historical_count: u64::try_from(historical).unwrap_or_default(),
            cutover_count: u64::try_from(cutover).unwrap_or_default(),
        })
    }

    async fn delete_historical_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut conn = self.connection()?;

        diesel::delete(
            movements::table
                .filter(movements::is_historical.eq(true))
                .filter(movements::timestamp.lt(encode_time(cutoff))),
        )
        .execute(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))
    }

    fn store_name(&self) -> &'static str {
        "sqlite"
    }
}
