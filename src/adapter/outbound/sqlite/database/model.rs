//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::movements;

/// Database row for a movement (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = movements)]
pub struct NewMovementRow {
    pub destination: String,
    pub source_location: String,
    pub destination_location: String,
    /// JSON array of location ids.
    pub servicing_nodes: String,
    pub status: Option<String>,
    /// Fixed-width RFC 3339 UTC, so text order is time order.
    pub timestamp: Option<String>,
    pub is_historical: bool,
    pub processed_during_cutover: bool,
    pub movement_type: Option<String>,
    pub flow_direction: Option<String>,
    pub actual_origin: Option<String>,
    pub actual_destination: Option<String>,
    pub validation_status: Option<String>,
    pub validation_error: Option<String>,
    pub processed_at: String,
    pub data_source: String,
    pub correlation_id: Option<String>,
}

/// Database row for a movement (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = movements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MovementRow {
    pub id: i32,
    pub destination: String,
    pub source_location: String,
    pub destination_location: String,
    pub servicing_nodes: String,
    pub status: Option<String>,
    pub timestamp: Option<String>,
    pub is_historical: bool,
    pub processed_during_cutover: bool,
    pub movement_type: Option<String>,
    pub flow_direction: Option<String>,
    pub actual_origin: Option<String>,
    pub actual_destination: Option<String>,
    pub validation_status: Option<String>,
    pub validation_error: Option<String>,
    pub processed_at: String,
    pub data_source: String,
    pub correlation_id: Option<String>,
}
