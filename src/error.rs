use chrono::NaiveDate;
use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Feed control errors, carrying the operation and the unit it failed on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestionError {
    #[error("failed to pause feed unit '{unit}': {reason}")]
    Pause { unit: String, reason: String },

    #[error("failed to resume feed unit '{unit}': {reason}")]
    Resume { unit: String, reason: String },

    #[error("failed to stop feed unit '{unit}': {reason}")]
    Stop { unit: String, reason: String },

    #[error("feed registry error: {0}")]
    Registry(String),
}

/// Historical fetch failure for a single gap date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to fetch historical data for date {date}: {reason}")]
pub struct FetchError {
    pub date: NaiveDate,
    pub reason: String,
}

impl FetchError {
    pub fn new(date: NaiveDate, reason: impl Into<String>) -> Self {
        Self {
            date,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let err = FetchError::new(date, "status 503");
        assert_eq!(
            err.to_string(),
            "failed to fetch historical data for date 2024-03-09: status 503"
        );
    }

    #[test]
    fn ingestion_error_converts_transparently() {
        let err: Error = IngestionError::Pause {
            unit: "movement-events".into(),
            reason: "broker unreachable".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "failed to pause feed unit 'movement-events': broker unreachable"
        );
    }
}
