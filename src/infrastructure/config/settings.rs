//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; the historical API token comes
//! from the `WAYBILL_HISTORY_API_TOKEN` environment variable only.
//!
//! # Example
//!
//! ```no_run
//! use waybill::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::cutover::CutoverConfig;
use super::feed::FeedConfig;
use super::location::LocationConfig;
use super::logging::LoggingConfig;
use super::validation::ValidationConfig;
use crate::error::{ConfigError, Result};

/// Environment variable holding the historical API bearer token.
pub const HISTORY_API_TOKEN_ENV: &str = "WAYBILL_HISTORY_API_TOKEN";

/// Database path selecting the in-memory store.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to SQLite database file.
    ///
    /// Defaults to "waybill.db"; `":memory:"` keeps records in process memory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Location classifier settings.
    #[serde(default)]
    pub location: LocationConfig,

    /// Movement validation rules.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Startup cutover and historical API settings.
    #[serde(default)]
    pub cutover: CutoverConfig,

    /// Live feed units.
    #[serde(default)]
    pub feed: FeedConfig,
}

fn default_database_path() -> String {
    "waybill.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            location: LocationConfig::default(),
            validation: ValidationConfig::default(),
            cutover: CutoverConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Never read from the config file.
        config.cutover.api.token = std::env::var(HISTORY_API_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns the first missing or out-of-range field.
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.location.store_prefix.is_empty() {
            return Err(invalid("store_prefix", "must not be empty"));
        }
        if self.location.dc_prefix.is_empty() {
            return Err(invalid("dc_prefix", "must not be empty"));
        }

        let cutover = &self.cutover;
        if cutover.batch_size == 0 {
            return Err(invalid("batch_size", "must be greater than 0"));
        }
        if cutover.worker_pool_size == 0 {
            return Err(invalid("worker_pool_size", "must be greater than 0"));
        }
        if cutover.sub_batch_days == 0 {
            return Err(invalid("sub_batch_days", "must be greater than 0"));
        }
        if cutover.api.retry_max_attempts == 0 {
            return Err(invalid("retry_max_attempts", "must be greater than 0"));
        }
        if cutover.enabled {
            if cutover.api.base_url.trim().is_empty() {
                return Err(ConfigError::MissingField { field: "base_url" }.into());
            }
            if let Err(e) = url::Url::parse(&cutover.api.base_url) {
                return Err(invalid("base_url", &e.to_string()));
            }
        }

        if self.feed.units.is_empty() {
            return Err(ConfigError::MissingField { field: "units" }.into());
        }
        if self.feed.units.iter().any(|unit| unit.trim().is_empty()) {
            return Err(invalid("units", "unit ids must not be blank"));
        }
        if self.feed.channel_capacity == 0 {
            return Err(invalid("channel_capacity", "must be greater than 0"));
        }
        Ok(())
    }

    /// True when records should live in process memory rather than SQLite.
    #[must_use]
    pub fn uses_memory_store(&self) -> bool {
        self.database == MEMORY_DATABASE
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LocationType;
    use crate::error::Error;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.database, "waybill.db");
        assert_eq!(config.logging.level, "info");
        assert!(config.location.cache_enabled);
        assert_eq!(config.location.store_prefix, "23");
        assert_eq!(config.location.dc_prefix, "9");
        assert_eq!(config.location.known.len(), 10);
        assert!(!config.validation.strict_mode);
        assert!(config.validation.allow_unknown_locations);
        assert!(!config.cutover.enabled);
        assert_eq!(config.cutover.gap_days, 30);
        assert_eq!(config.cutover.batch_size, 1000);
        assert!(config.cutover.parallel_processing);
        assert_eq!(config.feed.units, vec!["movement-events".to_string()]);
    }

    #[test]
    fn known_table_replaces_seed() {
        let config = Config::parse_toml(
            r#"
            [location.known]
            "4000" = "dc"
            "#,
        )
        .unwrap();
        assert_eq!(config.location.known.len(), 1);
        assert_eq!(config.location.known.get("4000"), Some(&LocationType::Dc));
    }

    #[test]
    fn enabled_cutover_requires_base_url() {
        let err = Config::parse_toml("[cutover]\nenabled = true\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { field: "base_url" })
        ));
    }

    #[test]
    fn enabled_cutover_rejects_malformed_url() {
        let err = Config::parse_toml(
            "[cutover]\nenabled = true\n[cutover.api]\nbase_url = \"not a url\"\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "base_url", .. })
        ));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = Config::parse_toml("[cutover]\nbatch_size = 0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue { field: "batch_size", .. })
        ));
    }

    #[test]
    fn empty_feed_units_are_rejected() {
        let err = Config::parse_toml("[feed]\nunits = []\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { field: "units" })
        ));
    }

    #[test]
    fn memory_database_selects_memory_store() {
        let config = Config::parse_toml("database = \":memory:\"\n").unwrap();
        assert!(config.uses_memory_store());
    }
}
