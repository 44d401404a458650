//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::infrastructure::config::cutover::CutoverConfig;
use crate::infrastructure::config::settings::{Config, MEMORY_DATABASE};

/// Enabled cutover config with the given gap and mode, no real API.
pub fn cutover(gap_days: u32, parallel_processing: bool) -> CutoverConfig {
    let mut config = CutoverConfig {
        enabled: true,
        gap_days,
        parallel_processing,
        ..CutoverConfig::default()
    };
    config.api.base_url = "http://127.0.0.1:9/api".to_string();
    config
}

/// Full config backed by the in-memory store.
pub fn memory_config() -> Config {
    Config {
        database: MEMORY_DATABASE.to_string(),
        ..Config::default()
    }
}

/// TOML for an in-memory config with cutover disabled.
pub const MEMORY_TOML: &str = r#"
database = ":memory:"

[logging]
level = "warn"
format = "pretty"

[feed]
units = ["movement-events"]
"#;
