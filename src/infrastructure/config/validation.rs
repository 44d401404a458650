//! Movement validation configuration.

use serde::Deserialize;

/// Business-rule validation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Enable the format-based origin/destination consistency heuristic.
    #[serde(default)]
    pub strict_mode: bool,
    /// Accept movements whose endpoints classify as unknown.
    #[serde(default = "default_allow_unknown_locations")]
    pub allow_unknown_locations: bool,
    /// How far in the future a timestamp may be (hours).
    #[serde(default = "default_max_timestamp_future_hours")]
    pub max_timestamp_future_hours: u32,
    /// How far in the past a timestamp may be (days).
    #[serde(default = "default_max_timestamp_past_days")]
    pub max_timestamp_past_days: u32,
}

const fn default_allow_unknown_locations() -> bool {
    true
}

const fn default_max_timestamp_future_hours() -> u32 {
    24
}

const fn default_max_timestamp_past_days() -> u32 {
    365
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            allow_unknown_locations: default_allow_unknown_locations(),
            max_timestamp_future_hours: default_max_timestamp_future_hours(),
            max_timestamp_past_days: default_max_timestamp_past_days(),
        }
    }
}
