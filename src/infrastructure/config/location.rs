//! Location classifier configuration.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::LocationType;

/// Settings for the location classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    /// Cache classifications per identifier.
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
    /// Prefix fallback marking a store.
    #[serde(default = "default_store_prefix")]
    pub store_prefix: String,
    /// Prefix fallback marking a distribution center.
    #[serde(default = "default_dc_prefix")]
    pub dc_prefix: String,
    /// Seed for the known-locations table.
    #[serde(default = "default_known_locations")]
    pub known: HashMap<String, LocationType>,
}

const fn default_cache_enabled() -> bool {
    true
}

fn default_store_prefix() -> String {
    "23".into()
}

fn default_dc_prefix() -> String {
    "9".into()
}

/// Known stores and DCs seeded when the config names none.
#[must_use]
pub fn default_known_locations() -> HashMap<String, LocationType> {
    let stores = ["2352", "2353", "2354", "2355"];
    let dcs = ["960", "961", "962", "1001", "1002", "1003"];

    stores
        .iter()
        .map(|id| ((*id).to_string(), LocationType::Store))
        .chain(dcs.iter().map(|id| ((*id).to_string(), LocationType::Dc)))
        .collect()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            cache_enabled: default_cache_enabled(),
            store_prefix: default_store_prefix(),
            dc_prefix: default_dc_prefix(),
            known: default_known_locations(),
        }
    }
}
