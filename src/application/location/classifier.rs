//! Location classification.
//!
//! Maps a location identifier to a [`LocationType`] by, in order: the
//! known-locations table, fixed pattern rules, then the configured prefix
//! fallback. Results are cached per trimmed identifier until
//! [`LocationClassifier::clear_cache`] is called.

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::domain::location::is_digit_code;
use crate::domain::{CacheStatistics, LocationType};
use crate::infrastructure::config::location::LocationConfig;

/// Thread-safe location classifier.
///
/// Built once at startup and shared by reference (`Arc`) between the live
/// ingest path and the cutover orchestrator. Cache entries are independent
/// per key, so concurrent writers racing on one key store the same value.
pub struct LocationClassifier {
    /// Authoritative overrides, extensible at runtime.
    known: DashMap<String, LocationType>,
    /// Read-through classification cache.
    cache: DashMap<String, LocationType>,
    cache_enabled: bool,
    store_prefix: String,
    dc_prefix: String,
}

impl LocationClassifier {
    /// Create a classifier seeded from configuration.
    #[must_use]
    pub fn new(config: &LocationConfig) -> Self {
        let known = config
            .known
            .iter()
            .map(|(id, location_type)| (id.trim().to_string(), *location_type))
            .collect();

        Self {
            known,
            cache: DashMap::new(),
            cache_enabled: config.cache_enabled,
            store_prefix: config.store_prefix.clone(),
            dc_prefix: config.dc_prefix.clone(),
        }
    }

    /// Classify a location identifier. Never fails; blank ids are unknown.
    pub fn classify(&self, id: &str) -> LocationType {
        let id = id.trim();
        if id.is_empty() {
            warn!("Blank location id, classifying as unknown");
            return LocationType::Unknown;
        }

        if self.cache_enabled {
            if let Some(hit) = self.cache.get(id).map(|entry| *entry) {
                debug!(location = id, location_type = %hit, "Classifier cache hit");
                return hit;
            }
        }

        let location_type = self.resolve(id);
        debug!(location = id, location_type = %location_type, "Classified location");

        if self.cache_enabled {
            self.cache.insert(id.to_string(), location_type);
        }
        location_type
    }

    fn resolve(&self, id: &str) -> LocationType {
        if let Some(known) = self.known.get(id).map(|entry| *entry) {
            return known;
        }
        if let Some(by_pattern) = Self::match_pattern(id) {
            return by_pattern;
        }
        if id.starts_with(&self.store_prefix) {
            LocationType::Store
        } else if id.starts_with(&self.dc_prefix) {
            LocationType::Dc
        } else {
            LocationType::Unknown
        }
    }

    /// Fixed pattern rules, evaluated in order.
    fn match_pattern(id: &str) -> Option<LocationType> {
        if is_digit_code(id, 4, b'2') {
            Some(LocationType::Store)
        } else if is_digit_code(id, 3, b'9') || is_digit_code(id, 4, b'1') {
            Some(LocationType::Dc)
        } else {
            None
        }
    }

    /// Add or override a known location, refreshing its cache entry.
    pub fn add_known_location(&self, id: &str, location_type: LocationType) {
        let id = id.trim();
        if id.is_empty() {
            warn!("Ignoring blank known location id");
            return;
        }
        self.known.insert(id.to_string(), location_type);
        if self.cache_enabled {
            self.cache.insert(id.to_string(), location_type);
        }
        debug!(location = id, location_type = %location_type, "Added known location");
    }

    /// Add or override several known locations.
    pub fn add_known_locations<I, S>(&self, locations: I)
    where
        I: IntoIterator<Item = (S, LocationType)>,
        S: AsRef<str>,
    {
        for (id, location_type) in locations {
            self.add_known_location(id.as_ref(), location_type);
        }
    }

    /// Purge every cached classification.
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("Cleared location classification cache");
    }

    #[must_use]
    pub fn cache_statistics(&self) -> CacheStatistics {
        CacheStatistics {
            enabled: self.cache_enabled,
            size: self.cache.len(),
            known_locations: self.known.len(),
        }
    }

    pub fn is_store(&self, id: &str) -> bool {
        self.classify(id) == LocationType::Store
    }

    pub fn is_distribution_center(&self, id: &str) -> bool {
        self.classify(id) == LocationType::Dc
    }

    pub fn is_unknown(&self, id: &str) -> bool {
        self.classify(id) == LocationType::Unknown
    }

    /// Advisory check: only store-to-store transfers are invalid.
    ///
    /// Unknown endpoints get the benefit of the doubt.
    pub fn is_valid_movement(&self, source: &str, destination: &str) -> bool {
        let source_type = self.classify(source);
        let destination_type = self.classify(destination);

        if source_type == LocationType::Store && destination_type == LocationType::Store {
            warn!(source, destination, "Store-to-store movement detected");
            return false;
        }
        true
    }
}

impl Default for LocationClassifier {
    fn default() -> Self {
        Self::new(&LocationConfig::default())
    }
}

impl std::fmt::Debug for LocationClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationClassifier")
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_size", &self.cache.len())
            .field("known_locations", &self.known.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LocationClassifier {
        LocationClassifier::default()
    }

    #[test]
    fn known_locations_take_priority_over_patterns() {
        let c = classifier();
        // 2999 would be a store by pattern.
        c.add_known_location("2999", LocationType::Dc);
        assert_eq!(c.classify("2999"), LocationType::Dc);
        assert_eq!(c.classify("960"), LocationType::Dc);
        assert_eq!(c.classify("2352"), LocationType::Store);
    }

    #[test]
    fn pattern_rules() {
        let c = classifier();
        assert_eq!(c.classify("2777"), LocationType::Store);
        assert_eq!(c.classify("955"), LocationType::Dc);
        assert_eq!(c.classify("1500"), LocationType::Dc);
    }

    #[test]
    fn prefix_fallback() {
        let c = classifier();
        // Not 4 digits, so only the "23" store prefix applies.
        assert_eq!(c.classify("23ABC"), LocationType::Store);
        assert_eq!(c.classify("9X1"), LocationType::Dc);
        assert_eq!(c.classify("4444"), LocationType::Unknown);
        assert_eq!(c.classify("ABC"), LocationType::Unknown);
    }

    #[test]
    fn blank_ids_are_unknown_and_not_cached() {
        let c = classifier();
        assert_eq!(c.classify(""), LocationType::Unknown);
        assert_eq!(c.classify("   "), LocationType::Unknown);
        assert_eq!(c.cache_statistics().size, 0);
    }

    #[test]
    fn ids_are_trimmed() {
        let c = classifier();
        assert_eq!(c.classify(" 960 "), LocationType::Dc);
        assert_eq!(c.cache_statistics().size, 1);
        assert_eq!(c.classify("960"), LocationType::Dc);
        assert_eq!(c.cache_statistics().size, 1);
    }

    #[test]
    fn cache_hit_bypasses_table_until_cleared() {
        let config = LocationConfig::default();
        let c = LocationClassifier::new(&config);
        assert_eq!(c.classify("4444"), LocationType::Unknown);

        c.add_known_location("4444", LocationType::Store);
        assert_eq!(c.classify("4444"), LocationType::Store);

        c.clear_cache();
        assert_eq!(c.cache_statistics().size, 0);
        assert_eq!(c.classify("4444"), LocationType::Store);
    }

    #[test]
    fn cache_disabled_keeps_nothing() {
        let config = LocationConfig {
            cache_enabled: false,
            ..LocationConfig::default()
        };
        let c = LocationClassifier::new(&config);
        c.classify("960");
        c.classify("2352");
        let stats = c.cache_statistics();
        assert!(!stats.enabled);
        assert_eq!(stats.size, 0);
        assert_eq!(stats.known_locations, 10);
    }

    #[test]
    fn add_known_locations_in_bulk() {
        let c = classifier();
        c.add_known_locations([("7001", LocationType::Store), ("7002", LocationType::Dc)]);
        assert!(c.is_store("7001"));
        assert!(c.is_distribution_center("7002"));
        assert_eq!(c.cache_statistics().known_locations, 12);
    }

    #[test]
    fn helper_predicates() {
        let c = classifier();
        assert!(c.is_store("2353"));
        assert!(c.is_distribution_center("1002"));
        assert!(c.is_unknown("XYZ"));
    }

    #[test]
    fn only_store_to_store_is_invalid() {
        let c = classifier();
        assert!(!c.is_valid_movement("2352", "2353"));
        assert!(c.is_valid_movement("960", "961"));
        assert!(c.is_valid_movement("960", "2352"));
        assert!(c.is_valid_movement("2352", "960"));
        assert!(c.is_valid_movement("XYZ", "2352"));
        assert!(c.is_valid_movement("2352", ""));
    }
}
