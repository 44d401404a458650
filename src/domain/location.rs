//! Location classification types.
//!
//! - [`LocationType`] - Store, distribution center, or unknown
//! - [`CacheStatistics`] - Snapshot of the classifier's cache and known table

use std::fmt;

use serde::{Deserialize, Serialize};

/// Derived type of a location identifier.
///
/// Never stored authoritatively: recomputed (or read from the classifier
/// cache) for each identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    /// Retail store, usually the terminal recipient of goods.
    Store,
    /// Distribution center supplying stores.
    Dc,
    /// No rule matched.
    Unknown,
}

impl LocationType {
    /// Upper-case label used in logs and persisted records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Store => "STORE",
            Self::Dc => "DC",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatistics {
    pub enabled: bool,
    pub size: usize,
    pub known_locations: usize,
}

/// Returns true when `id` is exactly `len` ASCII digits starting with `first`.
#[must_use]
pub fn is_digit_code(id: &str, len: usize, first: u8) -> bool {
    id.len() == len && id.as_bytes().first() == Some(&first) && id.bytes().all(|b| b.is_ascii_digit())
}

/// Returns true when `location` has the identifier format: 3 or 4 ASCII digits.
#[must_use]
pub fn is_location_format(location: &str) -> bool {
    matches!(location.len(), 3 | 4) && location.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_type_labels() {
        assert_eq!(LocationType::Store.to_string(), "STORE");
        assert_eq!(LocationType::Dc.to_string(), "DC");
        assert_eq!(LocationType::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn location_type_deserializes_lowercase() {
        let parsed: LocationType = serde_json::from_str("\"dc\"").unwrap();
        assert_eq!(parsed, LocationType::Dc);
    }

    #[test]
    fn digit_code_requires_exact_length_and_prefix() {
        assert!(is_digit_code("2352", 4, b'2'));
        assert!(!is_digit_code("235", 4, b'2'));
        assert!(!is_digit_code("23521", 4, b'2'));
        assert!(!is_digit_code("2a52", 4, b'2'));
        assert!(!is_digit_code("1352", 4, b'2'));
        assert!(!is_digit_code("", 4, b'2'));
    }

    #[test]
    fn location_format_accepts_three_or_four_digits() {
        assert!(is_location_format("960"));
        assert!(is_location_format("2352"));
        assert!(!is_location_format("96"));
        assert!(!is_location_format("23521"));
        assert!(!is_location_format("96O"));
        assert!(!is_location_format(""));
        assert!(!is_location_format("٩٦٠"));
    }
}
