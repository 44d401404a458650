//! Live feed configuration.

use serde::Deserialize;

/// Feed consumption units to start.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Unit ids, one consumer task each.
    #[serde(default = "default_units")]
    pub units: Vec<String>,
    /// Buffered messages per unit (bounded to prevent unbounded memory growth).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_units() -> Vec<String> {
    vec!["movement-events".to_string()]
}

const fn default_channel_capacity() -> usize {
    1024
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            units: default_units(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
