//! Cutover and historical API configuration.

use serde::Deserialize;

/// Startup cutover settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CutoverConfig {
    /// Run the cutover on startup.
    #[serde(default)]
    pub enabled: bool,
    /// Days of history to backfill, ending yesterday.
    #[serde(default = "default_gap_days")]
    pub gap_days: u32,
    /// Records written per store batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Fetch dates concurrently in sub-batches instead of one at a time.
    #[serde(default = "default_parallel_processing")]
    pub parallel_processing: bool,
    /// Maximum concurrent fetches.
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,
    /// Dates per parallel sub-batch.
    #[serde(default = "default_sub_batch_days")]
    pub sub_batch_days: usize,
    /// Drop fetched records already present in the store.
    #[serde(default = "default_skip_existing")]
    pub skip_existing: bool,
    /// Historical API client settings.
    #[serde(default)]
    pub api: HistoryApiConfig,
}

const fn default_gap_days() -> u32 {
    30
}

const fn default_batch_size() -> usize {
    1000
}

const fn default_parallel_processing() -> bool {
    true
}

const fn default_worker_pool_size() -> usize {
    5
}

const fn default_sub_batch_days() -> usize {
    7
}

const fn default_skip_existing() -> bool {
    true
}

impl Default for CutoverConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            gap_days: default_gap_days(),
            batch_size: default_batch_size(),
            parallel_processing: default_parallel_processing(),
            worker_pool_size: default_worker_pool_size(),
            sub_batch_days: default_sub_batch_days(),
            skip_existing: default_skip_existing(),
            api: HistoryApiConfig::default(),
        }
    }
}

/// Historical movement API client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryApiConfig {
    /// Base URL; requests go to `{base_url}/movements/by-date/{date}`.
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Attempts per date for transient failures.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default)]
    pub retry_backoff_ms: u64,
    /// Bearer token, loaded from `WAYBILL_HISTORY_API_TOKEN` only.
    #[serde(skip)]
    pub token: Option<String>,
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_retry_max_attempts() -> u32 {
    1
}

impl Default for HistoryApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: 0,
            token: None,
        }
    }
}
