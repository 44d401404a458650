//! HTTP client for the historical movement API.
//!
//! One request per gap date: `GET {base_url}/movements/by-date/{YYYY-MM-DD}`,
//! answered with a JSON array of movements in the feed's camelCase schema.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client as HttpClient;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::RawMovement;
use crate::error::FetchError;
use crate::infrastructure::config::cutover::HistoryApiConfig;
use crate::port::outbound::history::HistoricalSource;

/// Historical API client with bounded retry on transient failures.
pub struct HistoricalApiClient {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
    retry_max_attempts: u32,
    retry_backoff_ms: u64,
}

impl HistoricalApiClient {
    /// Create a client with default timeouts and no retries.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: trim_base(base_url.into()),
            token: None,
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &HistoryApiConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: trim_base(config.base_url.clone()),
            token: config.token.clone(),
            retry_max_attempts: config.retry_max_attempts,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    /// Attach a bearer token to every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn url_for(&self, date: NaiveDate) -> String {
        format!("{}/movements/by-date/{}", self.base_url, date.format("%Y-%m-%d"))
    }

    async fn get_with_retry(&self, url: &str) -> Result<Option<Vec<RawMovement>>, reqwest::Error> {
        let mut attempt = 0;
        let max_attempts = self.retry_max_attempts.max(1);

        loop {
            attempt += 1;
            let mut request = self.http.get(url);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err);
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                    continue;
                }
            };

            let response = response.error_for_status()?;

            match response.json::<Option<Vec<RawMovement>>>().await {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if attempt >= max_attempts || !Self::should_retry(&err) {
                        return Err(err);
                    }
                    self.backoff(attempt, max_attempts, &err).await;
                }
            }
        }
    }

    fn should_retry(err: &reqwest::Error) -> bool {
        err.is_timeout() || err.is_connect()
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &reqwest::Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "Historical API request failed, retrying"
        );
        if self.retry_backoff_ms > 0 {
            sleep(Duration::from_millis(self.retry_backoff_ms)).await;
        }
    }
}

fn trim_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[async_trait]
impl HistoricalSource for HistoricalApiClient {
    async fn fetch(&self, date: NaiveDate) -> Result<Vec<RawMovement>, FetchError> {
        let url = self.url_for(date);
        debug!(url = %url, "Fetching historical movements");

        match self.get_with_retry(&url).await {
            Ok(Some(movements)) => Ok(movements),
            Ok(None) => {
                warn!(%date, "Historical API returned null, treating as no movements");
                Ok(Vec::new())
            }
            Err(err) => Err(FetchError::new(date, err.to_string())),
        }
    }

    fn source_name(&self) -> &'static str {
        "historical-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::date;

    #[test]
    fn url_uses_iso_date_and_trims_slash() {
        let client = HistoricalApiClient::new("http://history.local/api/");
        assert_eq!(
            client.url_for(date(2024, 3, 5)),
            "http://history.local/api/movements/by-date/2024-03-05"
        );
    }

    #[test]
    fn from_config_keeps_token_and_retry() {
        let config = HistoryApiConfig {
            base_url: "http://history.local".into(),
            retry_max_attempts: 3,
            token: Some("secret".into()),
            ..HistoryApiConfig::default()
        };
        let client = HistoricalApiClient::from_config(&config);
        assert_eq!(client.retry_max_attempts, 3);
        assert_eq!(client.token.as_deref(), Some("secret"));
        assert_eq!(client.source_name(), "historical-api");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error_for_that_date() {
        // Port 9 (discard) is closed on test hosts.
        let client = HistoricalApiClient::new("http://127.0.0.1:9");
        let err = client.fetch(date(2024, 3, 5)).await.unwrap_err();
        assert_eq!(err.date, date(2024, 3, 5));
    }
}
