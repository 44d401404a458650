//! Gap-window fetching, sequential or in bounded parallel sub-batches.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::domain::RawMovement;
use crate::error::FetchError;
use crate::port::outbound::history::HistoricalSource;

/// How a window is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// One date at a time.
    Sequential,
    /// Sub-batches of `sub_batch_days` dates, at most `workers` fetches in flight.
    Parallel { workers: usize, sub_batch_days: usize },
}

/// Everything fetched for a window.
#[derive(Debug, Default)]
pub struct FetchedWindow {
    /// Movements per successfully fetched date, in completion order.
    pub batches: Vec<(NaiveDate, Vec<RawMovement>)>,
    pub failed_dates: BTreeSet<NaiveDate>,
}

impl FetchedWindow {
    #[must_use]
    pub fn records_fetched(&self) -> usize {
        self.batches.iter().map(|(_, m)| m.len()).sum()
    }

    fn record(&mut self, date: NaiveDate, outcome: Result<Vec<RawMovement>, FetchError>) {
        match outcome {
            Ok(movements) => {
                debug!(%date, count = movements.len(), "Fetched historical movements");
                self.batches.push((date, movements));
            }
            Err(e) => {
                error!(%date, error = %e.reason, "Historical fetch failed");
                self.failed_dates.insert(date);
            }
        }
    }
}

/// Fetches every date of a window from a [`HistoricalSource`].
///
/// A failing date never aborts its siblings; it is recorded in
/// [`FetchedWindow::failed_dates`] and not retried.
pub struct WindowFetcher {
    source: Arc<dyn HistoricalSource>,
    mode: FetchMode,
}

impl WindowFetcher {
    #[must_use]
    pub fn new(source: Arc<dyn HistoricalSource>, mode: FetchMode) -> Self {
        Self { source, mode }
    }

    #[must_use]
    pub const fn mode(&self) -> FetchMode {
        self.mode
    }

    pub async fn fetch(&self, dates: &[NaiveDate]) -> FetchedWindow {
        match self.mode {
            FetchMode::Sequential => self.fetch_sequential(dates).await,
            FetchMode::Parallel {
                workers,
                sub_batch_days,
            } => self.fetch_parallel(dates, workers, sub_batch_days).await,
        }
    }

    async fn fetch_sequential(&self, dates: &[NaiveDate]) -> FetchedWindow {
        let mut window = FetchedWindow::default();
        for &date in dates {
            let outcome = self.source.fetch(date).await;
            window.record(date, outcome);
        }
        window
    }

    async fn fetch_parallel(
        &self,
        dates: &[NaiveDate],
        workers: usize,
        sub_batch_days: usize,
    ) -> FetchedWindow {
        let mut window = FetchedWindow::default();
        let permits = Arc::new(Semaphore::new(workers.max(1)));

        for (index, chunk) in dates.chunks(sub_batch_days.max(1)).enumerate() {
            info!(
                sub_batch = index + 1,
                dates = chunk.len(),
                source = self.source.source_name(),
                "Fetching sub-batch"
            );

            let mut pending: BTreeSet<NaiveDate> = chunk.iter().copied().collect();
            let mut tasks = JoinSet::new();
            for &date in chunk {
                let source = Arc::clone(&self.source);
                let permits = Arc::clone(&permits);
                tasks.spawn(async move {
                    // The semaphore is never closed.
                    let _permit = permits.acquire_owned().await.ok();
                    (date, source.fetch(date).await)
                });
            }

            // Join barrier: the next sub-batch starts only after every task here ends.
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((date, outcome)) => {
                        pending.remove(&date);
                        window.record(date, outcome);
                    }
                    Err(e) => error!(error = %e, "Historical fetch task aborted"),
                }
            }

            // Dates whose task panicked never reported back.
            for date in pending {
                error!(%date, "Historical fetch task panicked");
                window.failed_dates.insert(date);
            }
        }
        window
    }
}
