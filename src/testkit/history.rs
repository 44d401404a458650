//! Scripted [`HistoricalSource`] for cutover tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::domain::RawMovement;
use crate::error::FetchError;
use crate::port::outbound::history::HistoricalSource;

/// Returns scripted movements per date; unscripted dates yield an empty list.
///
/// Every fetch is recorded, including failures.
#[derive(Debug, Default)]
pub struct ScriptedHistory {
    movements: HashMap<NaiveDate, Vec<RawMovement>>,
    failures: HashSet<NaiveDate>,
    panics: HashSet<NaiveDate>,
    delay: Option<Duration>,
    fetched: Mutex<Vec<NaiveDate>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movements(mut self, date: NaiveDate, movements: Vec<RawMovement>) -> Self {
        self.movements.insert(date, movements);
        self
    }

    /// Make fetches for `date` fail with a [`FetchError`].
    pub fn with_failure(mut self, date: NaiveDate) -> Self {
        self.failures.insert(date);
        self
    }

    /// Make fetches for `date` panic inside the task.
    pub fn with_panic(mut self, date: NaiveDate) -> Self {
        self.panics.insert(date);
        self
    }

    /// Sleep before answering, to overlap concurrent fetches.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Dates fetched so far, in call order.
    pub fn fetched(&self) -> Vec<NaiveDate> {
        self.fetched.lock().clone()
    }

    /// Highest number of fetches that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

/// Counts one fetch as in flight until dropped, panics included.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(history: &'a ScriptedHistory) -> Self {
        let now = history.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        history.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(&history.in_flight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HistoricalSource for ScriptedHistory {
    async fn fetch(&self, date: NaiveDate) -> Result<Vec<RawMovement>, FetchError> {
        self.fetched.lock().push(date);
        let _in_flight = InFlight::enter(self);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panics.contains(&date) {
            panic!("scripted panic for {date}");
        }
        if self.failures.contains(&date) {
            return Err(FetchError::new(date, "scripted failure"));
        }
        Ok(self.movements.get(&date).cloned().unwrap_or_default())
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}
