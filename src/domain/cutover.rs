//! Cutover run bookkeeping.
//!
//! A [`CutoverRun`] is owned by the orchestrator for the duration of one
//! invocation and only leaves it as a log line or a CLI report.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Orchestration state machine.
///
/// `Idle → Pausing → Fetching → Validating → Resuming → Done`, with
/// `Failed` reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CutoverPhase {
    Idle,
    Pausing,
    Fetching,
    Validating,
    Resuming,
    Done,
    Failed,
}

impl CutoverPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Pausing => "PAUSING",
            Self::Fetching => "FETCHING",
            Self::Validating => "VALIDATING",
            Self::Resuming => "RESUMING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for CutoverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open date window `[start_date, end_date)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GapWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl GapWindow {
    /// Window of `gap_days` days ending (exclusive) at `today`.
    #[must_use]
    pub fn ending_at(today: NaiveDate, gap_days: u32) -> Self {
        let start_date = today
            .checked_sub_days(chrono::Days::new(u64::from(gap_days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            start_date,
            end_date: today,
        }
    }

    /// Every date in the window, in order.
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start_date
            .iter_days()
            .take_while(|d| *d < self.end_date)
            .collect()
    }

    #[must_use]
    pub fn len_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(0)
    }
}

/// Outcome of the fetch and store phases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoricalDataResult {
    pub records_fetched: usize,
    /// Records successfully persisted.
    pub total_records_processed: usize,
    pub duplicates_skipped: usize,
    pub failed_batches: usize,
    pub failed_dates: BTreeSet<NaiveDate>,
}

impl HistoricalDataResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed_dates.is_empty()
    }
}

/// Outcome of the validating phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CutoverValidationSummary {
    pub total_records_validated: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub validation_passed: bool,
    /// First validation errors seen, capped.
    pub validation_errors: Vec<String>,
}

/// One orchestration invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CutoverRun {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub phase: CutoverPhase,
    /// Phase that failed, when the run did not complete cleanly.
    pub failed_phase: Option<CutoverPhase>,
    pub success: bool,
    pub error_message: Option<String>,
    pub window: GapWindow,
    pub historical: HistoricalDataResult,
    pub validation: CutoverValidationSummary,
    /// False when the final resume of the feed failed.
    pub resumed: bool,
}

impl CutoverRun {
    #[must_use]
    pub fn start(window: GapWindow, start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time: None,
            phase: CutoverPhase::Idle,
            failed_phase: None,
            success: false,
            error_message: None,
            window,
            historical: HistoricalDataResult::default(),
            validation: CutoverValidationSummary::default(),
            resumed: false,
        }
    }

    /// Record a phase error. The first error wins the `error_message`.
    pub fn fail(&mut self, phase: CutoverPhase, message: impl Into<String>) {
        if self.failed_phase.is_none() {
            self.failed_phase = Some(phase);
            self.error_message = Some(message.into());
        }
    }

    /// Close the run: success requires no phase error and no failed dates.
    pub fn finish(&mut self, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time);
        self.success = self.failed_phase.is_none() && self.historical.failed_dates.is_empty();
        if !self.success && self.error_message.is_none() {
            self.error_message = Some(format!(
                "failed to fetch {} of {} gap dates",
                self.historical.failed_dates.len(),
                self.window.len_days()
            ));
        }
        self.phase = if self.success {
            CutoverPhase::Done
        } else {
            CutoverPhase::Failed
        };
    }

    #[must_use]
    pub fn total_records_processed(&self) -> usize {
        self.historical.total_records_processed
    }

    #[must_use]
    pub fn failed_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.historical.failed_dates
    }

    /// Elapsed milliseconds, 0 while the run is open.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.end_time
            .map_or(0, |end| (end - self.start_time).num_milliseconds())
    }
}
