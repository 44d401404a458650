//! Startup cutover: pause the live feed, backfill the gap window from the
//! historical API, then resume.
//!
//! # Phases
//!
//! ```text
//! IDLE → PAUSING → FETCHING → VALIDATING → RESUMING → DONE
//!           │          │           │
//!           └──────────┴───────────┴──▶ (resume still runs) → FAILED
//! ```
//!
//! Per-date fetch failures and per-batch store failures are recorded on the
//! run and never abort it. A pause failure skips the backfill. Resume is
//! attempted exactly once on every path.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{error, info, warn};

use super::fetch::{FetchMode, FetchedWindow, WindowFetcher};
use crate::application::ingestion::IngestionController;
use crate::application::movement::MovementProcessor;
use crate::domain::{
    CutoverPhase, CutoverRun, CutoverValidationSummary, GapWindow, PersistedMovementRecord,
    RecordOrigin,
};
use crate::infrastructure::config::cutover::CutoverConfig;
use crate::port::outbound::history::HistoricalSource;
use crate::port::outbound::store::MovementStore;

/// Validation errors kept on the run summary.
const MAX_REPORTED_VALIDATION_ERRORS: usize = 20;

/// Drives one cutover run at a time.
pub struct CutoverOrchestrator {
    config: CutoverConfig,
    ingestion: Arc<IngestionController>,
    fetcher: WindowFetcher,
    store: Arc<dyn MovementStore>,
    processor: Arc<MovementProcessor>,
}

impl CutoverOrchestrator {
    pub fn new(
        config: CutoverConfig,
        ingestion: Arc<IngestionController>,
        source: Arc<dyn HistoricalSource>,
        store: Arc<dyn MovementStore>,
        processor: Arc<MovementProcessor>,
    ) -> Self {
        let mode = if config.parallel_processing {
            FetchMode::Parallel {
                workers: config.worker_pool_size,
                sub_batch_days: config.sub_batch_days,
            }
        } else {
            FetchMode::Sequential
        };

        Self {
            config,
            ingestion,
            fetcher: WindowFetcher::new(source, mode),
            store,
            processor,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &CutoverConfig {
        &self.config
    }

    /// Startup hook: runs a cutover only when enabled.
    pub async fn on_startup(&self) -> Option<CutoverRun> {
        if !self.config.enabled {
            info!("Cutover disabled, skipping");
            return None;
        }
        Some(self.execute().await)
    }

    /// Run a cutover over the window ending today (UTC).
    pub async fn execute(&self) -> CutoverRun {
        let now = Utc::now();
        self.execute_at(now.date_naive(), now).await
    }

    /// Run a cutover over the window ending at `today`, with `now` as the
    /// processing time of every backfilled record.
    pub async fn execute_at(&self, today: NaiveDate, now: DateTime<Utc>) -> CutoverRun {
        let started = Instant::now();
        let window = GapWindow::ending_at(today, self.config.gap_days);
        let mut run = CutoverRun::start(window, now);

        info!(
            start_date = %window.start_date,
            end_date = %window.end_date,
            gap_days = self.config.gap_days,
            mode = ?self.fetcher.mode(),
            "Starting cutover"
        );

        self.enter(&mut run, CutoverPhase::Pausing);
        match self.ingestion.pause_all().await {
            Ok(()) => self.backfill(&mut run, now).await,
            Err(e) => {
                error!(error = %e, "Cutover pause failed, skipping backfill");
                run.fail(CutoverPhase::Pausing, e.to_string());
            }
        }

        self.enter(&mut run, CutoverPhase::Resuming);
        match self.ingestion.resume_all().await {
            Ok(()) => run.resumed = true,
            Err(e) => error!(error = %e, "Failed to resume feed after cutover"),
        }

        let elapsed = chrono::Duration::from_std(started.elapsed()).unwrap_or_default();
        run.finish(now + elapsed);
        log_summary(&run);
        run
    }

    fn enter(&self, run: &mut CutoverRun, phase: CutoverPhase) {
        info!(phase = %phase, from = %run.phase, "Cutover phase");
        run.phase = phase;
    }

    async fn backfill(&self, run: &mut CutoverRun, now: DateTime<Utc>) {
        self.enter(run, CutoverPhase::Fetching);
        let fetched = self.fetcher.fetch(&run.window.dates()).await;
        run.historical.records_fetched = fetched.records_fetched();
        info!(
            records = run.historical.records_fetched,
            failed_dates = fetched.failed_dates.len(),
            "Fetched gap window"
        );

        let failed_dates = fetched.failed_dates.clone();
        let records = self.convert(run, fetched, now);
        self.store_records(run, records).await;
        run.historical.failed_dates = failed_dates;

        self.enter(run, CutoverPhase::Validating);
        let v = &run.validation;
        info!(
            validated = v.total_records_validated,
            valid = v.valid_records,
            invalid = v.invalid_records,
            passed = v.validation_passed,
            "Validated backfilled records"
        );
    }

    /// Resolve and validate every fetched movement, filling the validation summary.
    fn convert(
        &self,
        run: &mut CutoverRun,
        fetched: FetchedWindow,
        now: DateTime<Utc>,
    ) -> Vec<PersistedMovementRecord> {
        let mut summary = CutoverValidationSummary::default();
        let mut records = Vec::with_capacity(fetched.records_fetched());

        for (_, movements) in fetched.batches {
            for raw in movements {
                let processed = self.processor.process_at(raw, now);
                summary.total_records_validated += 1;
                if processed.validation.is_valid() {
                    summary.valid_records += 1;
                } else {
                    summary.invalid_records += 1;
                    if summary.validation_errors.len() < MAX_REPORTED_VALIDATION_ERRORS {
                        summary.validation_errors.push(format!(
                            "{} → {}: {}",
                            processed.resolved.actual_origin(),
                            processed.resolved.actual_destination(),
                            processed.validation.message().unwrap_or_default()
                        ));
                    }
                }
                records.push(processed.into_record(RecordOrigin::Cutover));
            }
        }

        summary.validation_passed = summary.invalid_records == 0;
        run.validation = summary;
        records
    }

    async fn store_records(&self, run: &mut CutoverRun, records: Vec<PersistedMovementRecord>) {
        let records = if self.config.skip_existing {
            self.drop_existing(run, records).await
        } else {
            records
        };

        let batch_size = self.config.batch_size.max(1);
        let mut remaining = records;
        let mut batch_index = 0usize;
        while !remaining.is_empty() {
            let rest = remaining.split_off(batch_size.min(remaining.len()));
            let batch = std::mem::replace(&mut remaining, rest);
            let size = batch.len();
            batch_index += 1;

            match self.store.save_batch(batch).await {
                Ok(saved) => run.historical.total_records_processed += saved,
                Err(e) => {
                    error!(
                        batch = batch_index,
                        size,
                        store = self.store.store_name(),
                        error = %e,
                        "Failed to store historical batch"
                    );
                    run.historical.failed_batches += 1;
                }
            }
        }

        info!(
            stored = run.historical.total_records_processed,
            duplicates = run.historical.duplicates_skipped,
            failed_batches = run.historical.failed_batches,
            "Stored gap window"
        );
    }

    /// Drop records already in the store or repeated earlier in this window.
    async fn drop_existing(
        &self,
        run: &mut CutoverRun,
        records: Vec<PersistedMovementRecord>,
    ) -> Vec<PersistedMovementRecord> {
        let mut kept = Vec::with_capacity(records.len());
        let mut seen: HashSet<(String, String, DateTime<Utc>)> = HashSet::new();
        for record in records {
            let Some(timestamp) = record.timestamp else {
                kept.push(record);
                continue;
            };
            let key = (
                record.source_location.clone(),
                record.destination_location.clone(),
                timestamp,
            );
            if !seen.insert(key) {
                run.historical.duplicates_skipped += 1;
                continue;
            }
            match self
                .store
                .find_existing(&record.source_location, &record.destination_location, timestamp)
                .await
            {
                Ok(Some(_)) => run.historical.duplicates_skipped += 1,
                Ok(None) => kept.push(record),
                Err(e) => {
                    warn!(error = %e, "Duplicate check failed, keeping record");
                    kept.push(record);
                }
            }
        }
        kept
    }
}

fn log_summary(run: &CutoverRun) {
    if run.success {
        info!(
            records = run.total_records_processed(),
            duplicates = run.historical.duplicates_skipped,
            duration_ms = run.duration_ms(),
            resumed = run.resumed,
            "Cutover completed"
        );
    } else {
        error!(
            records = run.total_records_processed(),
            failed_dates = run.failed_dates().len(),
            failed_batches = run.historical.failed_batches,
            failed_phase = ?run.failed_phase,
            error = run.error_message.as_deref().unwrap_or_default(),
            duration_ms = run.duration_ms(),
            resumed = run.resumed,
            "Cutover failed"
        );
    }
}
