//! Pause/resume control over the live feed.
//!
//! Used by the cutover orchestrator to stop live consumption while the gap
//! window is backfilled. Units that are missing or not running are skipped
//! with a warning; a transport failure on any unit aborts the call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::{FeedStatus, FeedUnitInfo};
use crate::error::IngestionError;
use crate::port::outbound::feed::FeedControl;

/// Coordinates pause, resume, and emergency stop across feed units.
pub struct IngestionController {
    feed: Arc<dyn FeedControl>,
    /// Coarse summary of the last whole-feed operation, not per-unit truth.
    listeners_active: AtomicBool,
}

impl IngestionController {
    #[must_use]
    pub fn new(feed: Arc<dyn FeedControl>) -> Self {
        Self {
            feed,
            listeners_active: AtomicBool::new(true),
        }
    }

    /// Pause every running unit.
    ///
    /// # Errors
    ///
    /// Returns the first unit failure; units paused before it stay paused.
    pub async fn pause_all(&self) -> Result<(), IngestionError> {
        info!(feed = self.feed.feed_name(), "Pausing all feed units");
        let ids = self.feed.unit_ids();
        for id in &ids {
            if let Err(e) = self.pause_unit(id).await {
                error!(unit = %id, error = %e, "Failed to pause feed units");
                return Err(e);
            }
        }
        self.listeners_active.store(false, Ordering::SeqCst);
        info!(units = ids.len(), "Paused all feed units");
        Ok(())
    }

    /// Resume every registered unit. Safe when nothing is paused.
    ///
    /// # Errors
    ///
    /// Returns the first unit failure.
    pub async fn resume_all(&self) -> Result<(), IngestionError> {
        info!(feed = self.feed.feed_name(), "Resuming all feed units");
        let ids = self.feed.unit_ids();
        for id in &ids {
            if let Err(e) = self.resume_unit(id).await {
                error!(unit = %id, error = %e, "Failed to resume feed units");
                return Err(e);
            }
        }
        self.listeners_active.store(true, Ordering::SeqCst);
        info!(units = ids.len(), "Resumed all feed units");
        Ok(())
    }

    /// Pause one unit.
    ///
    /// # Errors
    ///
    /// Returns the feed's failure for this unit.
    pub async fn pause(&self, id: &str) -> Result<(), IngestionError> {
        info!(unit = id, "Pausing feed unit");
        self.pause_unit(id).await
    }

    /// Resume one unit.
    ///
    /// # Errors
    ///
    /// Returns the feed's failure for this unit.
    pub async fn resume(&self, id: &str) -> Result<(), IngestionError> {
        info!(unit = id, "Resuming feed unit");
        self.resume_unit(id).await
    }

    async fn pause_unit(&self, id: &str) -> Result<(), IngestionError> {
        if !self.feed.contains(id) || !self.feed.is_running(id) {
            warn!(unit = id, "Feed unit not found or not running, skipping pause");
            return Ok(());
        }
        debug!(unit = id, "Pausing feed unit");
        self.feed.pause(id).await
    }

    async fn resume_unit(&self, id: &str) -> Result<(), IngestionError> {
        if !self.feed.contains(id) {
            warn!(unit = id, "Feed unit not found, skipping resume");
            return Ok(());
        }
        debug!(unit = id, "Resuming feed unit");
        self.feed.resume(id).await
    }

    /// Counts of total, consuming, and paused units.
    #[must_use]
    pub fn status(&self) -> FeedStatus {
        let ids = self.feed.unit_ids();
        let total_units = ids.len();
        let running_units = ids
            .iter()
            .filter(|id| self.feed.is_running(id) && !self.feed.is_pause_requested(id))
            .count();

        FeedStatus {
            total_units,
            running_units,
            paused_units: total_units - running_units,
            all_active: running_units == total_units,
        }
    }

    #[must_use]
    pub fn unit_info(&self, id: &str) -> FeedUnitInfo {
        if !self.feed.contains(id) {
            return FeedUnitInfo::missing(id);
        }
        FeedUnitInfo {
            id: id.to_string(),
            exists: true,
            running: self.feed.is_running(id),
            paused: self.feed.is_pause_requested(id),
        }
    }

    #[must_use]
    pub fn are_listeners_active(&self) -> bool {
        self.listeners_active.load(Ordering::SeqCst)
    }

    /// Hard-stop every running unit. Irreversible without a restart.
    ///
    /// Operator use only; the cutover failure path resumes instead.
    ///
    /// # Errors
    ///
    /// Returns the first unit failure.
    pub async fn emergency_stop_all(&self) -> Result<(), IngestionError> {
        error!(feed = self.feed.feed_name(), "Emergency stop of all feed units");
        let ids = self.feed.unit_ids();
        for id in &ids {
            if self.feed.is_running(id) {
                warn!(unit = %id, "Emergency stopping feed unit");
                self.feed.stop(id).await?;
            }
        }
        self.listeners_active.store(false, Ordering::SeqCst);
        error!(units = ids.len(), "Emergency stop completed");
        Ok(())
    }
}

impl std::fmt::Debug for IngestionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionController")
            .field("feed", &self.feed.feed_name())
            .field("listeners_active", &self.are_listeners_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::feed::{FeedCall, ScriptedFeed};

    fn controller(feed: &Arc<ScriptedFeed>) -> IngestionController {
        IngestionController::new(feed.clone())
    }

    #[tokio::test]
    async fn pause_all_then_resume_all() {
        let feed = Arc::new(ScriptedFeed::new(["a", "b"]));
        let controller = controller(&feed);

        controller.pause_all().await.unwrap();
        assert!(!controller.are_listeners_active());
        let status = controller.status();
        assert_eq!(status.total_units, 2);
        assert_eq!(status.paused_units, 2);
        assert!(!status.all_active);

        controller.resume_all().await.unwrap();
        assert!(controller.are_listeners_active());
        assert!(controller.status().all_active);
    }

    #[tokio::test]
    async fn pause_skips_stopped_units() {
        let feed = Arc::new(ScriptedFeed::new(["a", "b"]));
        feed.set_running("b", false);
        let controller = controller(&feed);

        controller.pause_all().await.unwrap();
        assert_eq!(feed.calls(), vec![FeedCall::Pause("a".into())]);
    }

    #[tokio::test]
    async fn unit_failure_aborts_pause_all() {
        let feed = Arc::new(ScriptedFeed::new(["a", "b", "c"]));
        feed.fail_pause("b");
        let controller = controller(&feed);

        let err = controller.pause_all().await.unwrap_err();
        assert!(matches!(err, IngestionError::Pause { ref unit, .. } if unit == "b"));
        assert!(controller.are_listeners_active());
        assert_eq!(
            feed.calls(),
            vec![FeedCall::Pause("a".into()), FeedCall::Pause("b".into())]
        );
    }

    #[tokio::test]
    async fn missing_units_are_skipped() {
        let feed = Arc::new(ScriptedFeed::new(["a"]));
        let controller = controller(&feed);

        controller.pause("nope").await.unwrap();
        controller.resume("nope").await.unwrap();
        assert!(feed.calls().is_empty());
        assert_eq!(controller.unit_info("nope"), FeedUnitInfo::missing("nope"));
    }

    #[tokio::test]
    async fn unit_info_reflects_pause() {
        let feed = Arc::new(ScriptedFeed::new(["a"]));
        let controller = controller(&feed);

        controller.pause("a").await.unwrap();
        let info = controller.unit_info("a");
        assert!(info.exists);
        assert!(info.running);
        assert!(info.paused);
    }

    #[tokio::test]
    async fn emergency_stop_stops_running_units() {
        let feed = Arc::new(ScriptedFeed::new(["a", "b"]));
        feed.set_running("a", false);
        let controller = controller(&feed);

        controller.emergency_stop_all().await.unwrap();
        assert!(!controller.are_listeners_active());
        assert_eq!(feed.calls(), vec![FeedCall::Stop("b".into())]);
        assert_eq!(controller.status().running_units, 0);
    }
}
