//! Infrastructure bootstrap helpers for runtime wiring.
//!
//! The composition root: builds the classifier, processing pipeline, record
//! store, feed, and cutover orchestrator from a [`Config`].

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::feed::ChannelFeed;
use crate::adapter::outbound::history::HistoricalApiClient;
use crate::adapter::outbound::memory::MemoryMovementStore;
use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::store::SqliteMovementStore;
use crate::application::cutover::CutoverOrchestrator;
use crate::application::ingestion::IngestionController;
use crate::application::location::LocationClassifier;
use crate::application::movement::{
    LiveIngestService, MovementProcessor, MovementResolver, MovementValidator,
};
use crate::error::Result;
use crate::infrastructure::config::cutover::CutoverConfig;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::history::HistoricalSource;
use crate::port::outbound::store::MovementStore;

/// Open the configured record store, running migrations for SQLite.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub fn build_store(config: &Config) -> Result<Arc<dyn MovementStore>> {
    if config.uses_memory_store() {
        info!("Using in-memory record store");
        return Ok(Arc::new(MemoryMovementStore::new()));
    }

    let pool = create_pool(&config.database)?;
    run_migrations(&pool)?;
    info!(database = %config.database, "Opened SQLite record store");
    Ok(Arc::new(SqliteMovementStore::new(pool)))
}

/// Classifier seeded from the configured known locations.
#[must_use]
pub fn build_classifier(config: &Config) -> Arc<LocationClassifier> {
    Arc::new(LocationClassifier::new(&config.location))
}

/// Resolver and validator sharing one classifier.
#[must_use]
pub fn build_processor(config: &Config, classifier: &Arc<LocationClassifier>) -> MovementProcessor {
    MovementProcessor::new(
        MovementResolver::new(Arc::clone(classifier)),
        MovementValidator::with_classifier(config.validation.clone(), Arc::clone(classifier)),
    )
}

/// Cutover orchestrator backed by the historical API client.
#[must_use]
pub fn build_cutover(
    config: &CutoverConfig,
    ingestion: Arc<IngestionController>,
    store: Arc<dyn MovementStore>,
    processor: Arc<MovementProcessor>,
) -> CutoverOrchestrator {
    let source: Arc<dyn HistoricalSource> = Arc::new(HistoricalApiClient::from_config(&config.api));
    CutoverOrchestrator::new(config.clone(), ingestion, source, store, processor)
}

/// Every long-lived component of a running process.
pub struct Runtime {
    pub config: Config,
    pub classifier: Arc<LocationClassifier>,
    pub processor: Arc<MovementProcessor>,
    pub store: Arc<dyn MovementStore>,
    pub feed: Arc<ChannelFeed>,
    pub ingestion: Arc<IngestionController>,
}

impl Runtime {
    /// Wire every component. Feed units are registered but not started.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store cannot be opened.
    pub fn build(config: Config) -> Result<Self> {
        let store = build_store(&config)?;
        let classifier = build_classifier(&config);
        let processor = Arc::new(build_processor(&config, &classifier));

        let handler = Arc::new(LiveIngestService::new(
            Arc::clone(&processor),
            Arc::clone(&store),
        ));
        let feed = Arc::new(ChannelFeed::new(
            config.feed.units.iter().cloned(),
            config.feed.channel_capacity,
            handler,
        ));
        let ingestion = Arc::new(IngestionController::new(feed.clone()));

        info!(
            units = config.feed.units.len(),
            store = store.store_name(),
            known_locations = classifier.cache_statistics().known_locations,
            "Runtime wired"
        );

        Ok(Self {
            config,
            classifier,
            processor,
            store,
            feed,
            ingestion,
        })
    }

    /// Cutover orchestrator over this runtime's feed and store.
    #[must_use]
    pub fn cutover(&self, config: &CutoverConfig) -> CutoverOrchestrator {
        build_cutover(
            config,
            Arc::clone(&self.ingestion),
            Arc::clone(&self.store),
            Arc::clone(&self.processor),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocationType, MovementFilter};
    use crate::port::outbound::feed::FeedControl;
    use crate::testkit::config::memory_config;
    use crate::testkit::domain::normal_movement;

    #[tokio::test]
    async fn memory_runtime_ingests_published_movements() {
        let runtime = Runtime::build(memory_config()).unwrap();
        assert_eq!(runtime.store.store_name(), "memory");

        runtime.feed.start();
        let publisher = runtime.feed.publisher("movement-events").unwrap();
        publisher.publish(normal_movement()).await.unwrap();
        drop(publisher);
        runtime.feed.drain().await;

        let stored = runtime.store.query(&MovementFilter::default()).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(!stored[0].is_historical);
    }

    #[tokio::test]
    async fn sqlite_runtime_opens_migrated_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = memory_config();
        config.database = dir.path().join("waybill.db").to_string_lossy().to_string();

        let runtime = Runtime::build(config).unwrap();

        assert_eq!(runtime.store.store_name(), "sqlite");
        assert_eq!(runtime.store.statistics().await.unwrap().total_count, 0);
    }

    #[test]
    fn classifier_uses_configured_locations() {
        let mut config = memory_config();
        config.location.known.insert("4242".into(), LocationType::Store);

        let runtime = Runtime::build(config).unwrap();

        assert_eq!(runtime.classifier.classify("4242"), LocationType::Store);
        assert_eq!(runtime.feed.unit_ids(), vec!["movement-events".to_string()]);
    }
}
