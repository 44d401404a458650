//! Feed subscription control port.

use async_trait::async_trait;

use crate::error::IngestionError;

/// Control surface over a set of named, independently pausable
/// message-consumption units.
///
/// Every operation must tolerate being called when the unit is already in
/// the target state. Operations on unknown ids return `Ok` and do nothing;
/// callers check [`FeedControl::contains`] first when they care.
#[async_trait]
pub trait FeedControl: Send + Sync {
    /// Ids of every registered unit.
    fn unit_ids(&self) -> Vec<String>;

    /// Whether a unit with this id is registered.
    fn contains(&self, id: &str) -> bool;

    /// Whether the unit has been started and not stopped.
    fn is_running(&self, id: &str) -> bool;

    /// Whether a pause has been requested and not yet resumed.
    fn is_pause_requested(&self, id: &str) -> bool;

    /// Stop consuming without losing buffered messages.
    async fn pause(&self, id: &str) -> Result<(), IngestionError>;

    /// Continue consuming after a pause.
    async fn resume(&self, id: &str) -> Result<(), IngestionError>;

    /// Hard stop. A stopped unit cannot be resumed without a restart.
    async fn stop(&self, id: &str) -> Result<(), IngestionError>;

    /// Transport name for logging.
    fn feed_name(&self) -> &'static str;
}
