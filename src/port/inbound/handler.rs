//! Movement handler port.

use async_trait::async_trait;

use crate::domain::RawMovement;

/// Receives every movement consumed by a feed unit.
///
/// Implementations absorb their own failures; a handler error must never
/// take the consuming unit down.
#[async_trait]
pub trait MovementHandler: Send + Sync {
    /// Handle one movement consumed by the unit named `unit`.
    async fn handle(&self, unit: &str, movement: RawMovement);
}
