//! Feed unit status snapshots.

use serde::Serialize;

/// Coarse counts over all feed consumption units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedStatus {
    pub total_units: usize,
    pub running_units: usize,
    pub paused_units: usize,
    pub all_active: bool,
}

/// Detail for a single feed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedUnitInfo {
    pub id: String,
    pub exists: bool,
    pub running: bool,
    pub paused: bool,
}

impl FeedUnitInfo {
    #[must_use]
    pub fn missing(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exists: false,
            running: false,
            paused: false,
        }
    }
}
