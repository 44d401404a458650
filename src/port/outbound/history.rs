//! Historical movement source port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::RawMovement;
use crate::error::FetchError;

/// Secondary source of movements for dates the live feed missed.
#[async_trait]
pub trait HistoricalSource: Send + Sync {
    /// Fetch every movement recorded on `date`.
    ///
    /// Must fail rather than return a silently truncated list.
    async fn fetch(&self, date: NaiveDate) -> Result<Vec<RawMovement>, FetchError>;

    /// Source name for logging.
    fn source_name(&self) -> &'static str;
}
