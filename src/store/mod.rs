pub mod postgrest;

pub use postgrest::PostgrestStore;

use crate::error::Result;
use crate::normalize::RawRecord;
use async_trait::async_trait;

/// Read-only access to the meter's tables
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeterStore: Send + Sync {
    /// The single most recent reading, newest by `time`
    async fn latest_reading(&self) -> Result<Option<RawRecord>>;

    /// Every prediction, oldest `created_at` first
    async fn predictions(&self) -> Result<Vec<RawRecord>>;
}
