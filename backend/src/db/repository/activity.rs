//! Activity repository trait: append-only store of live-activity samples.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::models::{ActivityRecord, NewActivity, StreamerId};

/// Repository trait for raw activity records.
///
/// Records are immutable once written; the store only appends and queries.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append one activity record.
    ///
    /// # Returns
    /// * `Ok(ActivityRecord)` - The stored record including its assigned ID
    /// * `Err(RepositoryError)` - If the operation fails
    async fn append_activity(&self, activity: &NewActivity) -> RepositoryResult<ActivityRecord>;

    /// All records for a streamer whose `start_time` is at or after `since`.
    ///
    /// Unknown streamers yield an empty list, not an error.
    async fn activities_since(
        &self,
        streamer_id: &StreamerId,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<ActivityRecord>>;
}
