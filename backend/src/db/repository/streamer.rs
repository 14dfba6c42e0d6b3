//! Streamer repository trait: streamer metadata lookups.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Streamer, StreamerId};

/// Repository trait for streamer metadata.
#[async_trait]
pub trait StreamerRepository: Send + Sync {
    /// Check if the store is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch one streamer.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the streamer doesn't exist
    async fn get_streamer(&self, streamer_id: &StreamerId) -> RepositoryResult<Streamer>;

    /// Fetch several streamers. Unknown IDs are omitted; input order is kept.
    async fn get_streamers(&self, streamer_ids: &[StreamerId]) -> RepositoryResult<Vec<Streamer>>;

    /// Enumerate streamers in the store's natural order, optionally capped.
    async fn list_streamers(&self, limit: Option<usize>) -> RepositoryResult<Vec<Streamer>>;
}
