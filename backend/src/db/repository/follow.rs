//! Follow repository trait: user → streamer follow edges.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{StreamerId, UserId};

/// Repository trait for follow relationships.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Streamers followed by a user.
    ///
    /// # Returns
    /// * `Ok(Vec<StreamerId>)` - Possibly empty
    /// * `Err(RepositoryError::NotFound)` - If the user does not exist
    async fn followed_streamers(&self, user_id: &UserId) -> RepositoryResult<Vec<StreamerId>>;

    /// Number of users following a streamer.
    async fn follower_count(&self, streamer_id: &StreamerId) -> RepositoryResult<u64>;
}
