//! Custom programme repository trait: user-curated streamer allow-lists.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{CustomProgramme, NewCustomProgramme, UserId};

/// Repository trait for custom programmes, keyed by owning user.
#[async_trait]
pub trait CustomProgrammeRepository: Send + Sync {
    /// The custom programme owned by a user, if any.
    async fn get_custom_programme(
        &self,
        user_id: &UserId,
    ) -> RepositoryResult<Option<CustomProgramme>>;

    /// Lookup by programme ID (used for guest/session-scoped programmes).
    async fn get_custom_programme_by_id(
        &self,
        programme_id: &str,
    ) -> RepositoryResult<Option<CustomProgramme>>;

    /// Insert a custom programme; the store assigns the ID.
    async fn create_custom_programme(
        &self,
        programme: &NewCustomProgramme,
    ) -> RepositoryResult<CustomProgramme>;

    /// Overwrite an existing programme.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no programme has that ID
    async fn update_custom_programme(&self, programme: &CustomProgramme) -> RepositoryResult<()>;

    /// Delete a user's programme. Returns whether one existed.
    async fn delete_custom_programme(&self, user_id: &UserId) -> RepositoryResult<bool>;
}
