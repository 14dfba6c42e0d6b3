//! Heatmap repository trait: one persisted heatmap row per streamer.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Heatmap, StreamerId};

/// Repository trait for generated heatmaps.
///
/// The services upsert through `get_heatmap` followed by `create_heatmap` or
/// `update_heatmap`; implementations need not make that sequence atomic.
#[async_trait]
pub trait HeatmapRepository: Send + Sync {
    /// Fetch the stored heatmap for a streamer, if one was ever generated.
    async fn get_heatmap(&self, streamer_id: &StreamerId) -> RepositoryResult<Option<Heatmap>>;

    /// Insert a heatmap row.
    async fn create_heatmap(&self, heatmap: &Heatmap) -> RepositoryResult<()>;

    /// Overwrite an existing heatmap row.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no row exists for the streamer
    async fn update_heatmap(&self, heatmap: &Heatmap) -> RepositoryResult<()>;
}
