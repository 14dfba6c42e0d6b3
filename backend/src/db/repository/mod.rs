//! Repository trait definitions for the stores this crate reads and writes.
//!
//! Each store capability is its own trait so implementations and test doubles
//! stay focused. The services depend only on these traits, never on a
//! concrete backend.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`activity`]: Append-only activity samples
//! - [`heatmap`]: Persisted heatmap rows
//! - [`follow`]: Follow edges and follower counts
//! - [`streamer`]: Streamer metadata
//! - [`custom_programme`]: User-curated streamer allow-lists
//!
//! # Convenience Trait Bound
//!
//! For code that needs every capability, use [`FullRepository`]:
//!
//! ```ignore
//! async fn seed<R: FullRepository>(repo: &R, activity: &NewActivity) -> RepositoryResult<()> {
//!     repo.append_activity(activity).await?;
//!     Ok(())
//! }
//! ```

pub mod activity;
pub mod custom_programme;
pub mod error;
pub mod follow;
pub mod heatmap;
pub mod streamer;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use activity::ActivityRepository;
pub use custom_programme::CustomProgrammeRepository;
pub use follow::FollowRepository;
pub use heatmap::HeatmapRepository;
pub use streamer::StreamerRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements every store trait.
pub trait FullRepository:
    ActivityRepository
    + HeatmapRepository
    + FollowRepository
    + StreamerRepository
    + CustomProgrammeRepository
{
}

// Blanket implementation: any type implementing all store traits is a FullRepository
impl<T> FullRepository for T where
    T: ActivityRepository
        + HeatmapRepository
        + FollowRepository
        + StreamerRepository
        + CustomProgrammeRepository
{
}
