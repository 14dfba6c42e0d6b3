//! Error taxonomy for the programme engines.

use thiserror::Error;

use crate::db::repository::RepositoryError;
use crate::models::StreamerId;

/// Errors surfaced by the heatmap, programme, calendar and ranking services.
#[derive(Debug, Error)]
pub enum ProgrammeError {
    /// Rejected before any store access (blank IDs, day out of range).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The streamer has no activity in the lookback window.
    #[error("Insufficient activity data for streamer {streamer_id}")]
    InsufficientData { streamer_id: StreamerId },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store failure: {0}")]
    StoreFailure(#[source] RepositoryError),
}

impl ProgrammeError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn insufficient_data(streamer_id: &StreamerId) -> Self {
        Self::InsufficientData {
            streamer_id: streamer_id.clone(),
        }
    }

    /// True for a store call aborted by caller cancellation or a deadline.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::StoreFailure(e) if e.is_cancellation())
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

impl From<RepositoryError> for ProgrammeError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { message, .. } => Self::NotFound(message),
            other => Self::StoreFailure(other),
        }
    }
}

/// Result type for service operations.
pub type ProgrammeResult<T> = Result<T, ProgrammeError>;
