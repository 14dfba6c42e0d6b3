//! Predicted schedule slots and the programmes assembled from them.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::streamer::{StreamerId, UserId};

/// One predicted live slot for a streamer. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgrammeEntry {
    pub streamer_id: StreamerId,
    /// Sunday = 0.
    pub day_of_week: u32,
    pub hour: u32,
    pub probability: f64,
}

/// Most probable hour for one streamer on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedSlot {
    pub streamer_id: StreamerId,
    pub day_of_week: u32,
    pub hour: u32,
    pub probability: f64,
}

/// Which streamer universe a programme was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgrammeSource {
    /// Streamers followed by a user.
    Followed { user_id: UserId },
    /// A user- or guest-curated allow-list.
    Custom {
        programme_id: String,
        user_id: Option<UserId>,
    },
    /// Top streamers ranked by follower count.
    Global { limit: usize },
}

/// Week-shaped predicted schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvProgramme {
    pub source: ProgrammeSource,
    /// Sunday 00:00:00 starting the programme's week, in the caller's offset.
    pub week: DateTime<FixedOffset>,
    /// Neighbouring week starts, each in the offset local midnight had then.
    pub prev_week: DateTime<FixedOffset>,
    pub next_week: DateTime<FixedOffset>,
    pub entries: Vec<ProgrammeEntry>,
    pub generated_at: DateTime<Utc>,
}

impl TvProgramme {
    /// True for programmes built from a custom streamer list.
    pub fn is_custom(&self) -> bool {
        matches!(self.source, ProgrammeSource::Custom { .. })
    }

    /// True for custom programmes that belong to an anonymous session.
    pub fn is_guest_session(&self) -> bool {
        match &self.source {
            ProgrammeSource::Custom { user_id, .. } => is_guest_owner(user_id.as_ref()),
            _ => false,
        }
    }

    /// Distinct streamer IDs appearing in the entries, in first-seen order.
    pub fn streamer_ids(&self) -> Vec<StreamerId> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.streamer_id.clone()))
            .map(|e| e.streamer_id.clone())
            .collect()
    }
}

/// A programme owner that is absent or blank marks an anonymous session.
pub(crate) fn is_guest_owner(user_id: Option<&UserId>) -> bool {
    user_id.map_or(true, UserId::is_blank)
}
