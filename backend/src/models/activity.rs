//! Raw live-activity samples recorded for streamers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::platform::Platform;
use super::streamer::StreamerId;

crate::define_id_type!(i64, ActivityId);

/// One recorded activity interval. Immutable once stored.
///
/// Point-in-time live samples have `start_time == end_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub streamer_id: StreamerId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub platform: Option<Platform>,
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// Length of the interval; zero for point samples and inverted intervals.
    pub fn duration(&self) -> chrono::Duration {
        (self.end_time - self.start_time).max(chrono::Duration::zero())
    }
}

/// Insert payload for an activity record; the store assigns the ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    pub streamer_id: StreamerId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub platform: Option<Platform>,
    pub created_at: DateTime<Utc>,
}

impl NewActivity {
    /// A live sample observed at `timestamp`.
    pub fn sample(
        streamer_id: StreamerId,
        timestamp: DateTime<Utc>,
        platform: Option<Platform>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            streamer_id,
            start_time: timestamp,
            end_time: timestamp,
            platform,
            created_at,
        }
    }
}
