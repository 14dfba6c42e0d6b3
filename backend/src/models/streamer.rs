//! Streamers, users and user-curated custom programmes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::platform::Platform;

crate::define_key_type!(StreamerId);
crate::define_key_type!(UserId);

/// A content creator tracked by the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streamer {
    pub id: StreamerId,
    pub display_name: String,
    pub platform: Platform,
    /// Channel handle on the platform (login name, channel ID, slug).
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Ordered allow-list of streamers a user (or a guest session) wants to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomProgramme {
    pub id: String,
    /// Owner of the programme; `None` for guest/session-scoped programmes.
    pub user_id: Option<UserId>,
    pub streamer_ids: Vec<StreamerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomProgramme {
    /// True when the programme belongs to an anonymous session.
    pub fn is_guest(&self) -> bool {
        super::programme::is_guest_owner(self.user_id.as_ref())
    }

    /// True when at least one streamer is selected.
    pub fn has_streamers(&self) -> bool {
        !self.streamer_ids.is_empty()
    }
}

/// Insert payload for a custom programme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomProgramme {
    pub user_id: Option<UserId>,
    pub streamer_ids: Vec<StreamerId>,
    pub created_at: DateTime<Utc>,
}
