//! Hour-of-day / day-of-week live probability marginals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::streamer::StreamerId;

pub const HOURS_PER_DAY: usize = 24;
pub const DAYS_PER_WEEK: usize = 7;

/// Derived live-activity distribution for one streamer.
///
/// `hours` and `days_of_week` are two independent marginals (days are indexed
/// from Sunday = 0). They are not a joint distribution; slot probabilities are
/// obtained by multiplying them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub streamer_id: StreamerId,
    pub hours: [f64; HOURS_PER_DAY],
    pub days_of_week: [f64; DAYS_PER_WEEK],
    /// Number of activity records the heatmap was generated from.
    pub data_points: usize,
    pub generated_at: DateTime<Utc>,
}

impl Heatmap {
    /// Probability of being live at `hour` on `day_of_week`, assuming independence.
    ///
    /// Out-of-range indices yield `0.0`.
    pub fn slot_probability(&self, day_of_week: usize, hour: usize) -> f64 {
        match (self.days_of_week.get(day_of_week), self.hours.get(hour)) {
            (Some(day), Some(h)) => day * h,
            _ => 0.0,
        }
    }

    /// Sum of the hour marginal.
    pub fn hour_mass(&self) -> f64 {
        self.hours.iter().sum()
    }

    /// Sum of the day-of-week marginal.
    pub fn day_mass(&self) -> f64 {
        self.days_of_week.iter().sum()
    }
}

/// Summary of a streamer's activity over the lookback window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    pub total_sessions: usize,
    pub average_session_duration: std::time::Duration,
    pub last_active: Option<DateTime<Utc>>,
    pub most_active_hour: u32,
    /// Sunday = 0.
    pub most_active_day: u32,
}
