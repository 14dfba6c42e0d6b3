//! 24x7 calendar grid for presenting a programme.
//!
//! The grid is indexed `time_slots[hour][day_of_week]` with Sunday = 0.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use super::context::RequestContext;
use super::error::ProgrammeResult;
use crate::db::repository::{FullRepository, StreamerRepository};
use crate::models::{
    ProgrammeEntry, Streamer, StreamerId, TvProgramme, DAYS_PER_WEEK, HOURS_PER_DAY,
};

/// One streamer's prediction inside a grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSlot {
    pub streamer_id: StreamerId,
    pub streamer_name: String,
    pub probability: f64,
}

pub type TimeSlotGrid = [[Vec<CalendarSlot>; DAYS_PER_WEEK]; HOURS_PER_DAY];

/// Presentation-ready calendar for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarView {
    pub week: DateTime<FixedOffset>,
    pub prev_week: DateTime<FixedOffset>,
    pub next_week: DateTime<FixedOffset>,
    pub streamer_map: BTreeMap<StreamerId, Streamer>,
    pub time_slots: TimeSlotGrid,
    pub is_custom: bool,
    pub is_guest_session: bool,
    pub generated_at: DateTime<Utc>,
}

impl CalendarView {
    /// Cell contents, or `None` for an out-of-range index.
    pub fn slot(&self, hour: usize, day_of_week: usize) -> Option<&[CalendarSlot]> {
        self.time_slots
            .get(hour)
            .and_then(|row| row.get(day_of_week))
            .map(Vec::as_slice)
    }

    pub fn slot_count(&self) -> usize {
        self.time_slots.iter().flatten().map(Vec::len).sum()
    }
}

#[derive(Clone)]
pub struct CalendarGridBuilder {
    repo: Arc<dyn FullRepository>,
}

impl CalendarGridBuilder {
    pub fn new(repo: Arc<dyn FullRepository>) -> Self {
        Self { repo }
    }

    /// Resolve streamer metadata for `programme` and lay its entries out as a grid.
    pub async fn build_calendar(
        &self,
        ctx: &RequestContext,
        programme: &TvProgramme,
    ) -> ProgrammeResult<CalendarView> {
        let ids = programme.streamer_ids();
        let streamers = ctx
            .run("get_streamers", self.repo.get_streamers(&ids))
            .await?;
        let streamer_map: BTreeMap<StreamerId, Streamer> = streamers
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        Ok(CalendarView {
            week: programme.week,
            prev_week: programme.prev_week,
            next_week: programme.next_week,
            time_slots: build_time_slot_grid(&programme.entries, &streamer_map),
            streamer_map,
            is_custom: programme.is_custom(),
            is_guest_session: programme.is_guest_session(),
            generated_at: programme.generated_at,
        })
    }
}

/// Place entries into the grid. Entries for unknown streamers or with an
/// out-of-range hour/day are dropped. Cells are ordered by probability
/// (highest first), then streamer ID.
pub fn build_time_slot_grid(
    entries: &[ProgrammeEntry],
    streamer_map: &BTreeMap<StreamerId, Streamer>,
) -> TimeSlotGrid {
    let mut grid: TimeSlotGrid =
        std::array::from_fn(|_| std::array::from_fn(|_| Vec::new()));

    for entry in entries {
        let (hour, day) = (entry.hour as usize, entry.day_of_week as usize);
        if hour >= HOURS_PER_DAY || day >= DAYS_PER_WEEK {
            continue;
        }
        let Some(streamer) = streamer_map.get(&entry.streamer_id) else {
            continue;
        };
        grid[hour][day].push(CalendarSlot {
            streamer_id: entry.streamer_id.clone(),
            streamer_name: streamer.display_name.clone(),
            probability: entry.probability,
        });
    }

    for cell in grid.iter_mut().flatten() {
        cell.sort_by(|a, b| {
            b.probability
                .total_cmp(&a.probability)
                .then_with(|| a.streamer_id.cmp(&b.streamer_id))
        });
    }
    grid
}
