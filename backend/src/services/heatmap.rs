//! Activity history to hour-of-day / day-of-week probability marginals.
//!
//! A heatmap is recomputed wholesale from the last [`LOOKBACK_DAYS`] of
//! activity. Samples are split into a recent window (the last
//! [`RECENT_WINDOW_DAYS`]) and an older window; each bin is
//! `RECENT_WEIGHT * recent_share + OLDER_WEIGHT * older_share`. There is no
//! renormalisation, so when only one window has samples the marginals sum to
//! that window's weight.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use chrono_tz::Tz;
use log::debug;

use super::clock::Clock;
use super::context::RequestContext;
use super::error::{ProgrammeError, ProgrammeResult};
use crate::db::repository::{ActivityRepository, FullRepository, HeatmapRepository};
use crate::models::{
    ActivityRecord, ActivityStats, Heatmap, NewActivity, Platform, StreamerId, DAYS_PER_WEEK,
    HOURS_PER_DAY,
};

pub const LOOKBACK_DAYS: i64 = 365;
pub const RECENT_WINDOW_DAYS: i64 = 90;
pub const RECENT_WEIGHT: f64 = 0.8;
pub const OLDER_WEIGHT: f64 = 0.2;

/// Generates, persists and summarises per-streamer heatmaps.
#[derive(Clone)]
pub struct HeatmapEngine {
    repo: Arc<dyn FullRepository>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
}

impl HeatmapEngine {
    /// Engine binning activity in UTC.
    pub fn new(repo: Arc<dyn FullRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            timezone: Tz::UTC,
        }
    }

    /// Bin hours and weekdays in `timezone` instead of UTC.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn repository(&self) -> &Arc<dyn FullRepository> {
        &self.repo
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Recompute a streamer's heatmap from the lookback window and upsert it.
    pub async fn generate_heatmap(
        &self,
        ctx: &RequestContext,
        streamer_id: &StreamerId,
    ) -> ProgrammeResult<Heatmap> {
        ensure_streamer_id(streamer_id)?;

        let now = self.clock.now();
        let records = self.lookback_records(ctx, streamer_id, now).await?;
        let heatmap = compute_heatmap(streamer_id, &records, now, &self.timezone)
            .ok_or_else(|| ProgrammeError::insufficient_data(streamer_id))?;

        self.upsert_heatmap(ctx, &heatmap).await?;
        debug!(
            "Generated heatmap for {} from {} samples",
            streamer_id, heatmap.data_points
        );
        Ok(heatmap)
    }

    /// Session summary over the lookback window. No history yields zeroed stats.
    pub async fn activity_stats(
        &self,
        ctx: &RequestContext,
        streamer_id: &StreamerId,
    ) -> ProgrammeResult<ActivityStats> {
        ensure_streamer_id(streamer_id)?;

        let now = self.clock.now();
        let records = self.lookback_records(ctx, streamer_id, now).await?;
        Ok(compute_activity_stats(&records, &self.timezone))
    }

    /// Append a point-in-time live sample (start == end == `timestamp`).
    pub async fn record_activity(
        &self,
        ctx: &RequestContext,
        streamer_id: &StreamerId,
        timestamp: DateTime<Utc>,
    ) -> ProgrammeResult<ActivityRecord> {
        self.append_sample(ctx, streamer_id, timestamp, None).await
    }

    /// Same as [`record_activity`](Self::record_activity), tagged with the platform it was seen on.
    pub async fn record_platform_activity(
        &self,
        ctx: &RequestContext,
        streamer_id: &StreamerId,
        platform: Platform,
        timestamp: DateTime<Utc>,
    ) -> ProgrammeResult<ActivityRecord> {
        self.append_sample(ctx, streamer_id, timestamp, Some(platform))
            .await
    }

    /// Last persisted heatmap, without recomputing.
    pub async fn stored_heatmap(
        &self,
        ctx: &RequestContext,
        streamer_id: &StreamerId,
    ) -> ProgrammeResult<Heatmap> {
        ensure_streamer_id(streamer_id)?;

        ctx.run("get_heatmap", self.repo.get_heatmap(streamer_id))
            .await?
            .ok_or_else(|| {
                ProgrammeError::NotFound(format!("Heatmap for streamer {} not found", streamer_id))
            })
    }

    async fn append_sample(
        &self,
        ctx: &RequestContext,
        streamer_id: &StreamerId,
        timestamp: DateTime<Utc>,
        platform: Option<Platform>,
    ) -> ProgrammeResult<ActivityRecord> {
        ensure_streamer_id(streamer_id)?;

        let sample = NewActivity::sample(streamer_id.clone(), timestamp, platform, self.clock.now());
        ctx.run("append_activity", self.repo.append_activity(&sample))
            .await
    }

    async fn lookback_records(
        &self,
        ctx: &RequestContext,
        streamer_id: &StreamerId,
        now: DateTime<Utc>,
    ) -> ProgrammeResult<Vec<ActivityRecord>> {
        let since = now - Duration::days(LOOKBACK_DAYS);
        ctx.run(
            "activities_since",
            self.repo.activities_since(streamer_id, since),
        )
        .await
    }

    // Last writer wins on concurrent upserts.
    async fn upsert_heatmap(&self, ctx: &RequestContext, heatmap: &Heatmap) -> ProgrammeResult<()> {
        let existing = ctx
            .run("get_heatmap", self.repo.get_heatmap(&heatmap.streamer_id))
            .await?;

        match existing {
            Some(_) => {
                ctx.run("update_heatmap", self.repo.update_heatmap(heatmap))
                    .await
            }
            None => {
                ctx.run("create_heatmap", self.repo.create_heatmap(heatmap))
                    .await
            }
        }
    }
}

pub(crate) fn ensure_streamer_id(streamer_id: &StreamerId) -> ProgrammeResult<()> {
    if streamer_id.is_blank() {
        return Err(ProgrammeError::invalid_input("streamer ID must not be empty"));
    }
    Ok(())
}

/// Build the weighted marginals from raw records, or `None` if the lookback window is empty.
pub(crate) fn compute_heatmap(
    streamer_id: &StreamerId,
    records: &[ActivityRecord],
    now: DateTime<Utc>,
    timezone: &Tz,
) -> Option<Heatmap> {
    let lookback_start = now - Duration::days(LOOKBACK_DAYS);
    let recent_start = now - Duration::days(RECENT_WINDOW_DAYS);

    let mut recent_hours = [0usize; HOURS_PER_DAY];
    let mut recent_days = [0usize; DAYS_PER_WEEK];
    let mut older_hours = [0usize; HOURS_PER_DAY];
    let mut older_days = [0usize; DAYS_PER_WEEK];
    let mut total_recent = 0usize;
    let mut total_older = 0usize;

    for record in records.iter().filter(|r| r.start_time >= lookback_start) {
        let (hour, day) = local_bins(record.start_time, timezone);
        if record.start_time >= recent_start {
            recent_hours[hour] += 1;
            recent_days[day] += 1;
            total_recent += 1;
        } else {
            older_hours[hour] += 1;
            older_days[day] += 1;
            total_older += 1;
        }
    }

    if total_recent + total_older == 0 {
        return None;
    }

    let mut hours = [0.0; HOURS_PER_DAY];
    for (h, value) in hours.iter_mut().enumerate() {
        *value = weighted(recent_hours[h], total_recent, older_hours[h], total_older);
    }
    let mut days_of_week = [0.0; DAYS_PER_WEEK];
    for (d, value) in days_of_week.iter_mut().enumerate() {
        *value = weighted(recent_days[d], total_recent, older_days[d], total_older);
    }

    Some(Heatmap {
        streamer_id: streamer_id.clone(),
        hours,
        days_of_week,
        data_points: total_recent + total_older,
        generated_at: now,
    })
}

fn weighted(recent: usize, total_recent: usize, older: usize, total_older: usize) -> f64 {
    RECENT_WEIGHT * share(recent, total_recent) + OLDER_WEIGHT * share(older, total_older)
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Hour of day and day of week (Sunday = 0) of `instant` in `timezone`.
fn local_bins(instant: DateTime<Utc>, timezone: &Tz) -> (usize, usize) {
    let local = instant.with_timezone(timezone);
    (
        local.hour() as usize,
        local.weekday().num_days_from_sunday() as usize,
    )
}

pub(crate) fn compute_activity_stats(records: &[ActivityRecord], timezone: &Tz) -> ActivityStats {
    if records.is_empty() {
        return ActivityStats::default();
    }

    let mut hour_counts = [0usize; HOURS_PER_DAY];
    let mut day_counts = [0usize; DAYS_PER_WEEK];
    for record in records {
        let (hour, day) = local_bins(record.start_time, timezone);
        hour_counts[hour] += 1;
        day_counts[day] += 1;
    }

    let total_millis: i64 = records.iter().map(|r| r.duration().num_milliseconds()).sum();
    let average_millis = total_millis / records.len() as i64;

    ActivityStats {
        total_sessions: records.len(),
        average_session_duration: std::time::Duration::from_millis(average_millis.max(0) as u64),
        last_active: records.iter().map(|r| r.end_time).max(),
        most_active_hour: first_argmax(&hour_counts) as u32,
        most_active_day: first_argmax(&day_counts) as u32,
    }
}

/// Index of the strict maximum; ties keep the lowest index.
pub(crate) fn first_argmax<T: PartialOrd + Copy>(values: &[T]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
#[path = "heatmap_tests.rs"]
mod heatmap_tests;
