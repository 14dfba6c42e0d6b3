//! Programme prediction: heatmaps composed into weekly slot lists.
//!
//! Every variant applies the same slot rule to each streamer's heatmap: a day
//! qualifies when its marginal exceeds [`DAY_THRESHOLD`], and an hour on that
//! day when `day * hour` exceeds [`SLOT_THRESHOLD`]. Batch variants skip
//! streamers without history or whose lookups fail; a cancelled request fails
//! the whole call.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use log::{debug, info, warn};

use super::clock::Clock;
use super::context::RequestContext;
use super::error::{ProgrammeError, ProgrammeResult};
use super::heatmap::{ensure_streamer_id, first_argmax, HeatmapEngine};
use super::ranking::FollowerRanker;
use crate::db::repo_config::ProgrammeConfig;
use crate::db::repository::{
    CustomProgrammeRepository, FollowRepository, FullRepository, RepositoryError,
    StreamerRepository,
};
use crate::models::{
    CustomProgramme, Heatmap, NewCustomProgramme, PredictedSlot,
    ProgrammeEntry, ProgrammeSource, StreamerId, TvProgramme, UserId, WeekBounds,
    DAYS_PER_WEEK, HOURS_PER_DAY,
};

pub const DAY_THRESHOLD: f64 = 0.10;
pub const SLOT_THRESHOLD: f64 = 0.05;

#[derive(Clone)]
pub struct ProgrammePredictor {
    repo: Arc<dyn FullRepository>,
    clock: Arc<dyn Clock>,
    heatmaps: HeatmapEngine,
    ranker: FollowerRanker,
}

impl ProgrammePredictor {
    pub fn new(repo: Arc<dyn FullRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            heatmaps: HeatmapEngine::new(repo.clone(), clock.clone()),
            ranker: FollowerRanker::new(repo.clone()),
            repo,
            clock,
        }
    }

    /// Build a predictor with the engine settings from `config`.
    pub fn from_config(
        repo: Arc<dyn FullRepository>,
        clock: Arc<dyn Clock>,
        config: &ProgrammeConfig,
    ) -> Result<Self, RepositoryError> {
        Ok(Self::new(repo, clock)
            .with_timezone(config.timezone()?)
            .with_global_limit(config.global_limit()))
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.heatmaps = self.heatmaps.with_timezone(timezone);
        self
    }

    pub fn with_global_limit(mut self, limit: usize) -> Self {
        self.ranker = self.ranker.with_default_limit(limit);
        self
    }

    pub fn heatmaps(&self) -> &HeatmapEngine {
        &self.heatmaps
    }

    pub fn ranker(&self) -> &FollowerRanker {
        &self.ranker
    }

    /// Programme for the streamers `user_id` follows.
    pub async fn generate_programme<Z: TimeZone>(
        &self,
        ctx: &RequestContext,
        user_id: &UserId,
        week: &DateTime<Z>,
    ) -> ProgrammeResult<TvProgramme> {
        if user_id.is_blank() {
            return Err(ProgrammeError::invalid_input("user ID must not be empty"));
        }
        let week = canonical_week(week);

        let followed = ctx
            .run("followed_streamers", self.repo.followed_streamers(user_id))
            .await?;
        let entries = self.collect_entries(ctx, &followed).await?;

        info!(
            "Generated programme for {}: {} streamers, {} entries",
            user_id,
            followed.len(),
            entries.len()
        );
        Ok(self.assemble(
            ProgrammeSource::Followed {
                user_id: user_id.clone(),
            },
            week,
            entries,
        ))
    }

    /// Most probable hour for `streamer_id` on `day_of_week` (Sunday = 0).
    pub async fn predicted_live_time(
        &self,
        ctx: &RequestContext,
        streamer_id: &StreamerId,
        day_of_week: u32,
    ) -> ProgrammeResult<PredictedSlot> {
        ensure_streamer_id(streamer_id)?;
        if day_of_week as usize >= DAYS_PER_WEEK {
            return Err(ProgrammeError::invalid_input(format!(
                "day of week must be in 0..=6, got {}",
                day_of_week
            )));
        }

        let heatmap = self.heatmaps.generate_heatmap(ctx, streamer_id).await?;
        let day = day_of_week as usize;
        let products: Vec<f64> = (0..HOURS_PER_DAY)
            .map(|hour| heatmap.slot_probability(day, hour))
            .collect();
        let hour = first_argmax(&products);

        Ok(PredictedSlot {
            streamer_id: streamer_id.clone(),
            day_of_week,
            hour: hour as u32,
            probability: products[hour],
        })
    }

    /// Calendar restricted to exactly the streamers listed in `programme`.
    pub async fn generate_calendar_from_programme<Z: TimeZone>(
        &self,
        ctx: &RequestContext,
        programme: &CustomProgramme,
        week: &DateTime<Z>,
    ) -> ProgrammeResult<TvProgramme> {
        let week = canonical_week(week);

        let mut members = Vec::new();
        let mut seen = HashSet::new();
        for id in &programme.streamer_ids {
            if id.is_blank() || !seen.insert(id.clone()) {
                continue;
            }
            match ctx.run("get_streamer", self.repo.get_streamer(id)).await {
                Ok(streamer) => members.push(streamer.id),
                Err(e) if e.is_cancellation() || ctx.is_cancelled() => {
                    return Err(ctx.interrupted("get_streamer", e))
                }
                Err(e) => debug!("Skipping unresolved streamer {}: {}", id, e),
            }
        }

        let entries = self.collect_entries(ctx, &members).await?;
        info!(
            "Generated custom programme {}: {} of {} streamers resolved, {} entries",
            programme.id,
            members.len(),
            programme.streamer_ids.len(),
            entries.len()
        );
        Ok(self.assemble(
            ProgrammeSource::Custom {
                programme_id: programme.id.clone(),
                user_id: programme.user_id.clone(),
            },
            week,
            entries,
        ))
    }

    /// Programme for the `limit` most-followed streamers (`0` = default limit).
    pub async fn generate_global_programme<Z: TimeZone>(
        &self,
        ctx: &RequestContext,
        week: &DateTime<Z>,
        limit: usize,
    ) -> ProgrammeResult<TvProgramme> {
        let week = canonical_week(week);
        let limit = self.ranker.effective_limit(limit);

        let ranked = self.ranker.ranked_streamers(ctx, limit).await?;
        let ids: Vec<StreamerId> = ranked.into_iter().map(|r| r.streamer.id).collect();
        let entries = self.collect_entries(ctx, &ids).await?;

        info!(
            "Generated global programme: {} streamers, {} entries",
            ids.len(),
            entries.len()
        );
        Ok(self.assemble(ProgrammeSource::Global { limit }, week, entries))
    }

    /// The user's custom calendar when it has streamers, otherwise the global programme.
    pub async fn programme_view<Z: TimeZone>(
        &self,
        ctx: &RequestContext,
        user_id: &UserId,
        week: &DateTime<Z>,
    ) -> ProgrammeResult<TvProgramme> {
        if !user_id.is_blank() {
            match ctx
                .run(
                    "get_custom_programme",
                    self.repo.get_custom_programme(user_id),
                )
                .await
            {
                Ok(Some(programme)) if programme.has_streamers() => {
                    return self
                        .generate_calendar_from_programme(ctx, &programme, week)
                        .await;
                }
                Ok(_) => {}
                Err(e) if e.is_cancellation() || ctx.is_cancelled() => {
                    return Err(ctx.interrupted("get_custom_programme", e))
                }
                Err(e) => warn!(
                    "Custom programme lookup for {} failed, using global programme: {}",
                    user_id, e
                ),
            }
        }

        self.generate_global_programme(ctx, week, 0).await
    }

    /// Create or replace the user's custom programme.
    ///
    /// IDs are trimmed and de-duplicated keeping the first occurrence. An
    /// empty list is allowed and makes the view fall back to the global programme.
    pub async fn save_custom_programme(
        &self,
        ctx: &RequestContext,
        user_id: &UserId,
        streamer_ids: &[StreamerId],
    ) -> ProgrammeResult<CustomProgramme> {
        if user_id.is_blank() {
            return Err(ProgrammeError::invalid_input("user ID must not be empty"));
        }
        let streamer_ids = clean_streamer_ids(streamer_ids)?;
        let now = self.clock.now();

        let existing = ctx
            .run(
                "get_custom_programme",
                self.repo.get_custom_programme(user_id),
            )
            .await?;

        match existing {
            Some(mut programme) => {
                programme.streamer_ids = streamer_ids;
                programme.updated_at = now;
                ctx.run(
                    "update_custom_programme",
                    self.repo.update_custom_programme(&programme),
                )
                .await?;
                Ok(programme)
            }
            None => {
                let new = NewCustomProgramme {
                    user_id: Some(user_id.clone()),
                    streamer_ids,
                    created_at: now,
                };
                ctx.run(
                    "create_custom_programme",
                    self.repo.create_custom_programme(&new),
                )
                .await
            }
        }
    }

    /// Remove the user's custom programme. Returns whether one existed.
    pub async fn delete_custom_programme(
        &self,
        ctx: &RequestContext,
        user_id: &UserId,
    ) -> ProgrammeResult<bool> {
        if user_id.is_blank() {
            return Err(ProgrammeError::invalid_input("user ID must not be empty"));
        }
        ctx.run(
            "delete_custom_programme",
            self.repo.delete_custom_programme(user_id),
        )
        .await
    }

    async fn collect_entries(
        &self,
        ctx: &RequestContext,
        streamer_ids: &[StreamerId],
    ) -> ProgrammeResult<Vec<ProgrammeEntry>> {
        let mut entries = Vec::new();
        for id in streamer_ids {
            match self.heatmaps.generate_heatmap(ctx, id).await {
                Ok(heatmap) => entries.extend(slot_entries(&heatmap)),
                Err(e) if e.is_cancellation() || ctx.is_cancelled() => {
                    return Err(ctx.interrupted("generate_heatmap", e))
                }
                Err(e) if e.is_insufficient_data() => {
                    debug!("Skipping {}: no activity history", id)
                }
                Err(e) => warn!("Skipping {}: {}", id, e),
            }
        }
        Ok(entries)
    }

    fn assemble(
        &self,
        source: ProgrammeSource,
        week: WeekBounds,
        entries: Vec<ProgrammeEntry>,
    ) -> TvProgramme {
        TvProgramme {
            source,
            week: week.start,
            prev_week: week.prev,
            next_week: week.next,
            entries,
            generated_at: self.clock.now(),
        }
    }
}

/// Slots of one heatmap that pass the day and slot thresholds.
pub(crate) fn slot_entries(heatmap: &Heatmap) -> Vec<ProgrammeEntry> {
    let mut entries = Vec::new();
    for (day, day_p) in heatmap.days_of_week.iter().enumerate() {
        if *day_p <= DAY_THRESHOLD {
            continue;
        }
        for (hour, hour_p) in heatmap.hours.iter().enumerate() {
            let probability = day_p * hour_p;
            if probability > SLOT_THRESHOLD {
                entries.push(ProgrammeEntry {
                    streamer_id: heatmap.streamer_id.clone(),
                    day_of_week: day as u32,
                    hour: hour as u32,
                    probability,
                });
            }
        }
    }
    entries
}

/// Week bounds resolved in the caller's zone before the zone is reduced to offsets.
pub(crate) fn canonical_week<Z: TimeZone>(week: &DateTime<Z>) -> WeekBounds {
    WeekBounds::of(week)
}

fn clean_streamer_ids(streamer_ids: &[StreamerId]) -> ProgrammeResult<Vec<StreamerId>> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(streamer_ids.len());
    for id in streamer_ids {
        let trimmed = id.as_str().trim();
        if trimmed.is_empty() {
            return Err(ProgrammeError::invalid_input(
                "custom programme contains an empty streamer ID",
            ));
        }
        if seen.insert(trimmed.to_string()) {
            cleaned.push(StreamerId::new(trimmed));
        }
    }
    Ok(cleaned)
}

#[cfg(test)]
#[path = "programme_tests.rs"]
mod programme_tests;
