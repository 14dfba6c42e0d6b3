#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use stream_programme::db::LocalRepository;
use stream_programme::models::{NewActivity, Platform, Streamer, StreamerId, UserId};
use stream_programme::services::{CalendarGridBuilder, FixedClock, ProgrammePredictor};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to process-global env
/// vars, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Reference "now" for all fixtures: Saturday 2024-06-01 12:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Monday 2024-01-15, used as the requested week.
pub fn week() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
}

pub fn streamer(id: &str) -> Streamer {
    Streamer {
        id: StreamerId::new(id),
        display_name: format!("{} Live", id),
        platform: Platform::Twitch,
        channel: id.to_lowercase(),
        avatar_url: None,
        created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
    }
}

/// Repository, clock and engines wired together against the reference time.
pub struct Fixture {
    pub repo: LocalRepository,
    pub clock: Arc<FixedClock>,
    pub predictor: ProgrammePredictor,
    pub calendar: CalendarGridBuilder,
}

impl Fixture {
    pub fn new() -> Self {
        let repo = LocalRepository::new();
        let clock = Arc::new(FixedClock::new(now()));
        let predictor = ProgrammePredictor::new(Arc::new(repo.clone()), clock.clone());
        let calendar = CalendarGridBuilder::new(Arc::new(repo.clone()));
        Self {
            repo,
            clock,
            predictor,
            calendar,
        }
    }

    /// Register a streamer with `count` daily samples at `hour` UTC, starting `days_ago` back.
    pub fn streamer_with_sessions(&self, id: &str, count: i64, days_ago: i64, hour: u32) {
        self.repo.add_streamer(streamer(id));
        self.sessions(id, count, days_ago, hour);
    }

    /// Add `count` daily samples at `hour` UTC, starting `days_ago` back.
    pub fn sessions(&self, id: &str, count: i64, days_ago: i64, hour: u32) {
        for i in 0..count {
            let day = (now() - Duration::days(days_ago + i)).date_naive();
            let ts = day.and_hms_opt(hour, 0, 0).unwrap().and_utc();
            self.repo
                .insert_activity(&NewActivity::sample(StreamerId::new(id), ts, None, ts));
        }
    }

    /// Add samples every 7 days at `hour` UTC so they all land on one weekday.
    pub fn weekly_sessions(&self, id: &str, count: i64, days_ago: i64, hour: u32) {
        for i in 0..count {
            let day = (now() - Duration::days(days_ago + 7 * i)).date_naive();
            let ts = day.and_hms_opt(hour, 0, 0).unwrap().and_utc();
            self.repo
                .insert_activity(&NewActivity::sample(StreamerId::new(id), ts, None, ts));
        }
    }

    pub fn follow(&self, user: &str, streamer: &str) {
        self.repo
            .add_follow(&UserId::new(user), StreamerId::new(streamer));
    }
}
