//! Week boundaries for programme and calendar views.
//!
//! A programme week starts on Sunday at 00:00:00 in the time zone of the
//! timestamp it was derived from. Day arithmetic is done on the civil date,
//! so navigation keeps landing on midnight across DST transitions.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone};
use serde::{Deserialize, Serialize};

/// Direction for week navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDirection {
    Previous,
    Next,
    Current,
}

impl WeekDirection {
    /// Interpret a navigation query value.
    ///
    /// `"prev"`/`"previous"` and `"next"` are recognised (case-insensitive);
    /// anything else means the current week.
    pub fn from_query(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "prev" | "previous" => Self::Previous,
            "next" => Self::Next,
            _ => Self::Current,
        }
    }
}

/// Sunday 00:00:00 of the week containing `t`, in `t`'s time zone.
pub fn normalize_week_start<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let date = t.date_naive();
    let sunday = date - Days::new(u64::from(date.weekday().num_days_from_sunday()));
    start_of_day(&t.timezone(), sunday)
}

/// Week start one week before/after the normalized `week`, or the normalized
/// week itself for [`WeekDirection::Current`].
pub fn navigate_week<Tz: TimeZone>(week: &DateTime<Tz>, direction: WeekDirection) -> DateTime<Tz> {
    let start = normalize_week_start(week);
    let date = start.date_naive();
    match direction {
        WeekDirection::Previous => start_of_day(&start.timezone(), date - Days::new(7)),
        WeekDirection::Next => start_of_day(&start.timezone(), date + Days::new(7)),
        WeekDirection::Current => start,
    }
}

/// A normalized week start and its neighbours, each resolved in the caller's
/// zone and then pinned to the offset in force at that instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBounds {
    pub start: DateTime<FixedOffset>,
    pub prev: DateTime<FixedOffset>,
    pub next: DateTime<FixedOffset>,
}

impl WeekBounds {
    /// Bounds of the week containing `t`.
    pub fn of<Tz: TimeZone>(t: &DateTime<Tz>) -> Self {
        let start = normalize_week_start(t);
        Self {
            prev: pin_offset(&navigate_week(&start, WeekDirection::Previous)),
            next: pin_offset(&navigate_week(&start, WeekDirection::Next)),
            start: pin_offset(&start),
        }
    }
}

fn pin_offset<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<FixedOffset> {
    t.with_timezone(&t.offset().fix())
}

/// [`navigate_week`] driven by a raw query string.
pub fn navigate_week_str<Tz: TimeZone>(week: &DateTime<Tz>, direction: &str) -> DateTime<Tz> {
    navigate_week(week, WeekDirection::from_query(direction))
}

/// First instant of `date` in `tz`.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        // Midnight skipped by a DST jump: the day starts an hour later.
        .or_else(|| {
            tz.from_local_datetime(&(midnight + chrono::Duration::hours(1)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
