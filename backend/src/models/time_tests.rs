use super::*;
use chrono::{FixedOffset, Timelike, Utc, Weekday};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

#[test]
fn test_monday_normalizes_to_previous_sunday() {
    let week = normalize_week_start(&utc(2024, 1, 15, 13, 45));
    assert_eq!(week, utc(2024, 1, 14, 0, 0));
}

#[test]
fn test_sunday_midnight_is_fixed_point() {
    let sunday = utc(2024, 1, 14, 0, 0);
    assert_eq!(normalize_week_start(&sunday), sunday);
}

#[test]
fn test_saturday_late_evening_stays_in_week() {
    let week = normalize_week_start(&utc(2024, 1, 20, 23, 59));
    assert_eq!(week, utc(2024, 1, 14, 0, 0));
}

#[test]
fn test_navigation_from_monday() {
    let monday = utc(2024, 1, 15, 9, 0);
    assert_eq!(
        navigate_week(&monday, WeekDirection::Previous),
        utc(2024, 1, 7, 0, 0)
    );
    assert_eq!(
        navigate_week(&monday, WeekDirection::Next),
        utc(2024, 1, 21, 0, 0)
    );
    assert_eq!(
        navigate_week(&monday, WeekDirection::Current),
        utc(2024, 1, 14, 0, 0)
    );
}

#[test]
fn test_direction_query_parsing() {
    assert_eq!(WeekDirection::from_query("prev"), WeekDirection::Previous);
    assert_eq!(WeekDirection::from_query("previous"), WeekDirection::Previous);
    assert_eq!(WeekDirection::from_query("NEXT"), WeekDirection::Next);
    assert_eq!(WeekDirection::from_query("sideways"), WeekDirection::Current);
    assert_eq!(WeekDirection::from_query(""), WeekDirection::Current);
}

#[test]
fn test_unknown_direction_returns_normalized_week() {
    let monday = utc(2024, 1, 15, 9, 0);
    assert_eq!(navigate_week_str(&monday, "later"), utc(2024, 1, 14, 0, 0));
}

#[test]
fn test_normalization_uses_local_calendar_day() {
    // 2024-01-14 02:00 UTC is still Saturday 2024-01-13 in UTC-5.
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let t = utc(2024, 1, 14, 2, 0).with_timezone(&offset);
    let week = normalize_week_start(&t);
    assert_eq!(week.weekday(), Weekday::Sun);
    assert_eq!(week.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
    assert_eq!(week.offset(), &offset);
}

#[test]
fn test_navigation_across_dst_lands_on_midnight() {
    // US DST starts 2024-03-10 (a Sunday).
    let tz = chrono_tz::America::New_York;
    let t = tz.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap();
    let next = navigate_week(&t, WeekDirection::Next);
    assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    assert_eq!((next.hour(), next.minute(), next.second()), (0, 0, 0));

    let back = navigate_week(&next, WeekDirection::Previous);
    assert_eq!(back, normalize_week_start(&t));
}
