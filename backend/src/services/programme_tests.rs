#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Timelike, Utc, Weekday};

    use crate::db::repositories::LocalRepository;
    use crate::models::{Heatmap, NewActivity, StreamerId, UserId};
    use crate::services::clock::FixedClock;
    use crate::services::programme::{
        canonical_week, clean_streamer_ids, slot_entries, ProgrammePredictor,
    };
    use crate::services::{ProgrammeError, RequestContext};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn heatmap(days: [f64; 7], hours: &[(usize, f64)]) -> Heatmap {
        let mut h = [0.0; 24];
        for (hour, p) in hours {
            h[*hour] = *p;
        }
        Heatmap {
            streamer_id: StreamerId::new("s1"),
            hours: h,
            days_of_week: days,
            data_points: 1,
            generated_at: now(),
        }
    }

    #[test]
    fn test_slot_rule_thresholds() {
        let heatmap = heatmap(
            [0.0, 0.5, 0.1, 0.4, 0.0, 0.0, 0.0],
            &[(10, 0.2), (11, 0.1), (20, 0.7)],
        );
        let entries = slot_entries(&heatmap);

        let slots: Vec<(u32, u32)> = entries.iter().map(|e| (e.day_of_week, e.hour)).collect();
        // Day 2 sits exactly on the day threshold; (1, 11) exactly on the slot threshold.
        assert_eq!(slots, vec![(1, 10), (1, 20), (3, 10), (3, 20)]);
        assert!((entries[0].probability - 0.1).abs() < 1e-12);
        assert!((entries[3].probability - 0.28).abs() < 1e-12);
        assert!(entries.iter().all(|e| e.probability > 0.05 && e.probability <= 1.0));
    }

    #[test]
    fn test_empty_heatmap_has_no_slots() {
        assert!(slot_entries(&heatmap([0.0; 7], &[])).is_empty());
    }

    #[test]
    fn test_canonical_week_keeps_caller_offset() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let monday = offset.with_ymd_and_hms(2024, 1, 15, 15, 30, 0).unwrap();
        let week = canonical_week(&monday);
        assert_eq!(week.start, offset.with_ymd_and_hms(2024, 1, 14, 0, 0, 0).unwrap());
        assert_eq!(week.start.offset(), &offset);
        assert_eq!(week.next, offset.with_ymd_and_hms(2024, 1, 21, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_week_neighbours_follow_dst_change() {
        let repo = Arc::new(LocalRepository::new());
        let predictor = ProgrammePredictor::new(repo.clone(), Arc::new(FixedClock::new(now())));
        let wednesday = chrono_tz::Europe::Madrid
            .with_ymd_and_hms(2024, 4, 3, 12, 0, 0)
            .unwrap();

        let programme = predictor
            .generate_global_programme(&RequestContext::new(), &wednesday, 0)
            .await
            .unwrap();
        assert_eq!(programme.week.to_rfc3339(), "2024-03-31T00:00:00+01:00");
        assert_eq!(programme.prev_week.to_rfc3339(), "2024-03-24T00:00:00+01:00");
        assert_eq!(programme.next_week.to_rfc3339(), "2024-04-07T00:00:00+02:00");

        let view = crate::services::CalendarGridBuilder::new(repo)
            .build_calendar(&RequestContext::new(), &programme)
            .await
            .unwrap();
        for start in [view.week, view.prev_week, view.next_week] {
            let local = start.with_timezone(&chrono_tz::Europe::Madrid);
            assert_eq!(local.hour(), 0, "{start} is not local midnight");
            assert_eq!(local.weekday(), Weekday::Sun);
        }
    }

    #[test]
    fn test_clean_streamer_ids() {
        let ids = vec![
            StreamerId::new(" a "),
            StreamerId::new("b"),
            StreamerId::new("a"),
        ];
        let cleaned = clean_streamer_ids(&ids).unwrap();
        assert_eq!(cleaned, vec![StreamerId::new("a"), StreamerId::new("b")]);

        let err = clean_streamer_ids(&[StreamerId::new("a"), StreamerId::new(" ")]).unwrap_err();
        assert!(matches!(err, ProgrammeError::InvalidInput(_)));
    }

    fn predictor(repo: &LocalRepository) -> ProgrammePredictor {
        ProgrammePredictor::new(Arc::new(repo.clone()), Arc::new(FixedClock::new(now())))
    }

    #[tokio::test]
    async fn test_predicted_live_time_rejects_bad_day() {
        let repo = LocalRepository::new();
        let err = predictor(&repo)
            .predicted_live_time(&RequestContext::new(), &StreamerId::new("s1"), 7)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgrammeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_predicted_live_time_propagates_insufficient_data() {
        let repo = LocalRepository::new();
        let err = predictor(&repo)
            .predicted_live_time(&RequestContext::new(), &StreamerId::new("s1"), 3)
            .await
            .unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[tokio::test]
    async fn test_predicted_live_time_picks_lowest_hour_on_tie() {
        let repo = LocalRepository::new();
        // Wednesday 2024-05-29, one sample at 09:00 and one at 17:00.
        for hour in [17, 9] {
            let ts = Utc.with_ymd_and_hms(2024, 5, 29, hour, 0, 0).unwrap();
            repo.insert_activity(&NewActivity::sample(StreamerId::new("s1"), ts, None, ts));
        }

        let slot = predictor(&repo)
            .predicted_live_time(&RequestContext::new(), &StreamerId::new("s1"), 3)
            .await
            .unwrap();
        assert_eq!(slot.hour, 9);
        assert_eq!(slot.day_of_week, 3);
        assert!((slot.probability - 0.8 * 0.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_save_custom_programme_creates_then_updates() {
        let repo = LocalRepository::new();
        let predictor = predictor(&repo);
        let ctx = RequestContext::new();
        let user = UserId::new("u1");

        let created = predictor
            .save_custom_programme(&ctx, &user, &[StreamerId::new("a"), StreamerId::new("a")])
            .await
            .unwrap();
        assert_eq!(created.streamer_ids, vec![StreamerId::new("a")]);
        assert_eq!(created.user_id, Some(user.clone()));

        let updated = predictor
            .save_custom_programme(&ctx, &user, &[StreamerId::new("b")])
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.streamer_ids, vec![StreamerId::new("b")]);

        assert!(predictor.delete_custom_programme(&ctx, &user).await.unwrap());
        assert!(!predictor.delete_custom_programme(&ctx, &user).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_custom_programme_requires_user() {
        let repo = LocalRepository::new();
        let err = predictor(&repo)
            .save_custom_programme(&RequestContext::new(), &UserId::new(""), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ProgrammeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_generated_at_comes_from_clock() {
        let repo = LocalRepository::new();
        let clock = Arc::new(FixedClock::new(now()));
        let predictor = ProgrammePredictor::new(Arc::new(repo), clock.clone());
        clock.advance(Duration::minutes(5));

        let programme = predictor
            .generate_global_programme(&RequestContext::new(), &now(), 0)
            .await
            .unwrap();
        assert_eq!(programme.generated_at, now() + Duration::minutes(5));
        assert!(programme.entries.is_empty());
    }
}
