//! # Stream Programme
//!
//! Predicts when streamers are likely to be live and lays the predictions out
//! as weekly "TV programmes".
//!
//! Historical activity samples are turned into per-streamer heatmaps
//! (independent hour-of-day and day-of-week probability marginals, with recent
//! activity weighted over older activity). Heatmaps are combined into
//! programme entries for three contexts: the streamers a user follows, a
//! user-curated custom programme, and a global most-followed ranking.
//!
//! ## Architecture
//!
//! - [`models`]: value types (IDs, activity, heatmaps, programmes, week helpers)
//! - [`db`]: repository traits, the in-memory repository, factory and configuration
//! - [`services`]: heatmap engine, programme predictor, calendar grid, follower ranking
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::{TimeZone, Utc};
//! use stream_programme::db::LocalRepository;
//! use stream_programme::models::UserId;
//! use stream_programme::services::{
//!     CalendarGridBuilder, FixedClock, ProgrammePredictor, RequestContext,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let repo = Arc::new(LocalRepository::new());
//! let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()));
//! let predictor = ProgrammePredictor::new(repo.clone(), clock);
//!
//! let ctx = RequestContext::new();
//! let week = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
//! let programme = predictor
//!     .programme_view(&ctx, &UserId::new("alice"), &week)
//!     .await
//!     .unwrap();
//! let calendar = CalendarGridBuilder::new(repo).build_calendar(&ctx, &programme).await.unwrap();
//! assert!(!calendar.is_custom);
//! # });
//! ```

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;
