//! Service layer: the prediction engines.
//!
//! Services sit between callers and the repository traits. Each holds an
//! `Arc<dyn FullRepository>` and an injected [`Clock`]; every store call is
//! made through a [`RequestContext`] so callers can cancel or bound a request.
//!
//! - [`heatmap`]: activity history to probability marginals
//! - [`programme`]: followed, custom and global programmes, single-slot prediction
//! - [`calendar`]: 24x7 grid and calendar view
//! - [`ranking`]: streamers by follower count

pub mod calendar;
pub mod clock;
pub mod context;
pub mod error;
pub mod heatmap;
pub mod programme;
pub mod ranking;

pub use calendar::{build_time_slot_grid, CalendarGridBuilder, CalendarSlot, CalendarView, TimeSlotGrid};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::RequestContext;
pub use error::{ProgrammeError, ProgrammeResult};
pub use heatmap::{HeatmapEngine, LOOKBACK_DAYS, OLDER_WEIGHT, RECENT_WEIGHT, RECENT_WINDOW_DAYS};
pub use programme::{ProgrammePredictor, DAY_THRESHOLD, SLOT_THRESHOLD};
pub use ranking::{FollowerRanker, RankedStreamer};
