pub mod activity;
pub mod heatmap;
pub mod macros;
pub mod platform;
pub mod programme;
pub mod streamer;
pub mod time;

pub use activity::*;
pub use heatmap::*;
pub use platform::*;
pub use programme::*;
pub use streamer::*;
pub use time::*;
