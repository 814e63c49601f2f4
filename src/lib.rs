// Interactive single-object tracker: drag a box over something in a video,
// and it gets followed frame by frame with a magnified preview inset.

pub mod camera;
pub mod config;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod session;
pub mod sink;
pub mod source;
pub mod tracker;
pub mod types;

pub use error::Error;
pub use interaction::{InteractionState, PointerEvent};
pub use session::{Episode, Overlays, SessionConfig, TrackingSession};
pub use tracker::{TemplateTracker, TemplateTrackerConfig, Tracker};
pub use types::{FrameBuffer, Point, Rect, Size};
