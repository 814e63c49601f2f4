// Tracking session: owns the tracker and the interaction state, and runs the
// per-frame preview / (re-)init / update sequence.
//
// The three steps run in a fixed order every frame, and each step sees what
// the previous one did (an ROI initialized in step 2 is already advanced in
// step 3 of the same frame).

use log::{debug, info, warn};

use crate::geometry::is_valid;
use crate::interaction::{InteractionState, PointerEvent};
use crate::tracker::Tracker;
use crate::types::{FrameBuffer, Point, Rect, Size};

/// One tracking episode, from a successful init until a new drag (or abandonment).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Episode {
    /// Updates attempted so far.
    pub frames: u64,
    /// Consecutive failed updates.
    pub lost_streak: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Fixed output frame size every incoming frame is resized to.
    pub frame: Size,
    pub preview_size: Size,
    /// Top-left corner of the preview inside the output frame.
    pub preview_offset: Point,
    /// Abandon the episode after this many consecutive lost updates.
    /// `None` keeps it alive forever.
    pub max_lost_frames: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame: Size::new(1024, 800),
            preview_size: Size::new(320, 460),
            preview_offset: Point::new(1, 1),
            max_lost_frames: None,
        }
    }
}

/// What to burn into this frame. Every rectangle here has already been validated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overlays {
    /// Rubber band of an in-progress drag.
    pub pending: Option<Rect>,
    /// Box from a successful update.
    pub tracked: Option<Rect>,
    /// Where the magnified crop of `tracked` goes.
    pub preview: Option<Rect>,
}

pub struct TrackingSession<T: Tracker> {
    tracker: T,
    state: InteractionState,
    config: SessionConfig,
}

impl<T: Tracker> TrackingSession<T> {
    pub fn new(tracker: T, config: SessionConfig) -> Self {
        Self { tracker, state: InteractionState::Idle, config }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Forward one pointer event to the interaction handler.
    pub fn on_pointer(&mut self, event: PointerEvent) {
        self.state.on_pointer(event, self.config.frame);
    }

    /// Run one pipeline iteration on `frame` and return the overlays to draw.
    /// `frame` is only read; the tracker never sees any overlay.
    pub fn step(&mut self, frame: &FrameBuffer) -> Overlays {
        let bounds = frame.size();
        let mut overlays = Overlays::default();

        // 1) Drag preview (read-only).
        overlays.pending = self.state.draft(bounds);

        // 2) Pending ROI -> tracker init. Leaves PendingInit whatever happens,
        //    so a failed init is never retried from stale state.
        if let InteractionState::PendingInit { roi } = self.state {
            self.state = if is_valid(&roi, bounds) && self.tracker.initialize(frame, roi) {
                info!("tracking started on {},{} {}x{}", roi.x, roi.y, roi.width, roi.height);
                InteractionState::Tracking(Episode::default())
            } else {
                warn!("tracker initialization failed for {roi:?}; draw a new region");
                InteractionState::Idle
            };
        }

        // 3) Update.
        self.state = match std::mem::take(&mut self.state) {
            InteractionState::Tracking(mut ep) | InteractionState::TrackingDegraded(mut ep) => {
                ep.frames += 1;
                match self.tracker.advance(frame).filter(|r| is_valid(r, bounds)) {
                    Some(tracked) => {
                        ep.lost_streak = 0;
                        overlays.tracked = Some(tracked);
                        let dest = Rect::from_origin_size(self.config.preview_offset, self.config.preview_size);
                        overlays.preview = is_valid(&dest, bounds).then_some(dest);
                        InteractionState::Tracking(ep)
                    }
                    None => {
                        ep.lost_streak += 1;
                        debug!("target lost (streak {})", ep.lost_streak);
                        if self.config.max_lost_frames.is_some_and(|max| ep.lost_streak >= max) {
                            info!("episode abandoned after {} lost frames", ep.lost_streak);
                            InteractionState::Idle
                        } else {
                            InteractionState::TrackingDegraded(ep)
                        }
                    }
                }
            }
            other => other,
        };

        overlays
    }
}
