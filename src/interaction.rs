// Pointer interaction: raw press/move/release events in, ROI drafts and
// committed selections out.
//
// The whole selection/tracking lifecycle is one tagged state, so e.g.
// "drawing while an init is pending" cannot be represented.

use log::{debug, info, warn};

use crate::geometry::{is_valid, normalize};
use crate::session::Episode;
use crate::types::{Point, Rect, Size};

/// One pointer event, already in output-frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Press(Point),
    Move(Point),
    Release(Point),
    /// Secondary button. Reserved; only logged.
    SecondaryPress(Point),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Button held, rubber band from `start` to `current`.
    Drawing { start: Point, current: Point },
    /// A valid ROI was released; the session initializes the tracker on the next frame.
    PendingInit { roi: Rect },
    Tracking(Episode),
    /// Last update lost the target; the episode is kept alive.
    TrackingDegraded(Episode),
}

impl InteractionState {
    /// Apply one pointer event. `frame` is the output frame size used for clamping.
    pub fn on_pointer(&mut self, event: PointerEvent, frame: Size) {
        match event {
            PointerEvent::Press(p) => {
                debug!("primary press at {},{}", p.x, p.y);
                // A new drag always preempts whatever was going on.
                *self = InteractionState::Drawing { start: p, current: p };
            }
            PointerEvent::Move(p) => {
                if let InteractionState::Drawing { current, .. } = self {
                    *current = p;
                }
            }
            PointerEvent::Release(p) => {
                let InteractionState::Drawing { start, .. } = *self else {
                    return;
                };
                let roi = normalize(start, p, frame);
                if is_valid(&roi, frame) {
                    info!("ROI committed: {},{} {}x{}", roi.x, roi.y, roi.width, roi.height);
                    *self = InteractionState::PendingInit { roi };
                } else {
                    warn!("invalid ROI selected ({roi:?}), selection discarded");
                    *self = InteractionState::Idle;
                }
            }
            PointerEvent::SecondaryPress(p) => {
                debug!("secondary press at {},{}", p.x, p.y);
            }
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, InteractionState::Drawing { .. })
    }

    pub fn needs_init(&self) -> bool {
        matches!(self, InteractionState::PendingInit { .. })
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self, InteractionState::Tracking(_) | InteractionState::TrackingDegraded(_))
    }

    /// Live rubber-band rectangle, if drawing and the drag is currently usable.
    pub fn draft(&self, frame: Size) -> Option<Rect> {
        match *self {
            InteractionState::Drawing { start, current } => {
                let r = normalize(start, current, frame);
                is_valid(&r, frame).then_some(r)
            }
            _ => None,
        }
    }

    /// Short status label for the HUD.
    pub fn label(&self) -> String {
        match self {
            InteractionState::Idle => "IDLE".into(),
            InteractionState::Drawing { .. } => "DRAWING".into(),
            InteractionState::PendingInit { .. } => "INIT".into(),
            InteractionState::Tracking(_) => "TRACKING".into(),
            InteractionState::TrackingDegraded(ep) => format!("LOST {}", ep.lost_streak),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Size = Size::new(1024, 800);

    fn drag(state: &mut InteractionState, from: Point, to: Point) {
        state.on_pointer(PointerEvent::Press(from), FRAME);
        state.on_pointer(PointerEvent::Move(to), FRAME);
        state.on_pointer(PointerEvent::Release(to), FRAME);
    }

    #[test]
    fn press_starts_drawing_at_point() {
        let mut s = InteractionState::Idle;
        s.on_pointer(PointerEvent::Press(Point::new(10, 20)), FRAME);
        assert_eq!(
            s,
            InteractionState::Drawing { start: Point::new(10, 20), current: Point::new(10, 20) }
        );
        assert!(s.is_drawing());
        assert!(!s.needs_init());
    }

    #[test]
    fn move_updates_current_only_while_drawing() {
        let mut s = InteractionState::Idle;
        s.on_pointer(PointerEvent::Move(Point::new(5, 5)), FRAME);
        assert_eq!(s, InteractionState::Idle);

        s.on_pointer(PointerEvent::Press(Point::new(10, 10)), FRAME);
        s.on_pointer(PointerEvent::Move(Point::new(60, 40)), FRAME);
        assert_eq!(s.draft(FRAME), Some(Rect::new(10, 10, 50, 30)));
    }

    #[test]
    fn valid_release_commits_roi() {
        let mut s = InteractionState::Idle;
        drag(&mut s, Point::new(100, 100), Point::new(300, 250));
        assert_eq!(s, InteractionState::PendingInit { roi: Rect::new(100, 100, 200, 150) });
        assert!(!s.is_drawing());
        assert!(s.needs_init());
    }

    #[test]
    fn release_past_right_edge_commits_clamped_roi() {
        let mut s = InteractionState::Idle;
        drag(&mut s, Point::new(1000, 100), Point::new(1100, 250));
        assert_eq!(s, InteractionState::PendingInit { roi: Rect::new(1000, 100, 24, 150) });
    }

    #[test]
    fn zero_area_release_is_discarded() {
        let mut s = InteractionState::Idle;
        s.on_pointer(PointerEvent::Press(Point::new(50, 50)), FRAME);
        s.on_pointer(PointerEvent::Release(Point::new(50, 50)), FRAME);
        assert_eq!(s, InteractionState::Idle);
        assert!(!s.needs_init());
        assert!(!s.is_drawing());
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut s = InteractionState::PendingInit { roi: Rect::new(1, 1, 5, 5) };
        s.on_pointer(PointerEvent::Release(Point::new(300, 300)), FRAME);
        assert_eq!(s, InteractionState::PendingInit { roi: Rect::new(1, 1, 5, 5) });
    }

    #[test]
    fn press_preempts_tracking() {
        let mut s = InteractionState::Tracking(Episode::default());
        s.on_pointer(PointerEvent::Press(Point::new(3, 4)), FRAME);
        assert!(s.is_drawing());
        assert!(!s.is_tracking());
    }

    #[test]
    fn secondary_press_has_no_effect() {
        let mut s = InteractionState::Drawing { start: Point::new(1, 1), current: Point::new(9, 9) };
        let before = s.clone();
        s.on_pointer(PointerEvent::SecondaryPress(Point::new(2, 2)), FRAME);
        assert_eq!(s, before);
    }

    #[test]
    fn labels() {
        assert_eq!(InteractionState::Idle.label(), "IDLE");
        let ep = Episode { frames: 5, lost_streak: 3 };
        assert_eq!(InteractionState::TrackingDegraded(ep).label(), "LOST 3");
    }
}
