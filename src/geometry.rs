// Region geometry: turn two arbitrary points into a frame-clamped rectangle,
// and decide whether a rectangle is usable.
//
// The same clamp-then-validate pair is applied to the live drag preview,
// the committed ROI and every box the tracker returns.

use crate::types::{Point, Rect, Size};

/// Rectangle spanned by `p1` and `p2`, clamped into a `frame`-sized canvas.
///
/// The result always satisfies `x >= 0`, `y >= 0`, `x + width <= frame.width`
/// and `y + height <= frame.height`, but width or height can still be zero or
/// negative (e.g. a click without drag, or a press past the right edge).
/// Run it through [`is_valid`] before using it.
pub fn normalize(p1: Point, p2: Point, frame: Size) -> Rect {
    let x = p1.x.min(p2.x).max(0);
    let y = p1.y.min(p2.y).max(0);
    let width = p2.x.abs_diff(p1.x).min(i32::MAX as u32) as i32;
    let height = p2.y.abs_diff(p1.y).min(i32::MAX as u32) as i32;

    Rect {
        x,
        y,
        width: width.min(frame.width - x),
        height: height.min(frame.height - y),
    }
}

/// True when `rect` has positive area and lies entirely inside the frame.
pub fn is_valid(rect: &Rect, frame: Size) -> bool {
    rect.width > 0
        && rect.height > 0
        && rect.x >= 0
        && rect.y >= 0
        && rect.x.checked_add(rect.width).is_some_and(|r| r <= frame.width)
        && rect.y.checked_add(rect.height).is_some_and(|b| b <= frame.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Size = Size::new(1024, 800);

    fn in_bounds(r: &Rect, frame: Size) -> bool {
        r.x >= 0 && r.y >= 0 && r.x + r.width <= frame.width && r.y + r.height <= frame.height
    }

    #[test]
    fn normalize_plain_drag() {
        let r = normalize(Point::new(100, 100), Point::new(300, 250), FRAME);
        assert_eq!(r, Rect::new(100, 100, 200, 150));
        assert!(is_valid(&r, FRAME));
    }

    #[test]
    fn normalize_inverted_drag() {
        let r = normalize(Point::new(300, 250), Point::new(100, 100), FRAME);
        assert_eq!(r, Rect::new(100, 100, 200, 150));
    }

    #[test]
    fn normalize_clamps_right_edge() {
        let r = normalize(Point::new(1000, 100), Point::new(1100, 250), FRAME);
        assert_eq!(r, Rect::new(1000, 100, 24, 150));
        assert!(is_valid(&r, FRAME));
    }

    #[test]
    fn normalize_clamps_negative_origin() {
        // x clamps to 0 but the span is still measured from the raw points.
        let r = normalize(Point::new(-50, -20), Point::new(30, 40), FRAME);
        assert_eq!(r, Rect::new(0, 0, 80, 60));
        assert!(in_bounds(&r, FRAME));
    }

    #[test]
    fn normalize_zero_area_is_invalid() {
        let r = normalize(Point::new(50, 50), Point::new(50, 50), FRAME);
        assert_eq!(r, Rect::new(50, 50, 0, 0));
        assert!(!is_valid(&r, FRAME));
    }

    #[test]
    fn normalize_entirely_past_edge_is_invalid() {
        let r = normalize(Point::new(1100, 10), Point::new(1200, 90), FRAME);
        assert!(r.width <= 0);
        assert!(!is_valid(&r, FRAME));
    }

    #[test]
    fn normalize_is_pure() {
        let (a, b) = (Point::new(-7, 900), Point::new(512, 3));
        assert_eq!(normalize(a, b, FRAME), normalize(a, b, FRAME));
    }

    #[test]
    fn normalize_stays_in_bounds_over_grid() {
        let coords = [-2000, -1, 0, 1, 399, 800, 1023, 1024, 1025, 5000];
        for &x1 in &coords {
            for &y1 in &coords {
                for &x2 in &coords {
                    for &y2 in &coords {
                        let r = normalize(Point::new(x1, y1), Point::new(x2, y2), FRAME);
                        assert!(r.x >= 0 && r.y >= 0, "{r:?}");
                        if r.x <= FRAME.width && r.y <= FRAME.height {
                            assert!(in_bounds(&r, FRAME), "{r:?}");
                        } else {
                            assert!(!is_valid(&r, FRAME));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn is_valid_rejects_degenerate_and_out_of_bounds() {
        assert!(!is_valid(&Rect::new(10, 10, 0, 5), FRAME));
        assert!(!is_valid(&Rect::new(10, 10, 5, -1), FRAME));
        assert!(!is_valid(&Rect::new(-1, 10, 5, 5), FRAME));
        assert!(!is_valid(&Rect::new(1000, 10, 25, 5), FRAME));
        assert!(!is_valid(&Rect::new(10, 790, 5, 11), FRAME));
        assert!(!is_valid(&Rect::new(i32::MAX, 0, 5, 5), FRAME));
    }

    #[test]
    fn is_valid_accepts_full_frame_and_edges() {
        assert!(is_valid(&Rect::new(0, 0, 1024, 800), FRAME));
        assert!(is_valid(&Rect::new(1023, 799, 1, 1), FRAME));
        assert!(is_valid(&Rect::new(1, 1, 320, 460), FRAME));
    }

    #[test]
    fn preview_destination_rejected_on_small_frame() {
        let small = Size::new(200, 200);
        assert!(!is_valid(&Rect::new(1, 1, 320, 460), small));
    }
}
