// Tracker capability: the session only knows `initialize` and `advance`.
// `TemplateTracker` is the algorithm the binary ships with.

use log::debug;

use crate::error::Error;
use crate::geometry::is_valid;
use crate::types::{FrameBuffer, Point, Rect};

/// A single-object tracking algorithm.
///
/// `initialize` must fully discard any state from a previous episode.
pub trait Tracker {
    /// Start following `roi` in `frame`. Returns false if the algorithm refuses the region.
    fn initialize(&mut self, frame: &FrameBuffer, roi: Rect) -> bool;

    /// Locate the target in the next frame. `None` means lost for this frame.
    /// A returned box is untrusted: the caller validates it against the frame.
    fn advance(&mut self, frame: &FrameBuffer) -> Option<Rect>;
}

impl<T: Tracker + ?Sized> Tracker for Box<T> {
    fn initialize(&mut self, frame: &FrameBuffer, roi: Rect) -> bool {
        (**self).initialize(frame, roi)
    }

    fn advance(&mut self, frame: &FrameBuffer) -> Option<Rect> {
        (**self).advance(frame)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TemplateTrackerConfig {
    /// How far (px) the target may move between two frames.
    pub search_radius: i32,
    /// Mean absolute luma difference (0..255) above which the match is rejected.
    pub max_mean_diff: f32,
    /// How much of the matched patch is blended into the template each frame (0..1).
    pub learning_rate: f32,
    /// Compare every n-th pixel in both axes.
    pub sample_stride: usize,
}

impl Default for TemplateTrackerConfig {
    fn default() -> Self {
        Self { search_radius: 32, max_mean_diff: 40.0, learning_rate: 0.1, sample_stride: 2 }
    }
}

/// Luma template matcher: coarse-to-fine search around the last position,
/// scored by mean absolute difference.
pub struct TemplateTracker {
    config: TemplateTrackerConfig,
    template: Vec<f32>, // luma, tw * th
    tw: usize,
    th: usize,
    pos: Point,
    active: bool,
}

impl TemplateTracker {
    pub fn new(config: TemplateTrackerConfig) -> Result<Self, Error> {
        if config.search_radius <= 0 {
            return Err(Error::TrackerInit("search radius must be > 0".into()));
        }
        if !(config.max_mean_diff > 0.0 && config.max_mean_diff <= 255.0) {
            return Err(Error::TrackerInit("match threshold must be in (0, 255]".into()));
        }
        if !(0.0..=1.0).contains(&config.learning_rate) {
            return Err(Error::TrackerInit("learning rate must be in [0, 1]".into()));
        }
        if config.sample_stride == 0 {
            return Err(Error::TrackerInit("sample stride must be > 0".into()));
        }
        Ok(Self { config, template: Vec::new(), tw: 0, th: 0, pos: Point::default(), active: false })
    }

    /// Mean absolute difference between the template and the patch at (x, y).
    fn score(&self, luma: &[f32], frame_w: usize, x: usize, y: usize) -> f32 {
        let s = self.config.sample_stride;
        let mut sum = 0.0f32;
        let mut n = 0u32;
        for ty in (0..self.th).step_by(s) {
            let row = (y + ty) * frame_w + x;
            let trow = ty * self.tw;
            for tx in (0..self.tw).step_by(s) {
                sum += (luma[row + tx] - self.template[trow + tx]).abs();
                n += 1;
            }
        }
        if n == 0 { f32::INFINITY } else { sum / n as f32 }
    }

    /// Best (score, position) over offsets `center ± radius` in steps of `step`.
    /// Equal scores go to the candidate closest to `anchor`, so a target that
    /// has not moved stays put even on flat texture.
    fn search(
        &self,
        luma: &[f32],
        frame: &FrameBuffer,
        center: Point,
        anchor: Point,
        radius: i32,
        step: usize,
    ) -> Option<(f32, Point)> {
        let max_x = frame.width as i32 - self.tw as i32;
        let max_y = frame.height as i32 - self.th as i32;
        let mut best: Option<(f32, i64, Point)> = None;
        for dy in (-radius..=radius).step_by(step) {
            let y = center.y + dy;
            if y < 0 || y > max_y { continue; }
            for dx in (-radius..=radius).step_by(step) {
                let x = center.x + dx;
                if x < 0 || x > max_x { continue; }
                let sc = self.score(luma, frame.width, x as usize, y as usize);
                let (ax, ay) = ((x - anchor.x) as i64, (y - anchor.y) as i64);
                let dist = ax * ax + ay * ay;
                if best.is_none_or(|(b, bd, _)| sc < b || (sc == b && dist < bd)) {
                    best = Some((sc, dist, Point::new(x, y)));
                }
            }
        }
        best.map(|(sc, _, p)| (sc, p))
    }
}

fn luma_plane(frame: &FrameBuffer) -> Vec<f32> {
    frame
        .pixels
        .iter()
        .map(|&px| {
            let r = ((px >> 16) & 0xFF) as f32;
            let g = ((px >> 8) & 0xFF) as f32;
            let b = (px & 0xFF) as f32;
            0.299 * r + 0.587 * g + 0.114 * b
        })
        .collect()
}

impl Tracker for TemplateTracker {
    fn initialize(&mut self, frame: &FrameBuffer, roi: Rect) -> bool {
        self.active = false;
        if !is_valid(&roi, frame.size()) {
            return false;
        }
        let luma = luma_plane(frame);
        let (tw, th) = (roi.width as usize, roi.height as usize);
        let mut template = Vec::with_capacity(tw * th);
        for y in roi.y as usize..roi.y as usize + th {
            let row = y * frame.width;
            template.extend_from_slice(&luma[row + roi.x as usize..row + roi.x as usize + tw]);
        }
        self.template = template;
        self.tw = tw;
        self.th = th;
        self.pos = roi.origin();
        self.active = true;
        true
    }

    fn advance(&mut self, frame: &FrameBuffer) -> Option<Rect> {
        if !self.active || self.tw > frame.width || self.th > frame.height {
            return None;
        }
        let luma = luma_plane(frame);
        let r = self.config.search_radius;

        let (_, coarse) = self.search(&luma, frame, self.pos, self.pos, r, 2)?;
        let (best, at) = self.search(&luma, frame, coarse, self.pos, 1, 1)?;
        if best > self.config.max_mean_diff {
            debug!("template match rejected (mean diff {best:.1})");
            return None;
        }

        let lr = self.config.learning_rate;
        if lr > 0.0 {
            for ty in 0..self.th {
                let row = (at.y as usize + ty) * frame.width + at.x as usize;
                for tx in 0..self.tw {
                    let t = &mut self.template[ty * self.tw + tx];
                    *t += lr * (luma[row + tx] - *t);
                }
            }
        }
        self.pos = at;
        Some(Rect::new(at.x, at.y, self.tw as i32, self.th as i32))
    }
}
