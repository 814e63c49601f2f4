// Core types shared by the geometry, interaction and session steps.

use image::{ImageBuffer, Rgb, RgbImage, imageops};

/// One video frame, packed for minifb.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// All-black frame of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    /// Frame filled with one packed color.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    /// Pack an `image` RGB buffer as 0x00RRGGBB.
    pub fn from_rgb_image(img: &RgbImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        Self { width: w as usize, height: h as usize, pixels }
    }

    /// Unpack into an `image` RGB buffer (for resizing and encoding).
    pub fn to_rgb_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            let px = self.pixels[y as usize * self.width + x as usize];
            Rgb([((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8])
        })
    }

    pub fn size(&self) -> Size {
        Size { width: self.width as i32, height: self.height as i32 }
    }

    /// Resample to exactly `width` x `height`.
    pub fn resized(&self, width: usize, height: usize) -> FrameBuffer {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let out = imageops::resize(
            &self.to_rgb_image(),
            width as u32,
            height as u32,
            imageops::FilterType::Triangle,
        );
        FrameBuffer::from_rgb_image(&out)
    }

    /// Copy out the pixels under `rect`. Parts of `rect` outside the frame are dropped.
    pub fn crop(&self, rect: Rect) -> FrameBuffer {
        let x0 = rect.x.clamp(0, self.width as i32) as usize;
        let y0 = rect.y.clamp(0, self.height as i32) as usize;
        let x1 = rect.x.saturating_add(rect.width).clamp(0, self.width as i32) as usize;
        let y1 = rect.y.saturating_add(rect.height).clamp(0, self.height as i32) as usize;
        let (w, h) = (x1.saturating_sub(x0), y1.saturating_sub(y0));

        let mut pixels = Vec::with_capacity(w * h);
        for y in y0..y0 + h {
            let row = y * self.width;
            pixels.extend_from_slice(&self.pixels[row + x0..row + x0 + w]);
        }
        FrameBuffer { width: w, height: h, pixels }
    }

    /// Paste `src` with its top-left at (x, y), clipped to this frame.
    pub fn blit(&mut self, src: &FrameBuffer, x: i32, y: i32) {
        for sy in 0..src.height as i32 {
            let dy = y + sy;
            if dy < 0 || dy >= self.height as i32 { continue; }
            for sx in 0..src.width as i32 {
                let dx = x + sx;
                if dx < 0 || dx >= self.width as i32 { continue; }
                self.pixels[dy as usize * self.width + dx as usize] =
                    src.pixels[sy as usize * src.width + sx as usize];
            }
        }
    }
}

/// Pointer coordinate. Raw input, so it may be negative or past the frame edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in frame pixels (top-left + size).
/// Only rectangles that pass `geometry::is_valid` may be drawn or tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { x: origin.x, y: origin.y, width: size.width, height: size.height }
    }

    pub const fn origin(&self) -> Point {
        Point { x: self.x, y: self.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_image_conversion_keeps_channels() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.pixels[0] = 0x00_12_34_56;
        fb.pixels[1] = 0x00_FF_00_80;
        let img = fb.to_rgb_image();
        assert_eq!(img.get_pixel(0, 0).0, [0x12, 0x34, 0x56]);
        assert_eq!(FrameBuffer::from_rgb_image(&img), fb);
    }

    #[test]
    fn resized_has_requested_size() {
        let fb = FrameBuffer::filled(64, 48, 0x00_20_40_60);
        let out = fb.resized(16, 12);
        assert_eq!((out.width, out.height), (16, 12));
        assert_eq!(out.pixels.len(), 16 * 12);
        // Uniform input stays uniform through the filter.
        assert!(out.pixels.iter().all(|&p| p == 0x00_20_40_60));
    }

    #[test]
    fn crop_copies_region_and_clips() {
        let mut fb = FrameBuffer::new(4, 4);
        for (i, p) in fb.pixels.iter_mut().enumerate() {
            *p = i as u32;
        }
        let c = fb.crop(Rect::new(1, 1, 2, 2));
        assert_eq!((c.width, c.height), (2, 2));
        assert_eq!(c.pixels, vec![5, 6, 9, 10]);

        let clipped = fb.crop(Rect::new(3, 3, 5, 5));
        assert_eq!((clipped.width, clipped.height), (1, 1));
        assert_eq!(clipped.pixels, vec![15]);

        let far = fb.crop(Rect::new(i32::MAX, 0, 5, 5));
        assert_eq!(far.width, 0);
        assert!(far.pixels.is_empty());
        let wide = fb.crop(Rect::new(2, 3, i32::MAX, i32::MAX));
        assert_eq!(wide.pixels, vec![14, 15]);
    }

    #[test]
    fn blit_clips_to_destination() {
        let mut dst = FrameBuffer::new(3, 3);
        let src = FrameBuffer::filled(2, 2, 7);
        dst.blit(&src, 2, -1);
        assert_eq!(dst.pixels, vec![0, 0, 7, 0, 0, 0, 0, 0, 0]);
    }
}
