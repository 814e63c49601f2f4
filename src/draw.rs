// Window + software drawing utilities.
// Provided here:
// 1) A window that shows the rendered frame and reports pointer/quit input.
// 2) Rectangle outlines, a crosshair and the preview inset.
// 3) A tiny 5x7 bitmap font for the status line.

use crate::error::Error;
use crate::interaction::PointerEvent;
use crate::session::Overlays;
use crate::types::{FrameBuffer, Point};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

pub const PENDING_COLOR: u32 = 0x00_FF_FF_FF; // white rubber band
pub const TRACKED_COLOR: u32 = 0x00_FF_00_00; // red active box
pub const OUTLINE_THICKNESS: i32 = 4;

pub struct Drawer {
    window: Window, // the on-screen window you see
    pointer: PointerPoller,
}

impl Drawer {
    /// Create a window sized to the output frame, refreshed at most `fps` times per second.
    /// The refresh limit doubles as the per-iteration input wait.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self { window, pointer: PointerPoller::default() })
    }

    /// Push the pixels for this frame to the screen (also pumps window events).
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// True once the window was closed or ESC / Q was pressed.
    pub fn quit_requested(&self) -> bool {
        !self.window.is_open()
            || self.window.is_key_down(Key::Escape)
            || self.window.is_key_pressed(Key::Q, KeyRepeat::No)
    }

    /// Pointer events since the previous call, in window (= frame) pixels.
    /// Positions outside the window are passed through unclamped.
    pub fn poll_pointer(&mut self) -> Vec<PointerEvent> {
        let pos = self
            .window
            .get_mouse_pos(MouseMode::Pass)
            .map(|(x, y)| Point::new(x.floor() as i32, y.floor() as i32));
        let left = self.window.get_mouse_down(MouseButton::Left);
        let right = self.window.get_mouse_down(MouseButton::Right);
        self.pointer.poll(pos, left, right)
    }

    /// Last known pointer position.
    pub fn pointer_pos(&self) -> Option<Point> {
        self.pointer.last_pos
    }
}

/// Turns polled mouse state into press/move/release edges.
#[derive(Debug, Default)]
pub struct PointerPoller {
    last_pos: Option<Point>,
    left: bool,
    right: bool,
}

impl PointerPoller {
    pub fn poll(&mut self, pos: Option<Point>, left: bool, right: bool) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let moved = pos.is_some() && pos != self.last_pos;
        if let Some(p) = pos {
            self.last_pos = Some(p);
        }

        // No position seen yet: nothing to attach button edges to.
        if let Some(p) = self.last_pos {
            if moved {
                events.push(PointerEvent::Move(p));
            }
            match (self.left, left) {
                (false, true) => events.push(PointerEvent::Press(p)),
                (true, false) => events.push(PointerEvent::Release(p)),
                _ => {}
            }
            if !self.right && right {
                events.push(PointerEvent::SecondaryPress(p));
            }
        }

        self.left = left;
        self.right = right;
        events
    }
}

/* ---------- Compositing ---------- */

/// Burn `overlays` into a copy of `frame`.
/// The preview crop is read from the untouched `frame`, never from the copy.
pub fn compose(frame: &FrameBuffer, overlays: &Overlays) -> FrameBuffer {
    let mut out = frame.clone();

    if let Some(r) = overlays.pending {
        draw_rect(&mut out, r.x, r.y, r.width, r.height, OUTLINE_THICKNESS, PENDING_COLOR);
    }
    if let Some(r) = overlays.tracked {
        draw_rect(&mut out, r.x, r.y, r.width, r.height, OUTLINE_THICKNESS, TRACKED_COLOR);
        if let Some(dest) = overlays.preview {
            let inset = frame.crop(r).resized(dest.width as usize, dest.height as usize);
            out.blit(&inset, dest.x, dest.y);
        }
    }
    out
}

/* ---------- Software drawing: pixels, lines, rectangles, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Outline of the rectangle (x, y, w, h), `thickness` pixels growing inward.
pub fn draw_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: u32) {
    for t in 0..thickness {
        let (l, r) = (x + t, x + w - 1 - t);
        let (top, bot) = (y + t, y + h - 1 - t);
        if l > r || top > bot { break; }
        draw_line(fb, l, top, r, top, color);
        draw_line(fb, l, bot, r, bot, color);
        draw_line(fb, l, top, l, bot, color);
        draw_line(fb, r, top, r, bot, color);
    }
}

/// Small crosshair centered at (cx,cy) with a gap in the middle.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/* ---------- 5x7 bitmap font (just what the status line prints) ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Status words: IDLE DRAWING INIT TRACKING LOST FPS
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// One glyph at (x,y) with a 1-pixel black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (pass_color, off) in [(0x00000000, 1), (color, 0)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx + off, y + ry as i32 + off, pass_color);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs (1-pixel spacing). Unknown characters leave a gap.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}
