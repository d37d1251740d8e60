// Window + software drawing utilities.
// 1) A window that shows the decorated camera image.
// 2) Thin polylines for the landmark debug overlay.

use image::{Rgb, RgbImage};
use minifb::{Key, Window, WindowOptions};

use crate::error::Error;
use crate::types::{FrameBuffer, Point};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Pump window events without a new frame, so close and ESC still register
    /// while the camera is stalled.
    pub fn update(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC is held down (we exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }
}

/* ---------- Software drawing on RGB frames ---------- */

/// Put a 2×2 dot at (x,y), clipped to the frame.
#[inline]
fn put_dot(frame: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        let (px, py) = (x + dx, y + dy);
        if px < 0 || py < 0 || px >= frame.width() as i64 || py >= frame.height() as i64 {
            continue;
        }
        frame.put_pixel(px as u32, py as u32, color);
    }
}

/// Draw a line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(frame: &mut RgbImage, (mut x0, mut y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_dot(frame, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Open polyline through `points`. A single point becomes a dot.
pub fn draw_polyline(frame: &mut RgbImage, points: &[Point], color: Rgb<u8>) {
    match points {
        [] => {}
        [only] => {
            let (x, y) = only.truncate();
            put_dot(frame, x, y, color);
        }
        _ => {
            for pair in points.windows(2) {
                draw_line(frame, pair[0].truncate(), pair[1].truncate(), color);
            }
        }
    }
}
