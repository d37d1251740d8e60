// Core types shared by the geometry, compositing and display code.

use std::ops::{Add, Sub};
use std::path::Path;

use image::{RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A real-valued 2-D point in pixel space.
/// Serialized as `[x, y]`, the shape landmark detectors emit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).norm()
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn scale(self, r: f64) -> Point {
        Point::new(self.x * r, self.y * r)
    }

    /// Integer pixel coordinates, truncated toward zero.
    pub fn truncate(self) -> (i64, i64) {
        (self.x as i64, self.y as i64)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle in pixel units, used for clipping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    /// Non-positive width or height means "no overlap".
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// 2×3 affine matrix `[[a, b, tx], [c, d, ty]]` mapping source pixels to
/// destination pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub m: [[f64; 3]; 2],
}

impl Affine {
    pub const fn identity() -> Self {
        Self { m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] }
    }

    /// Rotation by `degrees` about `center`. Positive angles turn content
    /// counter-clockwise on screen (Y grows downward).
    pub fn rotation(center: Point, degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let Point { x: cx, y: cy } = center;
        Self {
            m: [
                [c, s, (1.0 - c) * cx - s * cy],
                [-s, c, s * cx + (1.0 - c) * cy],
            ],
        }
    }

    /// Multiply the homogeneous point `(x, y, 1)` by the matrix.
    pub fn apply(&self, p: Point) -> Point {
        let [r0, r1] = self.m;
        Point::new(
            r0[0] * p.x + r0[1] * p.y + r0[2],
            r1[0] * p.x + r1[1] * p.y + r1[2],
        )
    }

    pub fn translation(&self) -> Point {
        Point::new(self.m[0][2], self.m[1][2])
    }

    /// `None` when the linear part is singular.
    pub fn inverse(&self) -> Option<Affine> {
        let [[a, b, tx], [c, d, ty]] = self.m;
        let det = a * d - b * c;
        if det.abs() < 1e-12 {
            return None;
        }
        let inv = 1.0 / det;
        let (ia, ib, ic, id) = (d * inv, -b * inv, -c * inv, a * inv);
        Some(Affine {
            m: [
                [ia, ib, -(ia * tx + ib * ty)],
                [ic, id, -(ic * tx + id * ty)],
            ],
        })
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

/// A read-only accessory image plus the pixel (in its own, unscaled space)
/// that must land on the destination point.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub image: RgbaImage,
    pub anchor: Point,
}

impl Sprite {
    pub fn new(image: RgbaImage, anchor: Point) -> Self {
        Self { image, anchor }
    }

    /// Decode any supported image file and keep it as RGBA.
    pub fn load(path: impl AsRef<Path>, anchor: Point) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| Error::AssetLoad { path: path.to_path_buf(), source })?
            .to_rgba8();
        Ok(Self { image, anchor })
    }
}

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Pack an RGB frame as 0x00RRGGBB, ready for the window.
    pub fn from_rgb(frame: &RgbImage) -> Self {
        let (w, h) = frame.dimensions();
        let pixels = frame
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();
        Self { width: w as usize, height: h as usize, pixels }
    }
}
