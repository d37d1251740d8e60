// Rotate a sprite while growing the canvas so no corner is clipped.
// The transform is returned too: callers need it to follow the anchor point.

use image::{Rgba, RgbaImage};

use crate::types::{Affine, Point};

/// A rotated image and the matrix that maps the input's pixels into it.
#[derive(Debug, Clone)]
pub struct Rotated {
    pub image: RgbaImage,
    pub transform: Affine,
}

/// Rotate `image` by `degrees` (positive = counter-clockwise on screen).
///
/// The output is sized to the axis-aligned box of the rotated rectangle and the
/// translation is shifted so the old center lands on the new center.
/// Pixels that map outside the source come out fully transparent.
pub fn rotate(image: &RgbaImage, degrees: f64) -> Rotated {
    let (w, h) = (image.width() as f64, image.height() as f64);
    let center = Point::new(w / 2.0, h / 2.0);
    let mut transform = Affine::rotation(center, degrees);

    let abs_cos = transform.m[0][0].abs();
    let abs_sin = transform.m[0][1].abs();

    // Height feeds the width bound and vice versa.
    let bound_w = (h * abs_sin + w * abs_cos).round();
    let bound_h = (h * abs_cos + w * abs_sin).round();

    transform.m[0][2] += bound_w / 2.0 - center.x;
    transform.m[1][2] += bound_h / 2.0 - center.y;

    let image = warp_affine(image, &transform, bound_w as u32, bound_h as u32);
    Rotated { image, transform }
}

/// Resample `src` through `transform` into a `width × height` canvas.
/// Bilinear, pixel centers on integer coordinates, zero outside the source.
pub fn warp_affine(src: &RgbaImage, transform: &Affine, width: u32, height: u32) -> RgbaImage {
    let mut out = RgbaImage::new(width, height);
    let Some(inv) = transform.inverse() else {
        return out;
    };

    let (sw, sh) = (src.width() as i64, src.height() as i64);
    let sample = |x: i64, y: i64| -> [f64; 4] {
        if x >= 0 && x < sw && y >= 0 && y < sh {
            let p = src.get_pixel(x as u32, y as u32).0;
            [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
        } else {
            [0.0; 4]
        }
    };

    for (ox, oy, px) in out.enumerate_pixels_mut() {
        // Map output pixel back to source space.
        let s = inv.apply(Point::new(ox as f64, oy as f64));
        let x0 = s.x.floor();
        let y0 = s.y.floor();
        let fx = s.x - x0;
        let fy = s.y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let p00 = sample(x0, y0);
        let p10 = sample(x0 + 1, y0);
        let p01 = sample(x0, y0 + 1);
        let p11 = sample(x0 + 1, y0 + 1);

        let mut v = [0u8; 4];
        for c in 0..4 {
            let val = p00[c] * (1.0 - fx) * (1.0 - fy)
                + p10[c] * fx * (1.0 - fy)
                + p01[c] * (1.0 - fx) * fy
                + p11[c] * fx * fy;
            v[c] = val.round().clamp(0.0, 255.0) as u8;
        }
        *px = Rgba(v);
    }

    out
}
