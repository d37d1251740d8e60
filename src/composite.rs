// Rectangle clipping and alpha "source-over" blending onto a canvas.
// The canvas can be RGB or RGBA; only its first three channels are written.

use image::{ImageBuffer, Pixel, RgbaImage};

use crate::types::Rect;

/// Axis-aligned intersection. `None` when the rectangles are disjoint.
/// A touching edge gives a zero-sized rectangle, which callers treat as empty.
/// Far edges saturate at the `i64` limits.
pub fn intersect(a: Rect, b: Rect) -> Option<Rect> {
    let x = a.x.max(b.x);
    let y = a.y.max(b.y);
    let w = a.x.saturating_add(a.width).min(b.x.saturating_add(b.width)).saturating_sub(x);
    let h = a.y.saturating_add(a.height).min(b.y.saturating_add(b.height)).saturating_sub(y);
    if w < 0 || h < 0 {
        return None;
    }
    Some(Rect::new(x, y, w, h))
}

/// Blend `source` onto `dest` with its top-left corner at `position`.
///
/// Per color channel: `d = a * s + (1 - a) * d` with `a = alpha / 255`.
/// Pixels outside the visible overlap, and the canvas alpha channel, are left alone.
pub fn blend<P>(dest: &mut ImageBuffer<P, Vec<u8>>, source: &RgbaImage, position: (i64, i64))
where
    P: Pixel<Subpixel = u8>,
{
    if P::CHANNEL_COUNT < 3 {
        return;
    }

    let (x, y) = position;
    let (sw, sh) = (source.width() as i64, source.height() as i64);
    let (dw, dh) = (dest.width() as i64, dest.height() as i64);

    // Same overlap, seen from each side.
    let Some(di) = intersect(Rect::new(0, 0, dw, dh), Rect::new(x, y, sw, sh)) else {
        return;
    };
    let flipped = Rect::new(x.saturating_neg(), y.saturating_neg(), dw, dh);
    let Some(si) = intersect(Rect::new(0, 0, sw, sh), flipped) else {
        return;
    };
    if di.is_empty() || si.is_empty() {
        return;
    }

    for row in 0..di.height {
        for col in 0..di.width {
            let s = source.get_pixel((si.x + col) as u32, (si.y + row) as u32).0;
            let alpha = s[3] as f64 / 255.0;
            if alpha == 0.0 {
                continue;
            }

            let d = dest.get_pixel_mut((di.x + col) as u32, (di.y + row) as u32);
            let channels = d.channels_mut();
            for c in 0..3 {
                let v = alpha * s[c] as f64 + (1.0 - alpha) * channels[c] as f64;
                channels[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    #[test]
    fn contained_rect() {
        assert_eq!(
            intersect(Rect::new(0, 0, 4, 4), Rect::new(1, 1, 2, 2)),
            Some(Rect::new(1, 1, 2, 2))
        );
    }

    #[test]
    fn disjoint_rects() {
        assert_eq!(intersect(Rect::new(0, 0, 2, 2), Rect::new(5, 5, 2, 2)), None);
    }

    #[test]
    fn intersection_is_symmetric() {
        let rects = [
            Rect::new(0, 0, 4, 4),
            Rect::new(1, 1, 2, 2),
            Rect::new(-3, 2, 5, 9),
            Rect::new(5, 5, 2, 2),
            Rect::new(4, 0, 3, 3),
            Rect::new(2, -1, 0, 6),
        ];
        for a in rects {
            for b in rects {
                assert_eq!(intersect(a, b), intersect(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn touching_edges_are_empty() {
        let r = intersect(Rect::new(0, 0, 4, 4), Rect::new(4, 0, 3, 3)).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn opaque_white_square_on_black() {
        let mut dest = RgbImage::new(4, 4);
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        blend(&mut dest, &src, (1, 1));
        for (x, y, p) in dest.enumerate_pixels() {
            let inside = (1..=2).contains(&x) && (1..=2).contains(&y);
            let want = if inside { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) };
            assert_eq!(*p, want, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn transparent_source_changes_nothing() {
        let mut dest = RgbImage::from_fn(5, 5, |x, y| Rgb([x as u8 * 40, y as u8 * 30, 7]));
        let before = dest.clone();
        let src = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 255, 0]));
        blend(&mut dest, &src, (1, 1));
        assert_eq!(dest, before);
    }

    #[test]
    fn outside_bounds_is_noop() {
        let mut dest = RgbImage::new(4, 4);
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        for pos in [(10, 10), (-2, 0), (0, -5), (4, 1)] {
            blend(&mut dest, &src, pos);
        }
        assert!(dest.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn extreme_rects_do_not_overflow() {
        let canvas = Rect::new(0, 0, 4, 4);
        for far in [
            Rect::new(i64::MAX, i64::MAX, 2, 2),
            Rect::new(i64::MAX - 1, 0, i64::MAX, 4),
            Rect::new(i64::MIN, i64::MIN, 2, 2),
        ] {
            assert!(intersect(canvas, far).is_none_or(|r| r.is_empty()), "{far:?}");
        }
        assert_eq!(intersect(Rect::new(i64::MIN, 0, i64::MAX, 4), canvas), None);
    }

    #[test]
    fn extreme_positions_are_noop() {
        let mut dest = RgbImage::new(4, 4);
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        for pos in [(i64::MAX, i64::MAX), (i64::MIN, i64::MIN), (i64::MIN, 0), (0, i64::MAX)] {
            blend(&mut dest, &src, pos);
        }
        assert!(dest.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn partial_overlap_is_clipped() {
        let mut dest = RgbImage::new(4, 4);
        let src = RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]));
        blend(&mut dest, &src, (-1, 2));
        // Source columns 1..3 land on dest columns 0..2, rows 2..4.
        assert_eq!(dest.get_pixel(0, 2), &Rgb([9, 9, 9]));
        assert_eq!(dest.get_pixel(1, 3), &Rgb([9, 9, 9]));
        assert_eq!(dest.get_pixel(2, 2), &Rgb([0, 0, 0]));
        assert_eq!(dest.get_pixel(0, 1), &Rgb([0, 0, 0]));
    }

    #[test]
    fn half_alpha_mixes_and_keeps_canvas_alpha() {
        let mut dest = RgbaImage::from_pixel(1, 1, Rgba([0, 100, 200, 77]));
        let src = RgbaImage::from_pixel(1, 1, Rgba([255, 100, 0, 128]));
        blend(&mut dest, &src, (0, 0));
        let a = 128.0 / 255.0;
        let want = [
            (a * 255.0_f64).round() as u8,
            100,
            ((1.0 - a) * 200.0_f64).round() as u8,
            77,
        ];
        assert_eq!(dest.get_pixel(0, 0).0, want);
    }
}
