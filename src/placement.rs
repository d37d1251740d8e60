// Scale, rotate and drop a sprite so its anchor lands on a canvas point.

use image::{ImageBuffer, Pixel, RgbaImage};

use crate::composite::blend;
use crate::error::Result;
use crate::resize::resize;
use crate::rotate::rotate;
use crate::types::{Point, Sprite};

/// A sprite scaled and rotated for one destination, not yet drawn.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub image: RgbaImage,
    /// Canvas position of the image's top-left corner.
    pub offset: (i64, i64),
}

impl Prepared {
    pub fn draw<P>(&self, canvas: &mut ImageBuffer<P, Vec<u8>>)
    where
        P: Pixel<Subpixel = u8>,
    {
        blend(canvas, &self.image, self.offset);
    }
}

/// Everything in [`place`] that can fail, without touching a canvas.
pub fn prepare(sprite: &Sprite, destination: Point, degrees: f64, target_width: u32) -> Result<Prepared> {
    let (scaled, anchor) = resize(&sprite.image, Some(target_width), None, Some(sprite.anchor))?;
    let scaled_anchor = anchor.unwrap_or(sprite.anchor);

    let rotated = rotate(&scaled, degrees);
    let rotated_anchor = rotated.transform.apply(scaled_anchor);

    Ok(Prepared {
        image: rotated.image,
        offset: (destination - rotated_anchor).truncate(),
    })
}

/// Place `sprite` on `canvas` so that its anchor, after scaling to
/// `target_width` and rotating by `degrees`, lands on `destination`.
///
/// Accurate to the integer truncation of the overlay offset (at most one
/// pixel per axis). The sprite itself is never modified.
pub fn place<P>(
    canvas: &mut ImageBuffer<P, Vec<u8>>,
    sprite: &Sprite,
    destination: Point,
    degrees: f64,
    target_width: u32,
) -> Result<()>
where
    P: Pixel<Subpixel = u8>,
{
    prepare(sprite, destination, degrees, target_width)?.draw(canvas);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn unrotated_corner_anchor_lands_exactly() {
        let mut canvas = RgbImage::new(20, 20);
        let sprite = Sprite::new(RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255])), Point::new(0.0, 0.0));
        place(&mut canvas, &sprite, Point::new(5.0, 7.0), 0.0, 4).unwrap();
        assert_eq!(canvas.get_pixel(5, 7), &Rgb([255, 0, 0]));
        assert_eq!(canvas.get_pixel(4, 7), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(5, 6), &Rgb([0, 0, 0]));
        assert_eq!(canvas.get_pixel(8, 10), &Rgb([255, 0, 0]));
        assert_eq!(canvas.get_pixel(9, 10), &Rgb([0, 0, 0]));
    }

    #[test]
    fn sprite_is_left_untouched() {
        let mut canvas = RgbImage::new(30, 30);
        let sprite = Sprite::new(RgbaImage::from_pixel(6, 3, Rgba([1, 2, 3, 200])), Point::new(3.0, 1.0));
        let before = sprite.image.clone();
        place(&mut canvas, &sprite, Point::new(15.0, 15.0), 33.0, 12).unwrap();
        assert_eq!(sprite.image, before);
    }

    #[test]
    fn zero_width_is_an_error() {
        let mut canvas = RgbImage::new(8, 8);
        let sprite = Sprite::new(RgbaImage::new(4, 4), Point::new(2.0, 2.0));
        assert!(place(&mut canvas, &sprite, Point::new(4.0, 4.0), 0.0, 0).is_err());
    }

    #[test]
    fn huge_destination_is_a_noop() {
        let mut canvas = RgbImage::new(8, 8);
        let sprite = Sprite::new(RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])), Point::new(2.0, 2.0));
        for dest in [Point::new(1e30, -1e30), Point::new(f64::MAX, f64::MIN), Point::new(-1e300, 4.0)] {
            place(&mut canvas, &sprite, dest, 20.0, 4).unwrap();
        }
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn prepare_leaves_canvas_alone_until_drawn() {
        let sprite = Sprite::new(RgbaImage::from_pixel(4, 4, Rgba([7, 7, 7, 255])), Point::new(0.0, 0.0));
        let ready = prepare(&sprite, Point::new(3.0, 2.0), 0.0, 4).unwrap();
        assert_eq!(ready.offset, (3, 2));
        let mut canvas = RgbImage::new(8, 8);
        ready.draw(&mut canvas);
        assert_eq!(canvas.get_pixel(3, 2), &Rgb([7, 7, 7]));
    }
}
