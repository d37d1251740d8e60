// Aspect-preserving resize that carries an anchor point along.

use std::borrow::Cow;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::error::{Error, Result};
use crate::types::Point;

/// Resize to `width` (or, failing that, `height`) keeping the aspect ratio.
///
/// Width wins when both are given. With neither, the image is returned
/// borrowed and untouched along with the anchor. The anchor, if any, is scaled
/// by the same ratio on both axes.
pub fn resize(
    image: &RgbaImage,
    width: Option<u32>,
    height: Option<u32>,
    anchor: Option<Point>,
) -> Result<(Cow<'_, RgbaImage>, Option<Point>)> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(Error::Geometry(format!("cannot resize an empty {w}x{h} image")));
    }

    let (r, dim) = match (width, height) {
        (Some(tw), _) => {
            let r = tw as f64 / w as f64;
            (r, (tw, (h as f64 * r).round() as u32))
        }
        (None, Some(th)) => {
            let r = th as f64 / h as f64;
            (r, ((w as f64 * r).round() as u32, th))
        }
        (None, None) => return Ok((Cow::Borrowed(image), anchor)),
    };

    if dim.0 == 0 || dim.1 == 0 {
        return Err(Error::Geometry(format!(
            "resize of {w}x{h} collapses to {}x{}",
            dim.0, dim.1
        )));
    }

    // Triangle widens its support when shrinking, so downscales average.
    let resized = imageops::resize(image, dim.0, dim.1, FilterType::Triangle);
    Ok((Cow::Owned(resized), anchor.map(|a| a.scale(r))))
}
