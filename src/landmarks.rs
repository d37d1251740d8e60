//! Facial landmark record and the geometry derived from it.
//!
//! Point order inside each feature follows the upstream detector:
//! `chin[0]` and `chin[last]` are the jaw extremes, `nose_bridge[0]` is the
//! top of the bridge.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Point;

/// The three features the mask needs. Other detector keys are ignored on load;
/// a missing one fails deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub chin: Vec<Point>,
    pub nose_bridge: Vec<Point>,
    pub nose_tip: Vec<Point>,
}

impl FaceLandmarks {
    pub fn new(chin: Vec<Point>, nose_bridge: Vec<Point>, nose_tip: Vec<Point>) -> Result<Self> {
        let face = Self { chin, nose_bridge, nose_tip };
        face.validate()?;
        Ok(face)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, points) in [
            ("chin", &self.chin),
            ("nose_bridge", &self.nose_bridge),
            ("nose_tip", &self.nose_tip),
        ] {
            if points.is_empty() {
                return Err(Error::Landmarks(format!("feature `{name}` has no points")));
            }
        }
        Ok(())
    }

    /// Every consumed feature, for debug drawing.
    pub fn features(&self) -> [&[Point]; 3] {
        [&self.chin[..], &self.nose_bridge[..], &self.nose_tip[..]]
    }
}

/// Arithmetic mean of the points, `None` for an empty slice.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Point::default(), |acc, &p| acc + p);
    Some(sum.scale(1.0 / points.len() as f64))
}

fn endpoints(points: &[Point], feature: &str) -> Result<(Point, Point)> {
    match points {
        [first, .., last] => Ok((*first, *last)),
        _ => Err(Error::Geometry(format!(
            "`{feature}` needs at least two points, got {}",
            points.len()
        ))),
    }
}

/// Distance between the jaw extremes; the apparent face width.
pub fn face_width(face: &FaceLandmarks) -> Result<f64> {
    let (left, right) = endpoints(&face.chin, "chin")?;
    let width = left.distance(right);
    if width <= f64::EPSILON {
        return Err(Error::Geometry("chin extremes coincide".into()));
    }
    Ok(width)
}

/// Head tilt in degrees from the nose bridge direction.
///
/// 0 for an upright face. Positive when the top of the bridge leans to the
/// viewer's left, i.e. the head is turned counter-clockwise on screen, which
/// matches the rotation sense of [`crate::rotate::rotate`]. Range (-180, 180].
pub fn face_angle(face: &FaceLandmarks) -> Result<f64> {
    let (top, bottom) = endpoints(&face.nose_bridge, "nose_bridge")?;
    let v = top - bottom;
    let len = v.norm();
    if len <= f64::EPSILON {
        return Err(Error::Geometry("nose bridge has zero length".into()));
    }
    let (x, y) = (v.x / len, v.y / len);
    // Upright: v points up the image, (0, -1).
    let degrees = (-x).atan2(-y).to_degrees();
    Ok(if degrees <= -180.0 { degrees + 360.0 } else { degrees })
}

/// Nose tip centroid truncated to whole pixels; the beard's destination.
pub fn nose_tip(face: &FaceLandmarks) -> Result<Point> {
    let c = centroid(&face.nose_tip).ok_or_else(|| Error::Geometry("`nose_tip` has no points".into()))?;
    let (x, y) = c.truncate();
    Ok(Point::new(x as f64, y as f64))
}

/// Midpoint of the chin extremes truncated to whole pixels; the hat's
/// destination. The hat sprite's anchor is authored against this point,
/// so it stays chin-based rather than using the brows.
pub fn chin_midpoint(face: &FaceLandmarks) -> Result<Point> {
    let (left, right) = endpoints(&face.chin, "chin")?;
    let (x, y) = left.midpoint(right).truncate();
    Ok(Point::new(x as f64, y as f64))
}

/// Everything needed to decorate one face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePlacement {
    pub width: f64,
    pub angle: f64,
    pub hat_at: Point,
    pub beard_at: Point,
}

impl FacePlacement {
    pub fn from_landmarks(face: &FaceLandmarks) -> Result<Self> {
        Ok(Self {
            width: face_width(face)?,
            angle: face_angle(face)?,
            hat_at: chin_midpoint(face)?,
            beard_at: nose_tip(face)?,
        })
    }
}
