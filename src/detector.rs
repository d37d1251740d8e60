// Landmark input. Detection itself happens upstream; this crate only
// consumes its per-frame output.

use std::fs;
use std::path::Path;

use image::RgbImage;
use log::{debug, info};

use crate::error::{Error, Result};
use crate::landmarks::FaceLandmarks;

/// Anything that can hand over the faces found in a frame.
pub trait LandmarkDetector {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<FaceLandmarks>>;
}

/// Detector used when no landmark data is available: never finds a face.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFaces;

impl LandmarkDetector for NoFaces {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<FaceLandmarks>> {
        Ok(Vec::new())
    }
}

/// Replays recorded detector output: the i-th call returns frame i's faces.
/// Past the end of the recording it returns no faces.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    frames: Vec<Vec<FaceLandmarks>>,
    next: usize,
}

impl ReplayDetector {
    pub fn new(frames: Vec<Vec<FaceLandmarks>>) -> Self {
        Self { frames, next: 0 }
    }

    /// Load a JSON array (one entry per frame) of arrays of feature mappings.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let frames: Vec<Vec<FaceLandmarks>> = serde_json::from_str(&content)
            .map_err(|e| Error::Landmarks(format!("{}: {e}", path.display())))?;
        info!("Loaded landmarks for {} frames from {}", frames.len(), path.display());
        Ok(Self::new(frames))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl LandmarkDetector for ReplayDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<FaceLandmarks>> {
        let faces = self.frames.get(self.next).cloned().unwrap_or_default();
        if self.next == self.frames.len() {
            debug!("Landmark recording exhausted after {} frames", self.next);
        }
        self.next += 1;
        Ok(faces)
    }
}
