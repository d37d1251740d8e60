// Per-face hat + beard placement against one shared frame.

use image::{Rgb, RgbImage};
use log::{debug, warn};

use crate::config::Config;
use crate::draw::draw_polyline;
use crate::error::Result;
use crate::landmarks::{FaceLandmarks, FacePlacement};
use crate::placement::prepare;
use crate::types::Sprite;

const DEBUG_COLOR: Rgb<u8> = Rgb([255, 0, 255]);

/// Owns the two accessory sprites. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct SantaMask {
    pub hat: Sprite,
    pub beard: Sprite,
    pub hat_factor: f64,
    pub beard_factor: f64,
    pub debug: bool,
}

impl SantaMask {
    pub fn new(hat: Sprite, beard: Sprite) -> Self {
        let defaults = Config::default();
        Self {
            hat,
            beard,
            hat_factor: defaults.hat.width_factor,
            beard_factor: defaults.beard.width_factor,
            debug: false,
        }
    }

    /// Load both sprites named by the configuration. Any asset failure is fatal.
    pub fn from_config(config: &Config) -> Result<Self> {
        let hat = Sprite::load(&config.hat.path, config.hat.anchor)?;
        let beard = Sprite::load(&config.beard.path, config.beard.anchor)?;
        Ok(Self {
            hat,
            beard,
            hat_factor: config.hat.width_factor,
            beard_factor: config.beard.width_factor,
            debug: false,
        })
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Decorate one face: hat at the chin midpoint, beard at the nose tip,
    /// both turned by the face angle.
    pub fn apply_for_face(&self, frame: &mut RgbImage, face: &FaceLandmarks) -> Result<()> {
        let p = FacePlacement::from_landmarks(face)?;
        let hat_width = (p.width * self.hat_factor).round() as u32;
        let beard_width = (p.width * self.beard_factor).round() as u32;

        // Both sprites must be ready before either touches the frame.
        let hat = prepare(&self.hat, p.hat_at, p.angle, hat_width)?;
        let beard = prepare(&self.beard, p.beard_at, p.angle, beard_width)?;
        hat.draw(frame);
        beard.draw(frame);

        if self.debug {
            debug!("Angle: {:.2}°", p.angle);
            for feature in face.features() {
                draw_polyline(frame, feature, DEBUG_COLOR);
            }
        }
        Ok(())
    }

    /// Decorate every face in place. Faces with unusable geometry are skipped.
    /// Returns how many faces were decorated.
    pub fn apply(&self, frame: &mut RgbImage, faces: &[FaceLandmarks]) -> usize {
        if self.debug {
            debug!("{} faces found.", faces.len());
        }

        let mut done = 0;
        for (i, face) in faces.iter().enumerate() {
            match self.apply_for_face(frame, face) {
                Ok(()) => done += 1,
                Err(e) => warn!("Skipping face {i}: {e}"),
            }
        }
        done
    }
}
