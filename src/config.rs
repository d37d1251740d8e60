//! Configuration: sprite assets, their anchors and size factors, capture settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Point;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hat sprite, placed at the chin midpoint
    pub hat: SpriteConfig,

    /// Beard sprite, placed at the nose tip
    pub beard: SpriteConfig,

    /// Camera settings
    pub capture: CaptureConfig,
}

/// One accessory sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Image file with an alpha channel
    pub path: PathBuf,

    /// Pixel of the unscaled image that lands on the face point
    pub anchor: Point,

    /// Sprite width as a multiple of the face width
    pub width_factor: f64,
}

/// Camera capture parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub camera_index: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hat: SpriteConfig {
                path: PathBuf::from("data/hat.png"),
                anchor: Point::new(322.0, 450.0),
                width_factor: 1.7,
            },
            beard: SpriteConfig {
                path: PathBuf::from("data/beard.png"),
                anchor: Point::new(606.0, 85.0),
                width_factor: 1.1,
            },
            capture: CaptureConfig::default(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { camera_index: 0, width: 640, height: 480 }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, sprite) in [("hat", &self.hat), ("beard", &self.beard)] {
            if !sprite.width_factor.is_finite() || sprite.width_factor <= 0.0 {
                return Err(Error::Config(format!("{name} width factor must be positive")));
            }
            if !sprite.anchor.x.is_finite() || !sprite.anchor.y.is_finite() {
                return Err(Error::Config(format!("{name} anchor must be finite")));
            }
        }

        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(Error::Config("Capture size must be non-zero".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Santa mask configuration

hat:
  path: "data/hat.png"
  anchor: [322, 450]
  width_factor: 1.7

beard:
  path: "data/beard.png"
  anchor: [606, 85]
  width_factor: 1.1

capture:
  camera_index: 0
  width: 640
  height: 480
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_matches_defaults() {
        let cfg: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(cfg, Config::default());
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("capture:\n  width: 320\n").unwrap();
        assert_eq!(cfg.capture.width, 320);
        assert_eq!(cfg.capture.height, 480);
        assert_eq!(cfg.hat, Config::default().hat);
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.beard.width_factor = 0.0;
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));

        let mut cfg = Config::default();
        cfg.capture.height = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.hat.anchor = Point::new(f64::NAN, 0.0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!("santa_mask_cfg_{}.yaml", std::process::id()));
        let mut cfg = Config::default();
        cfg.capture.camera_index = 2;
        cfg.to_file(&path).unwrap();
        let back = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn garbage_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("santa_mask_bad_cfg_{}.yaml", std::process::id()));
        std::fs::write(&path, "hat: [1, 2").unwrap();
        let res = Config::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(Config::from_file("/nonexistent/santa.yaml"), Err(Error::Io(_))));
    }
}
