//! Overlay a hat and a beard on faces in video frames.
//!
//! The core is the geometric compositing pipeline: bounding rotation,
//! anchor-carrying resize, clipped alpha blending and anchored placement,
//! driven by a few measurements taken from facial landmarks. Landmark
//! detection happens upstream; frames come from a camera or an image
//! sequence.

pub mod camera;
pub mod composite;
pub mod config;
pub mod detector;
pub mod draw;
pub mod error;
pub mod landmarks;
pub mod mask;
pub mod placement;
pub mod resize;
pub mod rotate;
pub mod stream;
pub mod types;

pub use composite::{blend, intersect};
pub use config::Config;
pub use detector::{LandmarkDetector, NoFaces, ReplayDetector};
pub use error::{Error, Result};
pub use landmarks::{FaceLandmarks, FacePlacement, centroid, chin_midpoint, face_angle, face_width, nose_tip};
pub use mask::SantaMask;
pub use placement::{Prepared, place, prepare};
pub use resize::resize;
pub use rotate::{Rotated, rotate};
pub use types::{Affine, Point, Rect, Sprite};
