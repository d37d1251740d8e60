// One error type for the whole crate.
// Every variant states *where* things went wrong.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed

    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed

    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed

    /// A sprite image could not be read or decoded. Fatal at startup.
    #[error("Asset load error: {}: {source}", path.display())]
    AssetLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Degenerate face geometry (zero-length vectors, missing points, zero sizes).
    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Landmark data error: {0}")]
    Landmarks(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
