// Opens a camera and hands out decoded RGB frames.
// The mask draws straight onto these; the window gets a packed copy.

use crate::error::Error;
use crate::stream::FrameSource;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::RgbImage;
use image::imageops::{self, FilterType};
use log::info;

// A small wrapper around nokhwa::Camera so the frame loop stays clean.
// Frames always come out at the requested size, whatever the driver picked.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

/// Scale `frame` to exactly `width × height`; a frame already that size is passed through.
fn fit_to_size(frame: RgbImage, width: u32, height: u32) -> RgbImage {
    if frame.dimensions() == (width, height) {
        return frame;
    }
    imageops::resize(&frame, width, height, FilterType::Triangle)
}

impl CameraCapture {
    /// Open camera `index` at a target resolution. The driver may stream a
    /// nearby size; frames are rescaled to the target either way.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::CameraInit(format!("Capture size {width}x{height} is empty")));
        }
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // Ask for RGB frames, closest to our requested format.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        if (actual.width(), actual.height()) != (width, height) {
            info!(
                "Camera streams {}x{}; frames will be scaled to {width}x{height}",
                actual.width(),
                actual.height()
            );
        }

        Ok(Self { cam, width, height })
    }

    /// Grab one frame (blocks until the camera delivers) and decode it to RGB.
    pub fn next_frame(&mut self) -> Result<RgbImage, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // Rebuild through the raw bytes so we don't depend on nokhwa's `image` version.
        let (w, h) = rgb.dimensions();
        let frame = RgbImage::from_raw(w, h, rgb.into_raw())
            .ok_or_else(|| Error::CameraFrame(format!("Short RGB buffer for {w}x{h}")))?;
        Ok(fit_to_size(frame, self.width, self.height))
    }

    /// Size of every frame `next_frame` returns.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl FrameSource for CameraCapture {
    // A live camera never ends on its own; failures surface as errors.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, Error> {
        CameraCapture::next_frame(self).map(Some)
    }
}
