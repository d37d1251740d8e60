// Frame loops: a live camera shown in a window, or a directory of frames
// written back out. Both run detect -> mask -> output one frame at a time.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::RgbImage;
use log::{debug, error, info, warn};

use crate::camera::CameraCapture;
use crate::config::CaptureConfig;
use crate::detector::LandmarkDetector;
use crate::draw::Drawer;
use crate::error::{Error, Result};
use crate::mask::SantaMask;
use crate::types::FrameBuffer;

/// Where frames come from. `Ok(None)` means the stream is over.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// Frames stored as image files in one directory, read in file-name order.
#[derive(Debug)]
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next: usize,
}

impl ImageSequence {
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            })
            .collect();
        paths.sort();
        Ok(Self { paths, next: 0 })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Path of the frame the last `next_frame` call returned (or failed on).
    pub fn current_path(&self) -> Option<&Path> {
        self.next.checked_sub(1).and_then(|i| self.paths.get(i)).map(PathBuf::as_path)
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        Ok(Some(image::open(path)?.to_rgb8()))
    }
}

/// Consecutive camera read failures tolerated before live mode gives up.
const MAX_FRAME_FAILURES: u32 = 100;
/// Pause between retries of a failed camera read.
const RETRY_DELAY: Duration = Duration::from_millis(10);

/// Tracks a run of failed reads; any good frame clears it.
#[derive(Debug, Clone, Copy)]
struct FailureStreak {
    count: u32,
    limit: u32,
}

impl FailureStreak {
    fn new(limit: u32) -> Self {
        Self { count: 0, limit }
    }

    /// Record one failure. False once the streak exceeds the limit.
    fn fail(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        self.count <= self.limit
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

/// Counts of what a file run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub skipped: usize,
    pub faces: usize,
}

/// Decorate every frame of `input` and write PNGs with the same stem to `output`.
///
/// An input directory that can't be opened is logged and the run ends cleanly.
/// Frames that fail to decode are logged and skipped.
pub fn run_sequence(
    input: &Path,
    output: &Path,
    mask: &SantaMask,
    detector: &mut dyn LandmarkDetector,
) -> Result<RunSummary> {
    let mut source = match ImageSequence::open(input) {
        Ok(s) => s,
        Err(e) => {
            error!("could not open input {}: {e}", input.display());
            return Ok(RunSummary::default());
        }
    };
    fs::create_dir_all(output)?;
    info!("Input frame count: {} ({})", source.len(), input.display());

    let mut summary = RunSummary::default();
    loop {
        let mut frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                let name = source.current_path().map(|p| p.display().to_string()).unwrap_or_default();
                warn!("Skipping unreadable frame {name}: {e}");
                summary.skipped += 1;
                continue;
            }
        };

        let faces = detector.detect(&frame)?;
        summary.faces += mask.apply(&mut frame, &faces);

        let stem = source
            .current_path()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| format!("frame_{:06}", summary.frames).into());
        let out_path = output.join(stem).with_extension("png");
        frame.save(&out_path)?;
        debug!("Wrote {}", out_path.display());
        summary.frames += 1;
    }

    info!(
        "Done! {} frames written, {} skipped, {} faces decorated",
        summary.frames, summary.skipped, summary.faces
    );
    Ok(summary)
}

/// Live mode: camera in, window out. Escape or closing the window stops.
///
/// A camera that can't be opened is logged and the run ends cleanly.
/// A failed frame read is logged and retried after a short pause, with the
/// window still serviced; a long enough run of failures ends the run too.
pub fn run_camera(
    capture: &CaptureConfig,
    mask: &SantaMask,
    detector: &mut dyn LandmarkDetector,
) -> Result<()> {
    let mut cam = match CameraCapture::new(capture.camera_index, capture.width, capture.height) {
        Ok(cam) => cam,
        Err(e) => {
            error!("{e}");
            return Ok(());
        }
    };
    let (w, h) = cam.resolution();
    info!("Capture {} started @ {}x{}", capture.camera_index, w, h);

    let mut drawer = Drawer::new("Santa Mask", w as usize, h as usize)?;

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut failures = FailureStreak::new(MAX_FRAME_FAILURES);

    while drawer.is_open() && !drawer.esc_pressed() {
        let mut frame = match FrameSource::next_frame(&mut cam) {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e @ Error::CameraFrame(_)) => {
                if !failures.fail() {
                    error!("{e}; giving up after {MAX_FRAME_FAILURES} failed reads in a row");
                    break;
                }
                warn!("{e}; retrying");
                drawer.update();
                std::thread::sleep(RETRY_DELAY);
                continue;
            }
            Err(e) => return Err(e),
        };
        failures.reset();

        let faces = detector.detect(&frame)?;
        mask.apply(&mut frame, &faces);
        drawer.present(&FrameBuffer::from_rgb(&frame))?;

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            info!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
