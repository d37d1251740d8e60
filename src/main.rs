//! Santa mask: decorate faces from a camera or a directory of frames.
//
// What you SEE:
// • Camera mode: a window with the live feed, hat and beard on every face. ESC quits.
// • File mode (--input/--output): every frame written back out, decorated.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use santa_mask::config::Config;
use santa_mask::detector::{LandmarkDetector, NoFaces, ReplayDetector};
use santa_mask::mask::SantaMask;
use santa_mask::stream::{run_camera, run_sequence};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use (overrides the config file)
    #[arg(long)]
    camera: Option<u32>,

    /// Directory of input frames (file mode)
    #[arg(short, long, requires = "output")]
    input: Option<PathBuf>,

    /// Directory for decorated frames (file mode)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Recorded detector output (JSON, one array of faces per frame)
    #[arg(short, long)]
    landmarks: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Enable debug output and landmark overlay
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(index) = args.camera {
        config.capture.camera_index = index;
    }
    config.validate()?;

    // Without the sprites there is nothing to draw.
    let mask = SantaMask::from_config(&config)
        .context("loading accessory sprites")?
        .with_debug(args.debug);

    let mut detector: Box<dyn LandmarkDetector> = match &args.landmarks {
        Some(path) => Box::new(ReplayDetector::from_file(path)?),
        None => {
            warn!("No landmark data given; frames pass through undecorated");
            Box::new(NoFaces)
        }
    };

    match (args.input, args.output) {
        (Some(input), Some(output)) => {
            run_sequence(&input, &output, &mask, detector.as_mut())?;
        }
        _ => run_camera(&config.capture, &mask, detector.as_mut())?,
    }

    Ok(())
}
