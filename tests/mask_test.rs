//! End-to-end: recorded landmarks -> mask -> decorated frames on disk.

use std::fs;
use std::path::PathBuf;

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use santa_mask::config::Config;
use santa_mask::stream::run_sequence;
use santa_mask::{FaceLandmarks, LandmarkDetector, ReplayDetector, SantaMask};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("santa_mask_it_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const TILTED_FACE: &str = r#"{
    "chin": [[60, 80], [80, 120], [120, 120], [140, 80]],
    "nose_bridge": [[90, 60], [100, 90]],
    "nose_tip": [[96, 98], [100, 100], [104, 98]],
    "left_eyebrow": [[70, 55], [85, 50]]
}"#;

#[test]
fn config_driven_mask_decorates_replayed_frames() {
    let dir = scratch("e2e");
    let input = dir.join("in");
    let output = dir.join("out");
    fs::create_dir_all(&input).unwrap();

    // Sprites on disk, referenced by a config file.
    RgbaImage::from_pixel(60, 30, Rgba([200, 0, 0, 255])).save(dir.join("hat.png")).unwrap();
    RgbaImage::from_pixel(60, 30, Rgba([250, 250, 250, 255])).save(dir.join("beard.png")).unwrap();
    let mut config = Config::default();
    config.hat.path = dir.join("hat.png");
    config.hat.anchor = santa_mask::Point::new(30.0, 30.0);
    config.beard.path = dir.join("beard.png");
    config.beard.anchor = santa_mask::Point::new(30.0, 0.0);
    let cfg_path = dir.join("santa.yaml");
    config.to_file(&cfg_path).unwrap();
    let config = Config::from_file(&cfg_path).unwrap();
    config.validate().unwrap();
    let mask = SantaMask::from_config(&config).unwrap();

    // Two frames: the first has a face, the second does not.
    for name in ["0001.png", "0002.png"] {
        RgbImage::from_pixel(200, 200, Rgb([10, 60, 10])).save(input.join(name)).unwrap();
    }
    let recording = format!("[[{TILTED_FACE}], []]");
    let lm_path = dir.join("landmarks.json");
    fs::write(&lm_path, recording).unwrap();
    let mut detector = ReplayDetector::from_file(&lm_path).unwrap();

    let summary = run_sequence(&input, &output, &mask, &mut detector).unwrap();
    assert_eq!((summary.frames, summary.skipped, summary.faces), (2, 0, 1));

    let first = image::open(output.join("0001.png")).unwrap().to_rgb8();
    let second = image::open(output.join("0002.png")).unwrap().to_rgb8();
    assert!(second.pixels().all(|p| *p == Rgb([10, 60, 10])));

    // Chin midpoint (100, 80): just above is hat, just below the nose tip is beard.
    assert_eq!(first.get_pixel(100, 74), &Rgb([200, 0, 0]));
    assert_eq!(first.get_pixel(100, 108), &Rgb([250, 250, 250]));
    assert_eq!(first.get_pixel(2, 198), &Rgb([10, 60, 10]));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn mask_follows_head_tilt() {
    let face: FaceLandmarks = serde_json::from_str(TILTED_FACE).unwrap();
    let angle = santa_mask::face_angle(&face).unwrap();
    // Bridge top leans left: counter-clockwise, about 18.4 degrees.
    assert!((angle - 18.434_948_8).abs() < 1e-6, "{angle}");

    let mut detector = ReplayDetector::new(vec![vec![face.clone()]]);
    let faces = detector.detect(&RgbImage::new(1, 1)).unwrap();
    assert_eq!(faces, vec![face]);
}
