//! Window and command-line glue shared by the `face-detection` and
//! `face-pose` binaries.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use facemark_core::detection::domain::face_detector::FaceDetector;
use facemark_core::detection::infrastructure::ert_shape_predictor::ErtShapePredictor;
use facemark_core::shared::video_metadata::VideoMetadata;
use facemark_core::video::domain::video_reader::VideoReader;

pub mod presenter;

pub const CAMERA_UNAVAILABLE: &str = "Unable to connect to the camera.";

/// Logs model download progress on one updating stderr line.
pub fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

/// Rejects a detection confidence outside `0.0..=1.0`.
pub fn validate_confidence(confidence: f64) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(format!("Confidence must be between 0.0 and 1.0, got {confidence}").into());
    }
    Ok(())
}

/// Opens the capture device. When it cannot be opened the camera line is
/// printed to `out` and `Ok(None)` is returned; only write failures are errors.
pub fn open_camera(
    reader: &mut dyn VideoReader,
    device: &Path,
    out: &mut dyn Write,
) -> io::Result<Option<VideoMetadata>> {
    match reader.open(device) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) => {
            log::debug!("Camera open failed for {}: {e}", device.display());
            writeln!(out, "{CAMERA_UNAVAILABLE}")?;
            Ok(None)
        }
    }
}

/// Falls back to the `.bz2` download next to `path` when the uncompressed
/// model is absent.
pub fn locate_landmark_model(path: &Path) -> PathBuf {
    if path.exists() {
        return path.to_path_buf();
    }
    let mut compressed = path.as_os_str().to_owned();
    compressed.push(".bz2");
    let compressed = PathBuf::from(compressed);
    if compressed.exists() {
        compressed
    } else {
        path.to_path_buf()
    }
}

/// Loads the landmark model, then builds the detector. The detector is not
/// built at all when the landmark model is unavailable.
pub fn load_live_models<F>(
    landmark_model: &Path,
    build_detector: F,
) -> Result<(ErtShapePredictor, Box<dyn FaceDetector>), Box<dyn std::error::Error>>
where
    F: FnOnce() -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>>,
{
    let landmark_path = locate_landmark_model(landmark_model);
    log::info!("Loading landmark model {}", landmark_path.display());
    let predictor = ErtShapePredictor::load(&landmark_path)?;
    let detector = build_detector()?;
    Ok((predictor, detector))
}
