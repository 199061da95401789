use std::path::PathBuf;

/// Properties of an opened frame source.
///
/// Still images report `fps = 0.0` and `total_frames = Some(1)`; live
/// capture devices have no known length and report `total_frames = None`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: Option<usize>,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    pub fn is_live(&self) -> bool {
        self.total_frames.is_none()
    }
}
