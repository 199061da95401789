use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

use super::ffmpeg_frames::DecodeSession;

/// Adapts a single image file to the [`VideoReader`] interface.
///
/// The image is decoded eagerly on `open` with ffmpeg and yielded as the only
/// frame (`fps = 0`, `total_frames = Some(1)`).
pub struct ImageFileReader {
    frame: Option<Frame>,
}

impl ImageFileReader {
    pub fn new() -> Self {
        Self { frame: None }
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoReader for ImageFileReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)
            .map_err(|e| format!("Unable to open {}: {e}", path.display()))?;
        let mut session = DecodeSession::new(ictx)?;
        let frame = session
            .next_frame()
            .ok_or_else(|| format!("Failed to decode image {}", path.display()))??;

        let metadata = VideoMetadata {
            width: frame.width(),
            height: frame.height(),
            fps: 0.0,
            total_frames: Some(1),
            codec: session.codec().to_string(),
            source_path: Some(path.to_path_buf()),
        };
        log::debug!(
            "Decoded {} ({}x{}, {})",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.codec
        );
        self.frame = Some(frame);
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        if self.frame.is_none() {
            return Box::new(std::iter::once(Err("ImageFileReader: not opened".into())));
        }
        Box::new(self.frame.take().into_iter().map(Ok))
    }

    fn close(&mut self) {
        self.frame = None;
    }
}
