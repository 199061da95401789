use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Source of frames: a still image, or a live capture device.
///
/// `path` is whatever the implementation addresses its source by (a file
/// path, or a device URL such as `/dev/video0`).
pub trait VideoReader: Send {
    /// Opens the source and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Lazily yields frames in capture/decode order. Live sources never end
    /// on their own; an `Err` item or `None` means the source failed.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases the underlying handle. Safe to call more than once.
    fn close(&mut self);
}
