use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

use super::ffmpeg_frames::DecodeSession;

/// Capture-device input format name and device URL for the current platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraSource {
    pub format: &'static str,
    pub device: PathBuf,
}

impl CameraSource {
    /// Camera `index` through the platform capture API.
    ///
    /// - Linux: `v4l2` on `/dev/video<N>`
    /// - macOS: `avfoundation` device `<N>`
    /// - Windows: `dshow`, which addresses devices by name; pass
    ///   `video=<name>` via [`CameraSource::with_device`] instead.
    pub fn for_index(index: usize) -> Self {
        #[cfg(target_os = "linux")]
        {
            Self {
                format: "v4l2",
                device: PathBuf::from(format!("/dev/video{index}")),
            }
        }
        #[cfg(target_os = "macos")]
        {
            Self {
                format: "avfoundation",
                device: PathBuf::from(index.to_string()),
            }
        }
        #[cfg(target_os = "windows")]
        {
            Self {
                format: "dshow",
                device: PathBuf::from(format!("video={index}")),
            }
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            Self {
                format: "video4linux2",
                device: PathBuf::from(format!("/dev/video{index}")),
            }
        }
    }

    /// Same platform input format, explicit device URL.
    pub fn with_device(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
            ..Self::for_index(0)
        }
    }
}

/// Reads live frames from a capture device through libavdevice.
///
/// Frames are converted to RGB24. The device stays open until `close` or
/// drop; the frame iterator ends only if the device stops delivering.
pub struct FfmpegCameraReader {
    format: &'static str,
    session: Option<DecodeSession>,
}

// Safety: FfmpegCameraReader is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegCameraReader {}

impl FfmpegCameraReader {
    /// `format` is the libavdevice input name, e.g. `v4l2`.
    pub fn new(format: &'static str) -> Self {
        Self {
            format,
            session: None,
        }
    }
}

fn find_input_format(name: &str) -> Option<ffmpeg_next::format::format::Input> {
    ffmpeg_next::device::input::video().find(|fmt| fmt.name() == name)
}

impl VideoReader for FfmpegCameraReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        ffmpeg_next::device::register_all();

        let input_format = find_input_format(self.format)
            .ok_or_else(|| format!("Capture input format '{}' is not available", self.format))?;
        let ictx = ffmpeg_next::format::open_with(
            path,
            &ffmpeg_next::format::format::Format::Input(input_format),
            ffmpeg_next::Dictionary::new(),
        )?
        .input();

        let session = DecodeSession::new(ictx)?;
        let metadata = VideoMetadata {
            width: session.width(),
            height: session.height(),
            fps: session.fps(),
            total_frames: None,
            codec: session.codec().to_string(),
            source_path: Some(path.to_path_buf()),
        };
        log::info!(
            "Opened camera {} via {} ({}x{} @ {:.1} fps)",
            path.display(),
            self.format,
            metadata.width,
            metadata.height,
            metadata.fps
        );
        self.session = Some(session);
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(session) = self.session.as_mut() else {
            return Box::new(std::iter::once(Err("FfmpegCameraReader: not opened".into())));
        };
        Box::new(std::iter::from_fn(move || session.next_frame()))
    }

    fn close(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Released camera");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_for_index_uses_v4l2_device_node() {
        let source = CameraSource::for_index(2);
        assert_eq!(source.format, "v4l2");
        assert_eq!(source.device, PathBuf::from("/dev/video2"));
    }

    #[test]
    fn test_with_device_keeps_platform_format() {
        let source = CameraSource::with_device("video=Integrated Camera");
        assert_eq!(source.format, CameraSource::for_index(0).format);
        assert_eq!(source.device, PathBuf::from("video=Integrated Camera"));
    }

    #[test]
    fn test_frames_without_open_returns_error() {
        let mut reader = FfmpegCameraReader::new("v4l2");
        assert!(reader.frames().next().unwrap().is_err());
    }

    #[test]
    fn test_open_missing_device_fails() {
        let source = CameraSource::with_device("/dev/facemark-no-such-camera");
        let mut reader = FfmpegCameraReader::new(source.format);
        assert!(reader.open(&source.device).is_err());
        reader.close();
    }

    #[test]
    fn test_unknown_input_format_fails() {
        let mut reader = FfmpegCameraReader::new("no-such-capture-api");
        let err = reader.open(Path::new("/dev/video0")).unwrap_err();
        assert!(err.to_string().contains("no-such-capture-api"));
    }
}
