use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Decorator that runs detection every N frames, reusing results in between.
///
/// Detection happens when the 8-bit iteration counter, read before it is
/// incremented, is a multiple of the ratio: iterations 0, N, 2N, ... On the
/// other iterations the boxes from the most recent real detection are
/// returned unchanged, even if the face has moved since. The counter wraps
/// at 256 like the `u8` it is.
pub struct SkipFrameDetector {
    inner: Box<dyn FaceDetector>,
    detection_ratio: u8,
    iteration_count: u8,
    last_faces: Vec<FaceBox>,
}

impl SkipFrameDetector {
    pub fn new(inner: Box<dyn FaceDetector>, detection_ratio: u8) -> Result<Self, &'static str> {
        if detection_ratio < 1 {
            return Err("detection_ratio must be >= 1");
        }
        Ok(Self {
            inner,
            detection_ratio,
            iteration_count: 0,
            last_faces: Vec::new(),
        })
    }

    /// Boxes currently held for reuse.
    pub fn cached_faces(&self) -> &[FaceBox] {
        &self.last_faces
    }
}

impl FaceDetector for SkipFrameDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        let iteration = self.iteration_count;
        self.iteration_count = self.iteration_count.wrapping_add(1);

        if iteration % self.detection_ratio == 0 {
            self.last_faces = self.inner.detect(frame)?;
        }
        Ok(self.last_faces.clone())
    }
}
