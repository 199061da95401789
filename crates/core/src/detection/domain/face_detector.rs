use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Returned boxes are in the pixel grid of `frame`. Implementations may be
/// stateful (e.g., caching across frames), hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>>;
}
