use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

use super::face_landmarks::FaceLandmarks;

/// Domain interface for fitting facial landmarks inside a detected face box.
pub trait LandmarkPredictor: Send {
    fn predict(
        &self,
        frame: &Frame,
        face: &FaceBox,
    ) -> Result<FaceLandmarks, Box<dyn std::error::Error>>;
}
