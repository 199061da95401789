//! Face box and landmark outline drawing on top of an [`OverlayCanvas`].

use crate::detection::domain::face_landmarks::{FaceLandmarks, FacialFeature};
use crate::shared::face_box::{region_from_face_box, FaceBox};

use super::overlay_canvas::{Color, OverlayCanvas};

pub const FACE_BOX_COLOR: Color = Color::RED;
pub const LANDMARK_COLOR: Color = Color::GREEN;

pub fn draw_face_boxes(canvas: &mut dyn OverlayCanvas, faces: &[FaceBox], thickness: u32) {
    for face in faces.iter().filter(|f| !f.is_empty()) {
        canvas.draw_rectangle(&region_from_face_box(face), FACE_BOX_COLOR, thickness);
    }
}

/// One polyline per facial feature, in [`FacialFeature::ALL`] order.
pub fn draw_landmarks(canvas: &mut dyn OverlayCanvas, landmarks: &FaceLandmarks) {
    for feature in FacialFeature::ALL {
        canvas.draw_polyline(
            landmarks.feature_points(feature),
            feature.is_closed(),
            LANDMARK_COLOR,
        );
    }
}
