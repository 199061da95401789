pub mod face_overlay;
pub mod overlay_canvas;
