pub mod face_detector;
pub mod face_landmarks;
pub mod landmark_predictor;
