pub mod dlib_model_reader;
pub mod ert_shape_predictor;
pub mod math;
pub mod onnx_session;
pub mod onnx_yolo_detector;
pub mod skip_frame_detector;
