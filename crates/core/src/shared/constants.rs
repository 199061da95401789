pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const LANDMARK_MODEL_NAME: &str = "shape_predictor_68_face_landmarks.dat";
pub const LANDMARK_MODEL_URL: &str =
    "http://dlib.net/files/shape_predictor_68_face_landmarks.dat.bz2";

/// Run face detection once every this many camera frames.
pub const IMAGE_DETECTION_RATIO: u8 = 2;

/// Camera frames are shrunk by this factor before detection and drawing.
pub const IMAGE_DOWNSAMPLE_RATIO: u32 = 2;

/// Still images are enlarged by this factor before detection so faces down
/// to half the detector's native minimum size are found.
pub const IMAGE_UPSAMPLE_FACTOR: u32 = 2;

/// Fixed preview size for annotated still images.
pub const DISPLAY_WIDTH: u32 = 640;
pub const DISPLAY_HEIGHT: u32 = 480;

pub const DEFAULT_CAMERA_INDEX: usize = 0;

/// Keycode that ends the live overlay (Escape).
pub const EXIT_KEYCODE: u32 = 27;
