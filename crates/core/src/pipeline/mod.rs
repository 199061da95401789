pub mod annotate_images_use_case;
pub mod failure;
pub mod fps_counter;
pub mod frame_presenter;
pub mod live_landmarks_use_case;
pub mod pipeline_logger;
