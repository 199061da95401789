pub mod constants;
pub mod face_box;
pub mod frame;
pub mod model_resolver;
pub mod pyramid;
pub mod region;
pub mod video_metadata;
