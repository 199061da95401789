//! Face detection and 68-point facial landmark pipelines.
//!
//! Layered as in the rest of the workspace: `domain` modules hold traits and
//! value types, `infrastructure` modules hold ONNX/ffmpeg/imageproc adapters,
//! and `pipeline` wires them into the still-image annotator and the live
//! landmark overlay.

pub mod detection;
pub mod pipeline;
pub mod rendering;
pub mod shared;
pub mod video;
