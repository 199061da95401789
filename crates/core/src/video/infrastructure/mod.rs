pub mod ffmpeg_camera_reader;
mod ffmpeg_frames;
pub mod image_file_reader;
