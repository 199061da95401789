//! Scale and colour conversions applied to frames between pipeline stages.

use image::imageops::{self, FilterType};

use super::frame::Frame;

/// Single-channel copy of `frame`, keeping its index.
pub fn grayscale(frame: &Frame) -> Frame {
    if frame.is_grayscale() {
        return frame.clone();
    }
    Frame::from_gray_image(frame.to_gray_image(), frame.index())
}

/// Enlarges `frame` by an integer `factor` with bilinear interpolation.
pub fn pyramid_up(frame: &Frame, factor: u32) -> Frame {
    let factor = factor.max(1);
    resize(frame, frame.width() * factor, frame.height() * factor)
}

/// Shrinks `frame` by an integer `ratio`, rounding dimensions to the
/// nearest pixel and never below 1×1.
pub fn downsample(frame: &Frame, ratio: u32) -> Frame {
    let ratio = ratio.max(1) as f64;
    let width = ((frame.width() as f64 / ratio).round() as u32).max(1);
    let height = ((frame.height() as f64 / ratio).round() as u32).max(1);
    resize(frame, width, height)
}

/// Resizes `frame` to exactly `width` × `height`, preserving channel count.
pub fn resize(frame: &Frame, width: u32, height: u32) -> Frame {
    if frame.width() == width && frame.height() == height {
        return frame.clone();
    }
    if frame.is_grayscale() {
        let img = imageops::resize(&frame.to_gray_image(), width, height, FilterType::Triangle);
        Frame::from_gray_image(img, frame.index())
    } else {
        let img = imageops::resize(&frame.to_rgb_image(), width, height, FilterType::Triangle);
        Frame::from_rgb_image(img, frame.index())
    }
}
