use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_antialiased_line_segment_mut, draw_hollow_rect_mut};
use imageproc::pixelops::interpolate;
use imageproc::rect::Rect;

use crate::rendering::domain::overlay_canvas::{Color, OverlayCanvas};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// [`OverlayCanvas`] backed by an RGB copy of a frame, drawn with `imageproc`.
///
/// Grayscale frames are expanded to RGB so overlays keep their colour.
pub struct ImageCanvas {
    image: RgbImage,
    index: usize,
}

impl ImageCanvas {
    pub fn new(frame: &Frame) -> Self {
        Self {
            image: frame.to_rgb_image(),
            index: frame.index(),
        }
    }

    pub fn into_frame(self) -> Frame {
        Frame::from_rgb_image(self.image, self.index)
    }
}

fn rgb(color: Color) -> Rgb<u8> {
    Rgb([color.r, color.g, color.b])
}

impl OverlayCanvas for ImageCanvas {
    fn draw_rectangle(&mut self, region: &Region, color: Color, thickness: u32) {
        for inset in 0..thickness.max(1) as i32 {
            let width = region.width - 2 * inset;
            let height = region.height - 2 * inset;
            if width <= 0 || height <= 0 {
                break;
            }
            let rect = Rect::at(region.x + inset, region.y + inset).of_size(width as u32, height as u32);
            draw_hollow_rect_mut(&mut self.image, rect, rgb(color));
        }
    }

    fn draw_polyline(&mut self, points: &[(i32, i32)], closed: bool, color: Color) {
        let color = rgb(color);
        for pair in points.windows(2) {
            draw_antialiased_line_segment_mut(&mut self.image, pair[0], pair[1], color, interpolate);
        }
        if closed && points.len() > 2 {
            if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
                draw_antialiased_line_segment_mut(&mut self.image, last, first, color, interpolate);
            }
        }
    }
}
