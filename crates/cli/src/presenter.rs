use macroquad::prelude::*;

use facemark_core::pipeline::frame_presenter::{Advance, FramePresenter};
use facemark_core::shared::constants::EXIT_KEYCODE;
use facemark_core::shared::frame::Frame;

const ENTER_KEYCODE: u32 = 13;
const OVERLAY_FONT_SIZE: f32 = 30.0;

/// [`FramePresenter`] drawing into the macroquad window.
///
/// The window is resized to each new frame size. Closing the window counts
/// as Escape.
pub struct MacroquadPresenter {
    texture: Option<Texture2D>,
    size: (u16, u16),
}

impl MacroquadPresenter {
    /// Must be created inside the macroquad main future.
    pub fn new() -> Self {
        prevent_quit();
        Self {
            texture: None,
            size: (0, 0),
        }
    }

    fn upload(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let width = u16::try_from(frame.width())
            .map_err(|_| format!("Frame too wide to display: {}", frame.width()))?;
        let height = u16::try_from(frame.height())
            .map_err(|_| format!("Frame too tall to display: {}", frame.height()))?;
        let bytes = rgba_bytes(frame);

        // Rebuild only on a size change, otherwise reuse the GPU texture.
        match &self.texture {
            Some(texture) if self.size == (width, height) => {
                texture.update(&Image {
                    bytes,
                    width,
                    height,
                });
            }
            _ => {
                let texture = Texture2D::from_rgba8(width, height, &bytes);
                texture.set_filter(FilterMode::Nearest);
                request_new_screen_size(width as f32, height as f32);
                self.texture = Some(texture);
                self.size = (width, height);
            }
        }
        Ok(())
    }

    fn draw(&self) {
        clear_background(BLACK);
        if let Some(texture) = &self.texture {
            draw_texture(texture, 0.0, 0.0, WHITE);
        }
    }

    fn exit_requested() -> bool {
        is_quit_requested() || is_key_pressed(KeyCode::Escape)
    }
}

impl Default for MacroquadPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl FramePresenter for MacroquadPresenter {
    async fn show_until_advance(
        &mut self,
        frame: &Frame,
    ) -> Result<Advance, Box<dyn std::error::Error>> {
        self.upload(frame)?;
        loop {
            self.draw();
            next_frame().await;
            if Self::exit_requested() {
                return Ok(Advance::Abort);
            }
            if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
                return Ok(Advance::Next);
            }
        }
    }

    async fn show_live(
        &mut self,
        frame: &Frame,
        overlay_text: &str,
    ) -> Result<Option<u32>, Box<dyn std::error::Error>> {
        self.upload(frame)?;
        self.draw();
        draw_text(overlay_text, 50.0, 50.0, OVERLAY_FONT_SIZE, WHITE);
        next_frame().await;
        if Self::exit_requested() {
            return Ok(Some(EXIT_KEYCODE));
        }
        Ok(get_last_key_pressed().map(keycode))
    }
}

fn keycode(key: KeyCode) -> u32 {
    match key {
        KeyCode::Escape => EXIT_KEYCODE,
        KeyCode::Enter | KeyCode::KpEnter => ENTER_KEYCODE,
        other => other as u32,
    }
}

/// Frame pixels as tightly packed RGBA8, opaque.
pub fn rgba_bytes(frame: &Frame) -> Vec<u8> {
    frame
        .to_rgb_image()
        .as_raw()
        .chunks_exact(3)
        .flat_map(|px| [px[0], px[1], px[2], 255])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_bytes_from_rgb() {
        let frame = Frame::new(vec![1, 2, 3, 4, 5, 6], 2, 1, 3, 0);
        assert_eq!(rgba_bytes(&frame), vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_rgba_bytes_from_grayscale() {
        let frame = Frame::new(vec![7, 9], 1, 2, 1, 0);
        assert_eq!(rgba_bytes(&frame), vec![7, 7, 7, 255, 9, 9, 9, 255]);
    }

    #[test]
    fn test_escape_maps_to_exit_keycode() {
        assert_eq!(keycode(KeyCode::Escape), EXIT_KEYCODE);
        assert_eq!(keycode(KeyCode::Enter), ENTER_KEYCODE);
    }
}
