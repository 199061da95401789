use crate::shared::frame::Frame;

/// What the operator chose after viewing a still frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Next,
    Abort,
}

/// Window that shows frames to the operator.
///
/// Methods are async so a presenter can yield to its event loop between
/// redraws while waiting for input.
#[allow(async_fn_in_trait)]
pub trait FramePresenter {
    /// Shows `frame` until the operator advances (Enter) or gives up (Escape
    /// or closing the window).
    async fn show_until_advance(
        &mut self,
        frame: &Frame,
    ) -> Result<Advance, Box<dyn std::error::Error>>;

    /// Shows one live frame with `overlay_text` drawn on top and returns the
    /// keycode pressed meanwhile, if any.
    async fn show_live(
        &mut self,
        frame: &Frame,
        overlay_text: &str,
    ) -> Result<Option<u32>, Box<dyn std::error::Error>>;
}
