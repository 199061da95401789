use crate::shared::region::Region;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Drawing surface for face overlays.
///
/// Coordinates are pixels of the underlying frame; shapes falling partly or
/// wholly outside it are clipped.
pub trait OverlayCanvas {
    /// Outline `region`, growing the border `thickness` pixels inward.
    fn draw_rectangle(&mut self, region: &Region, color: Color, thickness: u32);

    /// Anti-aliased line through `points`; `closed` joins the last point to
    /// the first.
    fn draw_polyline(&mut self, points: &[(i32, i32)], closed: bool, color: Color);
}
