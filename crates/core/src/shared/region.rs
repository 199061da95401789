/// A drawing target rectangle with exclusive extent.
///
/// Covers pixels `x .. x + width` horizontally and `y .. y + height`
/// vertically, so `x + width` is one past the last covered column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last covered column.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the last covered row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersection with a `frame_width` × `frame_height` frame.
    ///
    /// Returns `None` when nothing of the region is visible.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Option<Region> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = self.right().min(frame_width as i32);
        let y2 = self.bottom().min(frame_height as i32);
        let clamped = Region::new(x1, y1, x2 - x1, y2 - y1);
        (!clamped.is_empty()).then_some(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_right_and_bottom_are_exclusive() {
        let r = Region::new(10, 20, 5, 7);
        assert_eq!(r.right(), 15);
        assert_eq!(r.bottom(), 27);
    }

    #[rstest]
    #[case::zero_width(Region::new(0, 0, 0, 10), true)]
    #[case::zero_height(Region::new(0, 0, 10, 0), true)]
    #[case::negative_width(Region::new(5, 5, -1, 10), true)]
    #[case::single_pixel(Region::new(3, 3, 1, 1), false)]
    fn test_is_empty(#[case] region: Region, #[case] expected: bool) {
        assert_eq!(region.is_empty(), expected);
    }

    #[test]
    fn test_clamp_inside_frame_is_unchanged() {
        let r = Region::new(10, 10, 20, 20);
        assert_eq!(r.clamp_to(100, 100), Some(r));
    }

    #[test]
    fn test_clamp_crosses_top_left_edge() {
        let r = Region::new(-5, -10, 20, 30);
        assert_eq!(r.clamp_to(100, 100), Some(Region::new(0, 0, 15, 20)));
    }

    #[test]
    fn test_clamp_crosses_bottom_right_edge() {
        let r = Region::new(90, 95, 20, 20);
        assert_eq!(r.clamp_to(100, 100), Some(Region::new(90, 95, 10, 5)));
    }

    #[test]
    fn test_clamp_outside_frame_is_none() {
        let r = Region::new(150, 150, 20, 20);
        assert_eq!(r.clamp_to(100, 100), None);
    }
}
