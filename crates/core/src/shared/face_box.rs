use super::region::Region;

/// A detected face rectangle with inclusive bounds.
///
/// `right` and `bottom` are the last covered column and row, so a box with
/// `left == right` is one pixel wide. Coordinates belong to the pixel grid
/// of the frame the detector ran on; use [`FaceBox::scaled_down`] to move
/// between pyramid levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl FaceBox {
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i64 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top + 1
    }

    pub fn is_empty(&self) -> bool {
        self.right < self.left || self.bottom < self.top
    }

    /// Maps a box found on a frame upsampled by `factor` back to the
    /// original frame: every corner coordinate is divided by `factor`
    /// (rounding toward negative infinity).
    pub fn scaled_down(&self, factor: u32) -> FaceBox {
        let f = factor.max(1) as i64;
        FaceBox::new(
            self.left.div_euclid(f),
            self.top.div_euclid(f),
            self.right.div_euclid(f),
            self.bottom.div_euclid(f),
        )
    }
}

/// Converts an exclusive-extent [`Region`] into an inclusive [`FaceBox`].
///
/// Before: covers `x .. x + width`. After: `right = x + width - 1`.
pub fn face_box_from_region(region: &Region) -> FaceBox {
    FaceBox::new(
        region.x as i64,
        region.y as i64,
        (region.x + region.width) as i64 - 1,
        (region.y + region.height) as i64 - 1,
    )
}

/// Converts an inclusive [`FaceBox`] into an exclusive-extent [`Region`].
///
/// Before: last covered column is `right`. After: `x + width = right + 1`.
pub fn region_from_face_box(face: &FaceBox) -> Region {
    Region::new(
        face.left as i32,
        face.top as i32,
        (face.right + 1 - face.left) as i32,
        (face.bottom + 1 - face.top) as i32,
    )
}
