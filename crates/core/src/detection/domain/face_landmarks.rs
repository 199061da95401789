//! 68-point face landmarks in the iBUG 300-W ordering.
//!
//! Indices are partitioned into named, contiguous feature ranges. The lower
//! nose deliberately starts at index 30, which also ends the nose bridge, so
//! the two outlines meet at the nose tip.

use std::ops::RangeInclusive;

pub const NUM_LANDMARKS: usize = 68;

/// A named landmark outline drawn as one polyline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FacialFeature {
    JawLine,
    LeftEyebrow,
    RightEyebrow,
    NoseBridge,
    LowerNose,
    LeftEye,
    RightEye,
    OuterLip,
    InnerLip,
}

impl FacialFeature {
    /// All features in drawing order.
    pub const ALL: [FacialFeature; 9] = [
        FacialFeature::JawLine,
        FacialFeature::LeftEyebrow,
        FacialFeature::RightEyebrow,
        FacialFeature::NoseBridge,
        FacialFeature::LowerNose,
        FacialFeature::LeftEye,
        FacialFeature::RightEye,
        FacialFeature::OuterLip,
        FacialFeature::InnerLip,
    ];

    pub fn indices(self) -> RangeInclusive<usize> {
        match self {
            FacialFeature::JawLine => 0..=16,
            FacialFeature::LeftEyebrow => 17..=21,
            FacialFeature::RightEyebrow => 22..=26,
            FacialFeature::NoseBridge => 27..=30,
            FacialFeature::LowerNose => 30..=35,
            FacialFeature::LeftEye => 36..=41,
            FacialFeature::RightEye => 42..=47,
            FacialFeature::OuterLip => 48..=59,
            FacialFeature::InnerLip => 60..=67,
        }
    }

    /// Whether the outline joins its last point back to the first.
    pub fn is_closed(self) -> bool {
        !matches!(
            self,
            FacialFeature::JawLine
                | FacialFeature::LeftEyebrow
                | FacialFeature::RightEyebrow
                | FacialFeature::NoseBridge
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            FacialFeature::JawLine => "jaw line",
            FacialFeature::LeftEyebrow => "left eyebrow",
            FacialFeature::RightEyebrow => "right eyebrow",
            FacialFeature::NoseBridge => "nose bridge",
            FacialFeature::LowerNose => "lower nose",
            FacialFeature::LeftEye => "left eye",
            FacialFeature::RightEye => "right eye",
            FacialFeature::OuterLip => "outer lip",
            FacialFeature::InnerLip => "inner lip",
        }
    }
}

/// Landmark positions for one face, in pixel coordinates of the frame the
/// predictor ran on.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<(i32, i32)>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<(i32, i32)>) -> Result<Self, &'static str> {
        if points.len() != NUM_LANDMARKS {
            return Err("face landmarks must contain exactly 68 points");
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    pub fn part(&self, index: usize) -> (i32, i32) {
        self.points[index]
    }

    /// Points of one feature outline, in index order.
    pub fn feature_points(&self, feature: FacialFeature) -> &[(i32, i32)] {
        &self.points[feature.indices()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn numbered_landmarks() -> FaceLandmarks {
        FaceLandmarks::new((0..NUM_LANDMARKS as i32).map(|i| (i, 100 + i)).collect()).unwrap()
    }

    #[test]
    fn test_new_rejects_wrong_point_count() {
        assert!(FaceLandmarks::new(vec![(0, 0); 5]).is_err());
        assert!(FaceLandmarks::new(vec![(0, 0); 69]).is_err());
    }

    #[rstest]
    #[case(FacialFeature::JawLine, 0, 16, false)]
    #[case(FacialFeature::LeftEyebrow, 17, 21, false)]
    #[case(FacialFeature::RightEyebrow, 22, 26, false)]
    #[case(FacialFeature::NoseBridge, 27, 30, false)]
    #[case(FacialFeature::LowerNose, 30, 35, true)]
    #[case(FacialFeature::LeftEye, 36, 41, true)]
    #[case(FacialFeature::RightEye, 42, 47, true)]
    #[case(FacialFeature::OuterLip, 48, 59, true)]
    #[case(FacialFeature::InnerLip, 60, 67, true)]
    fn test_feature_table(
        #[case] feature: FacialFeature,
        #[case] start: usize,
        #[case] end: usize,
        #[case] closed: bool,
    ) {
        assert_eq!(feature.indices(), start..=end);
        assert_eq!(feature.is_closed(), closed);
    }

    #[test]
    fn test_features_cover_all_landmarks() {
        let mut seen = [0usize; NUM_LANDMARKS];
        for feature in FacialFeature::ALL {
            for i in feature.indices() {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n >= 1));
        // Nose tip is shared by the bridge and the lower nose outline.
        assert_eq!(seen[30], 2);
        assert_eq!(seen.iter().sum::<usize>(), NUM_LANDMARKS + 1);
    }

    #[test]
    fn test_feature_points_follow_index_range() {
        let lm = numbered_landmarks();
        let eye = lm.feature_points(FacialFeature::LeftEye);
        assert_eq!(eye.len(), 6);
        assert_eq!(eye[0], (36, 136));
        assert_eq!(eye[5], (41, 141));
    }

    #[test]
    fn test_part_returns_indexed_point() {
        let lm = numbered_landmarks();
        assert_eq!(lm.part(67), (67, 167));
    }
}
