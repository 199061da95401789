//! Shared math utilities for detection infrastructure.
//!
//! Bounding-box IoU for NMS and the 2D similarity fit used by the
//! landmark cascade.

/// IoU between two bounding boxes represented as `[x1, y1, x2, y2]`.
pub fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }

    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}

/// Rotation + uniform scale part of a 2D similarity transform,
/// `[[a, -b], [b, a]]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityTransform {
    pub a: f32,
    pub b: f32,
}

impl SimilarityTransform {
    pub const IDENTITY: SimilarityTransform = SimilarityTransform { a: 1.0, b: 0.0 };

    pub fn apply(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (self.a * x - self.b * y, self.b * x + self.a * y)
    }
}

/// Least-squares similarity mapping `from` onto `to` with translation
/// removed (both point sets are centred first).
///
/// Falls back to the identity for degenerate input (empty, mismatched
/// lengths, or all points coincident).
pub fn find_similarity_transform(from: &[(f32, f32)], to: &[(f32, f32)]) -> SimilarityTransform {
    if from.is_empty() || from.len() != to.len() {
        return SimilarityTransform::IDENTITY;
    }
    let (fcx, fcy) = centroid(from);
    let (tcx, tcy) = centroid(to);

    let mut dot = 0.0f32;
    let mut cross = 0.0f32;
    let mut norm = 0.0f32;
    for (&(fx, fy), &(tx, ty)) in from.iter().zip(to) {
        let (fx, fy) = (fx - fcx, fy - fcy);
        let (tx, ty) = (tx - tcx, ty - tcy);
        dot += fx * tx + fy * ty;
        cross += fx * ty - fy * tx;
        norm += fx * fx + fy * fy;
    }
    if norm <= f32::EPSILON {
        return SimilarityTransform::IDENTITY;
    }
    SimilarityTransform {
        a: dot / norm,
        b: cross / norm,
    }
}

fn centroid(points: &[(f32, f32)]) -> (f32, f32) {
    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
    (sx / n, sy / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bbox_iou_no_overlap() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [20.0, 20.0, 30.0, 30.0];
        assert_eq!(bbox_iou(&a, &b), 0.0);
    }

    #[test]
    fn test_bbox_iou_perfect_overlap() {
        let a = [0.0, 0.0, 10.0, 10.0];
        assert!((bbox_iou(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bbox_iou_partial_overlap() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [5.0, 0.0, 15.0, 10.0];
        // inter 50, union 150
        assert!((bbox_iou(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
    }

    fn square() -> Vec<(f32, f32)> {
        vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
    }

    #[test]
    fn test_similarity_identity_for_same_shape() {
        let t = find_similarity_transform(&square(), &square());
        assert_relative_eq!(t.a, 1.0, epsilon = 1e-6);
        assert_relative_eq!(t.b, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_similarity_ignores_translation_and_recovers_scale() {
        let to: Vec<_> = square().iter().map(|&(x, y)| (x * 3.0 + 7.0, y * 3.0 - 2.0)).collect();
        let t = find_similarity_transform(&square(), &to);
        assert_relative_eq!(t.a, 3.0, epsilon = 1e-5);
        assert_relative_eq!(t.b, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_similarity_recovers_rotation() {
        // 90° counter-clockwise: (x, y) -> (-y, x)
        let to: Vec<_> = square().iter().map(|&(x, y)| (-y, x)).collect();
        let t = find_similarity_transform(&square(), &to);
        assert_relative_eq!(t.a, 0.0, epsilon = 1e-5);
        assert_relative_eq!(t.b, 1.0, epsilon = 1e-5);
        let (x, y) = t.apply((1.0, 0.0));
        assert_relative_eq!(x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_similarity_degenerate_is_identity() {
        let points = vec![(2.0, 2.0); 4];
        assert_eq!(
            find_similarity_transform(&points, &square()),
            SimilarityTransform::IDENTITY
        );
        assert_eq!(
            find_similarity_transform(&[], &[]),
            SimilarityTransform::IDENTITY
        );
    }
}
