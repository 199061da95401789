//! Ensemble-of-regression-trees landmark predictor.
//!
//! Evaluates models in dlib's `shape_predictor` format. The shape starts at
//! the mean face in unit-square coordinates; each cascade samples pixel
//! intensities at points anchored to the current shape, walks its trees on
//! pixel differences, and adds the selected leaf offsets. The final shape is
//! mapped onto the face box.

use std::path::Path;

use crate::detection::domain::face_landmarks::FaceLandmarks;
use crate::detection::domain::landmark_predictor::LandmarkPredictor;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

use super::dlib_model_reader::{load_shape_model, ModelLoadError};
use super::math::find_similarity_transform;

/// Node test: go left when `pixel[idx1] - pixel[idx2] > thresh`.
#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    pub idx1: usize,
    pub idx2: usize,
    pub thresh: f32,
}

/// Complete binary tree stored breadth-first; children of node `i` are
/// `2i + 1` and `2i + 2`, and leaves follow the last split.
#[derive(Clone, Debug, PartialEq)]
pub struct RegressionTree {
    pub splits: Vec<Split>,
    pub leaf_values: Vec<Vec<(f32, f32)>>,
}

impl RegressionTree {
    fn leaf_for(&self, pixels: &[f32]) -> &[(f32, f32)] {
        let mut i = 0;
        while i < self.splits.len() {
            let split = &self.splits[i];
            i = if pixels[split.idx1] - pixels[split.idx2] > split.thresh {
                2 * i + 1
            } else {
                2 * i + 2
            };
        }
        &self.leaf_values[i - self.splits.len()]
    }
}

/// Decoded model. `anchor_idx[c][f]` and `deltas[c][f]` place feature pixel
/// `f` of cascade `c` relative to a shape part.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeModel {
    pub initial_shape: Vec<(f32, f32)>,
    pub forests: Vec<Vec<RegressionTree>>,
    pub anchor_idx: Vec<Vec<usize>>,
    pub deltas: Vec<Vec<(f32, f32)>>,
}

impl ShapeModel {
    pub fn num_parts(&self) -> usize {
        self.initial_shape.len()
    }
}

pub struct ErtShapePredictor {
    model: ShapeModel,
}

impl ErtShapePredictor {
    /// Load a `.dat` or `.dat.bz2` model file.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let model = load_shape_model(path)?;
        log::info!(
            "Loaded landmark model {} ({} parts)",
            path.display(),
            model.num_parts()
        );
        Ok(Self::from_model(model))
    }

    pub fn from_model(model: ShapeModel) -> Self {
        Self { model }
    }

    pub fn num_parts(&self) -> usize {
        self.model.num_parts()
    }

    /// Runs the cascade and returns the shape in unit-square coordinates.
    fn predict_normalized(&self, frame: &Frame, face: &FaceBox) -> Vec<(f32, f32)> {
        let mut current = self.model.initial_shape.clone();
        for (cascade, forest) in self.model.forests.iter().enumerate() {
            let pixels = self.feature_pixel_values(cascade, &current, frame, face);
            for tree in forest {
                for (point, delta) in current.iter_mut().zip(tree.leaf_for(&pixels)) {
                    point.0 += delta.0;
                    point.1 += delta.1;
                }
            }
        }
        current
    }

    fn feature_pixel_values(
        &self,
        cascade: usize,
        current: &[(f32, f32)],
        frame: &Frame,
        face: &FaceBox,
    ) -> Vec<f32> {
        let tform = find_similarity_transform(&self.model.initial_shape, current);
        self.model.anchor_idx[cascade]
            .iter()
            .zip(&self.model.deltas[cascade])
            .map(|(&anchor, &delta)| {
                let (dx, dy) = tform.apply(delta);
                let (ax, ay) = current[anchor];
                let (x, y) = unnormalize(face, (ax + dx, ay + dy));
                frame
                    .intensity(round(x), round(y))
                    .map_or(0.0, |v| v as f32)
            })
            .collect()
    }
}

impl LandmarkPredictor for ErtShapePredictor {
    fn predict(
        &self,
        frame: &Frame,
        face: &FaceBox,
    ) -> Result<FaceLandmarks, Box<dyn std::error::Error>> {
        let points = self
            .predict_normalized(frame, face)
            .into_iter()
            .map(|p| {
                let (x, y) = unnormalize(face, p);
                (round(x) as i32, round(y) as i32)
            })
            .collect();
        Ok(FaceLandmarks::new(points)?)
    }
}

/// Maps the unit square onto the box: `(0,0)` → top-left, `(1,1)` → bottom-right.
fn unnormalize(face: &FaceBox, (x, y): (f32, f32)) -> (f32, f32) {
    let left = face.left as f32;
    let top = face.top as f32;
    (
        left + x * (face.right as f32 - left),
        top + y * (face.bottom as f32 - top),
    )
}

fn round(v: f32) -> i64 {
    (v + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_landmarks::NUM_LANDMARKS;

    /// 17×4 grid spanning the unit square.
    fn grid_shape() -> Vec<(f32, f32)> {
        (0..NUM_LANDMARKS)
            .map(|i| ((i % 17) as f32 / 16.0, (i / 17) as f32 / 3.0))
            .collect()
    }

    /// One cascade, one stump comparing the box's top-left pixel with its
    /// top-right pixel. Bright-left shifts right, otherwise shifts down.
    fn stump_model() -> ShapeModel {
        ShapeModel {
            initial_shape: grid_shape(),
            forests: vec![vec![RegressionTree {
                splits: vec![Split {
                    idx1: 0,
                    idx2: 1,
                    thresh: 100.0,
                }],
                leaf_values: vec![
                    vec![(0.0625, 0.0); NUM_LANDMARKS],
                    vec![(0.0, 0.125); NUM_LANDMARKS],
                ],
            }]],
            anchor_idx: vec![vec![0, 0]],
            deltas: vec![vec![(0.0, 0.0), (1.0, 0.0)]],
        }
    }

    fn half_bright_frame(size: u32) -> Frame {
        let mut data = vec![0u8; (size * size) as usize];
        for y in 0..size {
            for x in 0..size / 2 {
                data[(y * size + x) as usize] = 200;
            }
        }
        Frame::new(data, size, size, 1, 0)
    }

    #[test]
    fn test_without_cascades_maps_mean_shape_to_box_corners() {
        let model = ShapeModel {
            initial_shape: grid_shape(),
            forests: Vec::new(),
            anchor_idx: Vec::new(),
            deltas: Vec::new(),
        };
        let predictor = ErtShapePredictor::from_model(model);
        let frame = Frame::new(vec![0u8; 64 * 64 * 3], 64, 64, 3, 0);
        let face = FaceBox::new(10, 20, 42, 50);

        let lm = predictor.predict(&frame, &face).unwrap();
        assert_eq!(lm.part(0), (10, 20));
        assert_eq!(lm.part(16), (42, 20));
        assert_eq!(lm.part(67), (42, 50));
        // x = 10 + 0.5·32, y = 20 + (1/3)·30
        assert_eq!(lm.part(17 + 8), (26, 30));
    }

    #[test]
    fn test_bright_left_takes_left_branch() {
        let predictor = ErtShapePredictor::from_model(stump_model());
        let frame = half_bright_frame(100);
        let face = FaceBox::new(0, 0, 99, 99);

        let lm = predictor.predict(&frame, &face).unwrap();
        // 0.0625·99 = 6.19
        assert_eq!(lm.part(0), (6, 0));
        // 1.0625·99 = 105.19
        assert_eq!(lm.part(16), (105, 0));
    }

    #[test]
    fn test_dark_frame_takes_right_branch() {
        let predictor = ErtShapePredictor::from_model(stump_model());
        let frame = Frame::new(vec![0u8; 100 * 100], 100, 100, 1, 0);
        let face = FaceBox::new(0, 0, 99, 99);

        let lm = predictor.predict(&frame, &face).unwrap();
        // 0.125·99 = 12.375
        assert_eq!(lm.part(0), (0, 12));
        assert_eq!(lm.part(16), (99, 12));
    }

    #[test]
    fn test_pixels_outside_frame_read_as_zero() {
        let predictor = ErtShapePredictor::from_model(stump_model());
        let frame = Frame::new(vec![255u8; 50 * 50], 50, 50, 1, 0);
        // Top-left corner lies outside the frame, top-right inside.
        let face = FaceBox::new(-20, 10, 30, 60);
        let shape = predictor.predict_normalized(&frame, &face);
        // 0 - 255 is not > 100, so the right branch applies.
        assert_eq!(shape[0], (0.0, 0.125));
    }

    #[test]
    fn test_predict_rejects_non_68_point_model() {
        let mut model = stump_model();
        model.initial_shape.truncate(5);
        model.forests.clear();
        model.anchor_idx.clear();
        model.deltas.clear();
        let predictor = ErtShapePredictor::from_model(model);
        assert_eq!(predictor.num_parts(), 5);

        let frame = Frame::new(vec![0u8; 16], 4, 4, 1, 0);
        assert!(predictor.predict(&frame, &FaceBox::new(0, 0, 3, 3)).is_err());
    }

    #[test]
    fn test_leaf_for_walks_breadth_first_tree() {
        // Depth-2 tree: root on (0,1), children on (1,2) and (2,0).
        let tree = RegressionTree {
            splits: vec![
                Split { idx1: 0, idx2: 1, thresh: 0.0 },
                Split { idx1: 1, idx2: 2, thresh: 0.0 },
                Split { idx1: 2, idx2: 0, thresh: 0.0 },
            ],
            leaf_values: (0..4).map(|i| vec![(i as f32, 0.0)]).collect(),
        };
        // root left (10 > 5), node1: 5 - 1 > 0 → left → leaf 0
        assert_eq!(tree.leaf_for(&[10.0, 5.0, 1.0])[0].0, 0.0);
        // root left, node1: 5 - 9 ≤ 0 → right → leaf 1
        assert_eq!(tree.leaf_for(&[10.0, 5.0, 9.0])[0].0, 1.0);
        // root right (1 ≤ 5), node2: 9 - 1 > 0 → left → leaf 2
        assert_eq!(tree.leaf_for(&[1.0, 5.0, 9.0])[0].0, 2.0);
        // root right, node2: 0 - 1 ≤ 0 → right → leaf 3
        assert_eq!(tree.leaf_for(&[1.0, 5.0, 0.0])[0].0, 3.0);
    }

    #[test]
    fn test_load_round_trips_through_file() {
        use crate::detection::infrastructure::dlib_model_reader::tests::DlibWriter;

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("landmarks.dat");
        let mut w = DlibWriter::default();
        w.model(&stump_model());
        std::fs::write(&path, &w.bytes).unwrap();

        let predictor = ErtShapePredictor::load(&path).unwrap();
        let lm = predictor
            .predict(&half_bright_frame(100), &FaceBox::new(0, 0, 99, 99))
            .unwrap();
        assert_eq!(lm.part(0), (6, 0));
    }
}
