/// YOLO face detector using ONNX Runtime via `ort`.
///
/// Handles letterbox preprocessing, inference, and NMS post-processing.
/// Boxes are mapped back to the input frame and returned as inclusive
/// [`FaceBox`]es.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_box::{face_box_from_region, FaceBox};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::math::bbox_iou;
use super::onnx_session::open_session;

/// Fallback YOLO model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default confidence threshold for face detection.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// YOLO face detector backed by an ONNX Runtime session.
pub struct OnnxYoloDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxYoloDetector {
    /// Load a YOLO ONNX model and prepare for inference.
    ///
    /// The input resolution is read from the model's input shape (expecting NCHW).
    /// Falls back to 640 if the shape is dynamic or unreadable.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = open_session(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::debug!("YOLO input size {input_size}, confidence {confidence}");
        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl FaceDetector for OnnxYoloDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        let (input_tensor, scale, pad_x, pad_y) = letterbox(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();

        // YOLO output shape is [1, num_features, num_detections] (transposed)
        // or [1, num_detections, num_features]. Handle both.
        if shape.len() != 3 {
            return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
        }
        let transposed = shape[1] < shape[2];
        let (num_dets, num_feats) = if transposed {
            (shape[2], shape[1])
        } else {
            (shape[1], shape[2])
        };
        if num_feats < 5 {
            return Ok(Vec::new());
        }

        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;
        let value = |det: usize, feat: usize| {
            if transposed {
                data[feat * num_dets + det]
            } else {
                data[det * num_feats + feat]
            }
        };

        // Row format: [cx, cy, w, h, conf, keypoints...]
        let mut raw_dets = Vec::new();
        for i in 0..num_dets {
            let conf = value(i, 4) as f64;
            if conf < self.confidence {
                continue;
            }
            let cx = value(i, 0) as f64;
            let cy = value(i, 1) as f64;
            let w = value(i, 2) as f64;
            let h = value(i, 3) as f64;

            raw_dets.push(RawDetection {
                x1: ((cx - w / 2.0) - pad_x as f64) / scale,
                y1: ((cy - h / 2.0) - pad_y as f64) / scale,
                x2: ((cx + w / 2.0) - pad_x as f64) / scale,
                y2: ((cy + h / 2.0) - pad_y as f64) / scale,
                confidence: conf,
            });
        }

        let kept = nms(&mut raw_dets, NMS_IOU_THRESH);
        Ok(kept
            .iter()
            .filter_map(|d| to_face_box(d, frame.width(), frame.height()))
            .collect())
    }
}

/// Snaps a detection to the pixel grid and clips it to the frame.
fn to_face_box(det: &RawDetection, frame_width: u32, frame_height: u32) -> Option<FaceBox> {
    let x1 = det.x1.round() as i32;
    let y1 = det.y1.round() as i32;
    let x2 = det.x2.round() as i32;
    let y2 = det.y2.round() as i32;
    Region::new(x1, y1, x2 - x1, y2 - y1)
        .clamp_to(frame_width, frame_height)
        .map(|r| face_box_from_region(&r))
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Letterbox-resize a frame to `target_size` × `target_size`.
///
/// Grayscale frames are replicated across the three input channels.
/// Returns `(NCHW float32 tensor, scale, pad_x, pad_y)`.
fn letterbox(frame: &Frame, target_size: u32) -> (ndarray::Array4<f32>, f64, u32, u32) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    // Padded area is 114/255 gray, YOLO convention
    let gray = 114.0f32 / 255.0;
    let mut tensor =
        ndarray::Array4::<f32>::from_elem((1, 3, target_size as usize, target_size as usize), gray);

    let src = frame.as_ndarray(); // [H, W, C] u8
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let last_channel = frame.channels() as usize - 1;

    // Nearest-neighbor resize + copy into padded region
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c.min(last_channel)]] as f32 / 255.0;
            }
        }
    }

    (tensor, scale, pad_x, pad_y)
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct RawDetection {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    confidence: f64,
}

impl RawDetection {
    fn bbox(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

/// Greedy NMS: sort by confidence descending, suppress overlapping boxes.
fn nms(dets: &mut [RawDetection], iou_thresh: f64) -> Vec<RawDetection> {
    dets.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; dets.len()];

    for i in 0..dets.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(dets[i].clone());
        for j in (i + 1)..dets.len() {
            if !suppressed[j] && bbox_iou(&dets[i].bbox(), &dets[j].bbox()) > iou_thresh {
                suppressed[j] = true;
            }
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64) -> RawDetection {
        RawDetection {
            x1,
            y1,
            x2,
            y2,
            confidence,
        }
    }

    #[test]
    fn test_letterbox_preserves_aspect_ratio() {
        // 200x100 frame → scale 3.2, new 640x320, pad_y 160
        let frame = Frame::new(vec![128u8; 200 * 100 * 3], 200, 100, 3, 0);
        let (tensor, scale, pad_x, pad_y) = letterbox(&frame, 640);

        assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
        assert!((scale - 3.2).abs() < 0.01);
        assert_eq!(pad_x, 0);
        assert_eq!(pad_y, 160);
    }

    #[test]
    fn test_letterbox_grayscale_fills_all_channels() {
        let frame = Frame::new(vec![255u8; 64 * 64], 64, 64, 1, 0);
        let (tensor, _, pad_x, pad_y) = letterbox(&frame, 640);
        assert_eq!((pad_x, pad_y), (0, 0));
        for c in 0..3 {
            assert!((tensor[[0, c, 10, 10]] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_letterbox_pad_value() {
        let frame = Frame::new(vec![255u8; 100 * 50 * 3], 100, 50, 3, 0);
        let (tensor, _, _, pad_y) = letterbox(&frame, 640);
        assert!(pad_y > 0);
        assert!((tensor[[0, 0, 0, 0]] - 114.0 / 255.0).abs() < 0.01);
    }

    #[test]
    fn test_nms_suppresses_overlapping() {
        let mut dets = vec![
            det(0.0, 0.0, 100.0, 100.0, 0.8),
            det(5.0, 5.0, 105.0, 105.0, 0.9),
        ];
        let kept = nms(&mut dets, 0.3);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_nms_keeps_non_overlapping() {
        let mut dets = vec![
            det(0.0, 0.0, 50.0, 50.0, 0.9),
            det(200.0, 200.0, 250.0, 250.0, 0.8),
        ];
        assert_eq!(nms(&mut dets, 0.3).len(), 2);
    }

    #[test]
    fn test_nms_empty_input() {
        let mut dets: Vec<RawDetection> = Vec::new();
        assert!(nms(&mut dets, 0.3).is_empty());
    }

    #[test]
    fn test_to_face_box_uses_inclusive_bounds() {
        let b = to_face_box(&det(10.2, 20.0, 50.0, 80.4, 0.9), 100, 100).unwrap();
        assert_eq!(b, FaceBox::new(10, 20, 49, 79));
    }

    #[test]
    fn test_to_face_box_clips_to_frame() {
        let b = to_face_box(&det(-10.0, -5.0, 30.0, 120.0, 0.9), 100, 100).unwrap();
        assert_eq!(b, FaceBox::new(0, 0, 29, 99));
    }

    #[test]
    fn test_to_face_box_outside_frame_is_dropped() {
        assert!(to_face_box(&det(150.0, 150.0, 180.0, 180.0, 0.9), 100, 100).is_none());
    }
}
