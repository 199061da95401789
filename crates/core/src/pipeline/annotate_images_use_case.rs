use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_presenter::{Advance, FramePresenter};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::rendering::domain::face_overlay::draw_face_boxes;
use crate::rendering::infrastructure::image_canvas::ImageCanvas;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;
use crate::shared::pyramid::{grayscale, pyramid_up, resize};
use crate::video::domain::video_reader::VideoReader;

pub const USAGE: &str = "Provide image paths as command line arguments to this program.";

/// Box border width on the full-resolution image.
const BOX_THICKNESS: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnnotateOutcome {
    /// No paths were given; only the usage line was printed.
    Usage,
    Completed { images: usize },
    /// The operator closed the window after `images` images.
    Aborted { images: usize },
}

/// Batch annotator: for each image, detect faces on an upsampled grayscale
/// copy, outline them on the colour original and show a fixed-size preview
/// until the operator advances.
///
/// Any failure aborts the rest of the batch.
pub struct AnnotateImagesUseCase {
    reader: Box<dyn VideoReader>,
    detector: Box<dyn FaceDetector>,
    logger: Box<dyn PipelineLogger>,
    upsample: u32,
    display_size: (u32, u32),
}

impl AnnotateImagesUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        detector: Box<dyn FaceDetector>,
        logger: Box<dyn PipelineLogger>,
        upsample: u32,
        display_size: (u32, u32),
    ) -> Self {
        Self {
            reader,
            detector,
            logger,
            upsample: upsample.max(1),
            display_size,
        }
    }

    pub async fn execute(
        &mut self,
        paths: &[PathBuf],
        presenter: &mut impl FramePresenter,
        out: &mut dyn Write,
    ) -> Result<AnnotateOutcome, Box<dyn std::error::Error>> {
        if paths.is_empty() {
            writeln!(out, "{USAGE}")?;
            return Ok(AnnotateOutcome::Usage);
        }

        for (i, path) in paths.iter().enumerate() {
            writeln!(out, "Processing image: {}", path.display())?;
            let display = self.annotate(path, out)?;

            write!(out, "Hit enter to process the next image...")?;
            out.flush()?;
            let advance = presenter.show_until_advance(&display).await?;
            writeln!(out)?;
            self.logger.progress(i + 1, Some(paths.len()));

            if advance == Advance::Abort {
                self.logger.info("Batch aborted by operator");
                return Ok(AnnotateOutcome::Aborted { images: i + 1 });
            }
        }

        self.logger.summary();
        Ok(AnnotateOutcome::Completed {
            images: paths.len(),
        })
    }

    /// Loads one image and returns its annotated, display-sized preview.
    fn annotate(
        &mut self,
        path: &Path,
        out: &mut dyn Write,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        self.reader.open(path)?;
        let image = self.reader.frames().next().ok_or("No frames in image")??;
        self.reader.close();

        let started = Instant::now();
        let search = pyramid_up(&grayscale(&image), self.upsample);
        let detections = self.detector.detect(&search)?;
        self.logger
            .timing("detect", started.elapsed().as_secs_f64() * 1000.0);
        writeln!(out, "Found {} faces.", detections.len())?;

        let faces: Vec<FaceBox> = detections
            .iter()
            .map(|d| d.scaled_down(self.upsample))
            .collect();
        self.logger.metric("faces", faces.len() as f64);

        let mut canvas = ImageCanvas::new(&image);
        draw_face_boxes(&mut canvas, &faces, BOX_THICKNESS);
        let (width, height) = self.display_size;
        Ok(resize(&canvas.into_frame(), width, height))
    }
}
