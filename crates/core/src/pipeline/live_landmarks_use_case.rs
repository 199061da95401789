use std::time::Instant;

use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_landmarks::FaceLandmarks;
use crate::detection::domain::landmark_predictor::LandmarkPredictor;
use crate::detection::infrastructure::skip_frame_detector::SkipFrameDetector;
use crate::pipeline::fps_counter::{format_fps, FpsCounter};
use crate::pipeline::frame_presenter::FramePresenter;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::rendering::domain::face_overlay::{draw_face_boxes, draw_landmarks};
use crate::rendering::infrastructure::image_canvas::ImageCanvas;
use crate::shared::constants::EXIT_KEYCODE;
use crate::shared::frame::Frame;
use crate::shared::pyramid::downsample;
use crate::video::domain::video_reader::VideoReader;

/// Box border width on the downsampled live frame.
const BOX_THICKNESS: u32 = 1;

/// Source of timestamps for the FPS readout.
pub type Clock = Box<dyn FnMut() -> Instant + Send>;

/// Why the live loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiveOutcome {
    ExitKey { frames: usize },
    SourceEnded { frames: usize },
}

/// State carried from one loop iteration to the next: the frame-skipping
/// detector with its cached boxes and counter, and the FPS window.
pub struct LiveSession {
    detector: SkipFrameDetector,
    fps: FpsCounter,
    clock: Clock,
}

impl LiveSession {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        detection_ratio: u8,
        mut clock: Clock,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let detector = SkipFrameDetector::new(detector, detection_ratio)?;
        let fps = FpsCounter::new(clock());
        Ok(Self {
            detector,
            fps,
            clock,
        })
    }

    /// Session driven by the wall clock.
    pub fn with_system_clock(
        detector: Box<dyn FaceDetector>,
        detection_ratio: u8,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::new(detector, detection_ratio, Box::new(Instant::now))
    }
}

/// Live landmark overlay: read camera frames, find faces every few frames,
/// fit landmarks to each face and show the annotated, downsampled frame with
/// an FPS readout until the exit key is pressed or the camera stops.
pub struct LiveLandmarksUseCase {
    reader: Box<dyn VideoReader>,
    predictor: Box<dyn LandmarkPredictor>,
    session: LiveSession,
    logger: Box<dyn PipelineLogger>,
    downsample_ratio: u32,
}

impl LiveLandmarksUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        predictor: Box<dyn LandmarkPredictor>,
        session: LiveSession,
        logger: Box<dyn PipelineLogger>,
        downsample_ratio: u32,
    ) -> Self {
        Self {
            reader,
            predictor,
            session,
            logger,
            downsample_ratio: downsample_ratio.max(1),
        }
    }

    /// Runs the loop on an already opened reader. The reader is closed and
    /// the logger summary emitted on every exit path.
    pub async fn execute(
        &mut self,
        presenter: &mut impl FramePresenter,
    ) -> Result<LiveOutcome, Box<dyn std::error::Error>> {
        let result = self.run_loop(presenter).await;
        self.reader.close();
        self.logger.summary();
        result
    }

    async fn run_loop(
        &mut self,
        presenter: &mut impl FramePresenter,
    ) -> Result<LiveOutcome, Box<dyn std::error::Error>> {
        let mut frames = 0;
        loop {
            let frame = match self.reader.frames().next() {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => {
                    log::warn!("Frame read failed: {e}");
                    return Ok(LiveOutcome::SourceEnded { frames });
                }
                None => return Ok(LiveOutcome::SourceEnded { frames }),
            };

            let (annotated, fps_text) = self.process_frame(&frame)?;
            let key = presenter.show_live(&annotated, &fps_text).await?;
            frames += 1;
            self.logger.progress(frames, None);

            if key == Some(EXIT_KEYCODE) {
                log::debug!("Exit key pressed after {frames} frames");
                return Ok(LiveOutcome::ExitKey { frames });
            }
        }
    }

    /// One iteration: downsample, detect (or reuse), landmark, draw, and
    /// advance the FPS window. Returns the frame to show and its FPS text.
    pub fn process_frame(
        &mut self,
        frame: &Frame,
    ) -> Result<(Frame, String), Box<dyn std::error::Error>> {
        let small = downsample(frame, self.downsample_ratio);

        let started = Instant::now();
        let faces = self.session.detector.detect(&small)?;
        self.logger.timing("detect", elapsed_ms(started));
        self.logger.metric("faces", faces.len() as f64);

        let started = Instant::now();
        let shapes = faces
            .iter()
            .map(|face| self.predictor.predict(&small, face))
            .collect::<Result<Vec<FaceLandmarks>, _>>()?;
        self.logger.timing("landmarks", elapsed_ms(started));

        let started = Instant::now();
        let mut canvas = ImageCanvas::new(&small);
        for (face, shape) in faces.iter().zip(&shapes) {
            draw_face_boxes(&mut canvas, std::slice::from_ref(face), BOX_THICKNESS);
            draw_landmarks(&mut canvas, shape);
        }
        let annotated = canvas.into_frame();
        self.logger.timing("render", elapsed_ms(started));

        let now = (self.session.clock)();
        let fps = self.session.fps.tick(now);
        Ok((annotated, format_fps(fps)))
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
