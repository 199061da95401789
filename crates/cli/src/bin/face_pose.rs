use std::path::PathBuf;

use clap::Parser;
use macroquad::window::Conf;
use macroquad::Window;

use facemark_cli::presenter::MacroquadPresenter;
use facemark_cli::{download_progress, load_live_models, open_camera, validate_confidence};
use facemark_core::detection::domain::face_detector::FaceDetector;
use facemark_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use facemark_core::pipeline::failure::failure_report;
use facemark_core::pipeline::live_landmarks_use_case::{
    LiveLandmarksUseCase, LiveOutcome, LiveSession,
};
use facemark_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facemark_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DISPLAY_HEIGHT, DISPLAY_WIDTH, IMAGE_DETECTION_RATIO,
    IMAGE_DOWNSAMPLE_RATIO, LANDMARK_MODEL_NAME, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use facemark_core::shared::model_resolver;
use facemark_core::video::infrastructure::ffmpeg_camera_reader::{
    CameraSource, FfmpegCameraReader,
};

/// Live camera view with face boxes, 68-point landmarks and an FPS readout.
/// Press Escape to quit.
#[derive(Parser)]
#[command(name = "face-pose")]
struct Cli {
    /// Camera index.
    #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
    camera: usize,

    /// Capture device URL, overriding --camera (e.g. "video=Integrated Camera").
    #[arg(long)]
    device: Option<PathBuf>,

    /// dlib 68-point landmark model (.dat or .dat.bz2).
    #[arg(long, default_value = LANDMARK_MODEL_NAME)]
    landmark_model: PathBuf,

    /// Run face detection once every N frames.
    #[arg(long, default_value_t = IMAGE_DETECTION_RATIO)]
    detection_ratio: u8,

    /// Shrink camera frames by this factor before processing.
    #[arg(long, default_value_t = IMAGE_DOWNSAMPLE_RATIO)]
    downsample_ratio: u32,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Directory searched for the detection model before downloading it.
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let conf = Conf {
        window_title: "Facial Landmarks".to_owned(),
        window_width: DISPLAY_WIDTH as i32 / 2,
        window_height: DISPLAY_HEIGHT as i32 / 2,
        ..Default::default()
    };
    Window::from_config(conf, async move {
        if let Err(e) = run(cli).await {
            println!("{}", failure_report(e.as_ref()));
        }
    });
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    validate(&cli)?;

    let source = match &cli.device {
        Some(device) => CameraSource::with_device(device),
        None => CameraSource::for_index(cli.camera),
    };
    let mut reader = FfmpegCameraReader::new(source.format);
    let Some(metadata) = open_camera(&mut reader, &source.device, &mut std::io::stdout())? else {
        return Ok(());
    };
    log::info!(
        "Camera {} opened: {}x{} {}",
        source.device.display(),
        metadata.width,
        metadata.height,
        metadata.codec
    );

    let (predictor, detector) = load_live_models(&cli.landmark_model, || {
        log::info!("Resolving model: {YOLO_MODEL_NAME}");
        let model_path = model_resolver::resolve(
            YOLO_MODEL_NAME,
            YOLO_MODEL_URL,
            cli.models_dir.as_deref(),
            Some(Box::new(download_progress)),
        )?;
        let detector: Box<dyn FaceDetector> =
            Box::new(OnnxYoloDetector::new(&model_path, cli.confidence)?);
        Ok(detector)
    })?;

    let session = LiveSession::with_system_clock(detector, cli.detection_ratio)?;
    let mut use_case = LiveLandmarksUseCase::new(
        Box::new(reader),
        Box::new(predictor),
        session,
        Box::new(StdoutPipelineLogger::default()),
        cli.downsample_ratio,
    );
    let mut presenter = MacroquadPresenter::new();

    match use_case.execute(&mut presenter).await? {
        LiveOutcome::ExitKey { frames } => log::info!("Exit requested after {frames} frames"),
        LiveOutcome::SourceEnded { frames } => {
            log::warn!("Camera stopped delivering frames after {frames} frames")
        }
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    validate_confidence(cli.confidence)?;
    if cli.detection_ratio == 0 {
        return Err("Detection ratio must be at least 1".into());
    }
    if cli.downsample_ratio == 0 {
        return Err("Downsample ratio must be at least 1".into());
    }
    Ok(())
}
