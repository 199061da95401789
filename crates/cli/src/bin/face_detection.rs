use std::path::PathBuf;

use clap::Parser;
use macroquad::window::Conf;
use macroquad::Window;

use facemark_cli::presenter::MacroquadPresenter;
use facemark_cli::{download_progress, validate_confidence};
use facemark_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use facemark_core::pipeline::annotate_images_use_case::{
    AnnotateImagesUseCase, AnnotateOutcome, USAGE,
};
use facemark_core::pipeline::failure::failure_report;
use facemark_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facemark_core::shared::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, IMAGE_UPSAMPLE_FACTOR, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use facemark_core::shared::model_resolver;
use facemark_core::video::infrastructure::image_file_reader::ImageFileReader;

/// Finds faces in each image and shows them outlined, one image at a time.
#[derive(Parser)]
#[command(name = "face-detection")]
struct Cli {
    /// Image files to process in order.
    images: Vec<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Enlarge images by this factor before detection to find smaller faces.
    #[arg(long, default_value_t = IMAGE_UPSAMPLE_FACTOR)]
    upsample: u32,

    /// Directory searched for the detection model before downloading it.
    #[arg(long)]
    models_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.images.is_empty() {
        println!("{USAGE}");
        return;
    }

    let conf = Conf {
        window_title: "Face Detection".to_owned(),
        window_width: DISPLAY_WIDTH as i32,
        window_height: DISPLAY_HEIGHT as i32,
        ..Default::default()
    };
    Window::from_config(conf, async move {
        if let Err(e) = run(cli).await {
            println!("\nexception thrown!");
            println!("{}", failure_report(e.as_ref()));
        }
    });
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    validate(&cli)?;

    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        cli.models_dir.as_deref(),
        Some(Box::new(download_progress)),
    )?;
    let detector = OnnxYoloDetector::new(&model_path, cli.confidence)?;

    let mut use_case = AnnotateImagesUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(detector),
        Box::new(StdoutPipelineLogger::default()),
        cli.upsample,
        (DISPLAY_WIDTH, DISPLAY_HEIGHT),
    );
    let mut presenter = MacroquadPresenter::new();
    let outcome = use_case
        .execute(&cli.images, &mut presenter, &mut std::io::stdout())
        .await?;

    match outcome {
        AnnotateOutcome::Aborted { images } => {
            log::info!("Stopped after {images} of {} images", cli.images.len())
        }
        AnnotateOutcome::Completed { images } => log::info!("Processed {images} images"),
        AnnotateOutcome::Usage => {}
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    validate_confidence(cli.confidence)?;
    if cli.upsample == 0 {
        return Err("Upsample factor must be at least 1".into());
    }
    Ok(())
}
