use std::path::Path;

/// Return the preferred ONNX execution providers for the current platform.
///
/// ONNX Runtime falls back to CPU if the platform-specific provider is
/// unavailable.
fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

/// Loads an ONNX model into an inference session on the best available device.
pub fn open_session(model_path: &Path) -> Result<ort::session::Session, Box<dyn std::error::Error>> {
    log::debug!("Loading ONNX model {}", model_path.display());
    let session = ort::session::Session::builder()?
        .with_execution_providers(preferred_execution_providers())?
        .commit_from_file(model_path)?;
    Ok(session)
}
