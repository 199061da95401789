use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolve a model file by name, checking local copies before downloading.
///
/// Resolution order:
/// 1. User cache directory (platform-specific)
/// 2. Bundled directory (e.g. `--models-dir`)
/// 3. Download from URL into the cache
pub fn resolve(
    name: &str,
    url: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    resolve_in(&model_cache_dir()?, name, url, bundled_dir, progress)
}

fn resolve_in(
    cache_dir: &Path,
    name: &str,
    url: &str,
    bundled_dir: Option<&Path>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        log::debug!("Using cached model {}", cached_path.display());
        return Ok(cached_path);
    }

    if let Some(dir) = bundled_dir {
        let bundled_path = dir.join(name);
        if bundled_path.exists() {
            log::debug!("Using bundled model {}", bundled_path.display());
            return Ok(bundled_path);
        }
    }

    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("Downloading {name} from {url}");
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/Facemark/models/`
/// - Linux: `$XDG_CACHE_HOME/Facemark/models/` or `~/.cache/Facemark/models/`
/// - Windows: `%LOCALAPPDATA%/Facemark/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("Facemark").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("Facemark").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

/// Streams `url` into `<dest>.part` and renames it over `dest` once
/// complete. The partial file is removed on failure.
fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let total = response.content_length().unwrap_or(0);

    let part_path = dest.with_extension("part");
    let part_err = |source| ModelResolveError::Write {
        path: part_path.clone(),
        source,
    };
    let mut file = fs::File::create(&part_path).map_err(part_err)?;

    let mut buf = vec![0u8; 256 * 1024];
    let mut downloaded: u64 = 0;
    let streamed = loop {
        let n = match response.read(&mut buf) {
            Ok(0) => break Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => break Err(part_err(e)),
        };
        if let Err(e) = file.write_all(&buf[..n]) {
            break Err(part_err(e));
        }
        downloaded += n as u64;
        if let Some(cb) = &progress {
            cb(downloaded, total);
        }
    };
    let finished = streamed.and_then(|()| file.flush().map_err(part_err));
    drop(file);
    if let Err(e) = finished {
        let _ = fs::remove_file(&part_path);
        return Err(e);
    }

    fs::rename(&part_path, dest).map_err(|source| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const UNREACHABLE_URL: &str = "http://invalid.nonexistent.example.com/model.onnx";

    #[test]
    fn test_resolve_prefers_cached_file() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled = tmp.path().join("bundled");
        fs::create_dir_all(&cache).unwrap();
        fs::create_dir_all(&bundled).unwrap();
        fs::write(cache.join("m.onnx"), b"cached").unwrap();
        fs::write(bundled.join("m.onnx"), b"bundled").unwrap();

        let path = resolve_in(&cache, "m.onnx", UNREACHABLE_URL, Some(&bundled), None).unwrap();
        assert_eq!(path, cache.join("m.onnx"));
    }

    #[test]
    fn test_resolve_falls_back_to_bundled_file() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled = tmp.path().join("bundled");
        fs::create_dir_all(&bundled).unwrap();
        fs::write(bundled.join("m.onnx"), b"bundled").unwrap();

        let path = resolve_in(&cache, "m.onnx", UNREACHABLE_URL, Some(&bundled), None).unwrap();
        assert_eq!(path, bundled.join("m.onnx"));
    }

    #[test]
    fn test_resolve_download_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let result = resolve_in(&cache, "m.onnx", UNREACHABLE_URL, None, None);
        assert!(matches!(result, Err(ModelResolveError::Download { .. })));
    }

    #[test]
    fn test_model_cache_dir_returns_path() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains("Facemark"));
        assert!(path.ends_with("models"));
    }

    #[test]
    fn test_download_atomic_no_partial_on_failure() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.onnx");
        let _ = download(UNREACHABLE_URL, &dest, None);
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
