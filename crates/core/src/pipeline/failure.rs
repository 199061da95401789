//! User-facing classification of errors that end a run.

use crate::detection::infrastructure::dlib_model_reader::ModelLoadError;
use crate::shared::constants::LANDMARK_MODEL_URL;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Landmark model file missing or unreadable as a model.
    ModelUnavailable,
    Generic,
}

/// Walks `err` and its sources looking for an unavailable landmark model.
pub fn classify_failure(err: &(dyn std::error::Error + 'static)) -> FailureKind {
    let mut current = Some(err);
    while let Some(e) = current {
        if e
            .downcast_ref::<ModelLoadError>()
            .is_some_and(ModelLoadError::is_unavailable)
        {
            return FailureKind::ModelUnavailable;
        }
        current = e.source();
    }
    FailureKind::Generic
}

/// Text to print for an error that ended the run.
pub fn failure_report(err: &(dyn std::error::Error + 'static)) -> String {
    match classify_failure(err) {
        FailureKind::ModelUnavailable => format!(
            "You need dlib's default face landmarking model file to run this example.\n\
             You can get it from the following URL: \n   \
             {LANDMARK_MODEL_URL}\n\n\
             {err}"
        ),
        FailureKind::Generic => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Debug, thiserror::Error)]
    #[error("session setup failed")]
    struct Wrapper(#[source] ModelLoadError);

    fn missing() -> ModelLoadError {
        ModelLoadError::Missing {
            path: PathBuf::from("shape_predictor_68_face_landmarks.dat"),
        }
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        let err: Box<dyn std::error::Error> = Box::new(missing());
        assert_eq!(classify_failure(err.as_ref()), FailureKind::ModelUnavailable);
    }

    #[test]
    fn test_corrupt_model_is_unavailable() {
        let err = ModelLoadError::Corrupt {
            path: PathBuf::from("m.dat"),
            reason: "unexpected end of file".into(),
        };
        assert_eq!(classify_failure(&err), FailureKind::ModelUnavailable);
    }

    #[test]
    fn test_wrapped_model_error_is_found_in_source_chain() {
        let err = Wrapper(missing());
        assert_eq!(classify_failure(&err), FailureKind::ModelUnavailable);
    }

    #[test]
    fn test_io_model_error_is_generic() {
        let err = ModelLoadError::Io {
            path: PathBuf::from("m.dat"),
            source: std::io::Error::other("disk on fire"),
        };
        assert_eq!(classify_failure(&err), FailureKind::Generic);
    }

    #[test]
    fn test_bad_image_path_is_generic() {
        let err: Box<dyn std::error::Error> = "Unable to open /nope.jpg".into();
        assert_eq!(classify_failure(err.as_ref()), FailureKind::Generic);
        assert_eq!(failure_report(err.as_ref()), "Unable to open /nope.jpg");
    }

    #[test]
    fn test_unavailable_report_has_instructions_url_and_cause() {
        let report = failure_report(&missing());
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(
            lines[0],
            "You need dlib's default face landmarking model file to run this example."
        );
        assert_eq!(lines[1], "You can get it from the following URL: ");
        assert_eq!(lines[2].trim(), LANDMARK_MODEL_URL);
        assert_eq!(lines[3], "");
        assert!(lines[4].contains("shape_predictor_68_face_landmarks.dat"));
    }
}
