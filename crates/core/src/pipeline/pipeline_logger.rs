use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for pipeline orchestration events.
///
/// Use cases report progress, stage timings and metrics through this trait
/// so the binaries decide how (and whether) to surface them.
pub trait PipelineLogger: Send {
    /// Report progress. `total` is `None` for open-ended sources like a camera.
    fn progress(&mut self, current: usize, total: Option<usize>);

    /// Record how long a named pipeline stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. faces in the frame).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: Option<usize>) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Tracks per-stage timing and metrics and reports a summary through
/// `log` when the session ends.
///
/// Progress on open-ended sources is throttled to every `throttle_frames`
/// frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    frames_seen: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames_seen: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let frames = self.frames_seen;
        let mut lines = vec![format!(
            "Session summary ({frames} frames, {elapsed_s:.1}s):"
        )];

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by(|a, b| a.0.cmp(b.0));
        for (stage, durations) in stages {
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = mean(durations);
            let max_ms = durations.iter().copied().fold(0.0, f64::max);
            lines.push(format!(
                "  {stage:10}: avg {avg_ms:6.1}ms  max {max_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        let mut metrics: Vec<_> = self.metrics.iter().collect();
        metrics.sort_by(|a, b| a.0.cmp(b.0));
        for (name, values) in metrics {
            lines.push(format!("  {name}: avg {:.1}", mean(values)));
        }

        if frames > 0 && elapsed_s > 0.0 {
            lines.push(format!("  Throughput: {:.1} fps", frames as f64 / elapsed_s));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: Option<usize>) {
        self.frames_seen = current;
        match total {
            Some(total) => log::info!("Processed {current}/{total}"),
            None if current % self.throttle_frames == 0 => {
                log::debug!("Processed {current} frames")
            }
            None => {}
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, None);
        logger.timing("detect", 5.0);
        logger.metric("faces", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values_per_stage() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("render", 5.0);

        assert_eq!(logger.timings_for("detect").unwrap(), &[20.0, 30.0]);
        assert_eq!(logger.timings_for("render").unwrap(), &[5.0]);
        assert!(logger.timings_for("landmarks").is_none());
    }

    #[test]
    fn test_metric_average_in_summary() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("faces", 1.0);
        logger.metric("faces", 2.0);

        assert_relative_eq!(mean(logger.metrics_for("faces").unwrap()), 1.5);
        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("faces: avg 1.5"));
    }

    #[test]
    fn test_summary_lists_stages_and_throughput() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(40, None);
        logger.timing("landmarks", 4.0);
        logger.timing("detect", 12.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.starts_with("Session summary (40 frames"));
        let detect = summary.find("detect").unwrap();
        let landmarks = summary.find("landmarks").unwrap();
        assert!(detect < landmarks, "stages are sorted by name");
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = StdoutPipelineLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_latest_count() {
        let mut logger = StdoutPipelineLogger::default();
        logger.progress(2, Some(3));
        assert_eq!(logger.frames_seen, 2);
        logger.progress(3, Some(3));
        assert_eq!(logger.frames_seen, 3);
    }

    #[test]
    fn test_throttle_is_at_least_one() {
        let logger = StdoutPipelineLogger::new(0);
        assert_eq!(logger.throttle_frames, 1);
    }
}
