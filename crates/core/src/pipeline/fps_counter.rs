use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Frames-per-second accumulator that refreshes once per second.
///
/// The reported value describes the previous one-second window, not the
/// instantaneous rate. The frame that closes a window is not counted in
/// either window.
#[derive(Clone, Debug)]
pub struct FpsCounter {
    window_start: Instant,
    count: u32,
    fps: f64,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            count: 0,
            fps: 0.0,
        }
    }

    /// Registers one displayed frame at `now` and returns the current reading.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= WINDOW {
            self.fps = self.count as f64 / elapsed.as_secs_f64();
            self.count = 0;
            self.window_start = now;
        } else {
            self.count += 1;
        }
        self.fps
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

const SIGNIFICANT_DIGITS: i32 = 6;

/// Overlay text for a reading, e.g. `"29.9701 fps"`.
///
/// The number is printed in shortest form with six significant digits:
/// trailing zeros are dropped and very large or small values switch to
/// exponent notation (`"1.23457e+06"`).
pub fn format_fps(fps: f64) -> String {
    format!("{} fps", format_significant(fps))
}

fn format_significant(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    // Exponent after rounding, so 999999.7 counts as 1e+06.
    let rounded: f64 = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value)
        .parse()
        .unwrap_or(value);
    let exponent = rounded.abs().log10().floor() as i32;

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let text = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
        let (mantissa, exp) = text.split_once('e').unwrap_or((&text, "0"));
        let exp: i32 = exp.parse().unwrap_or(exponent);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
        trim_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
