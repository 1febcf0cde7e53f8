//! Ambient-noise estimation and burst detection.
//!
//! Audio arrives as fixed-size mono frames. Frames are gathered into windows
//! of a fixed wall-clock duration; a rolling ambient baseline is recomputed
//! from the last few windows, and a frame whose above-baseline sample count
//! clears the burst threshold triggers a debounced click.

mod ambient;
mod runner;
mod window;

pub use ambient::AmbientEstimator;
pub use runner::{detect_from_pcm, run_live, DetectionSummary};
pub use window::WindowBuffer;

use crate::audio::CaptureParams;
use crate::config::{
    DEFAULT_AMBIENT_MEM, DEFAULT_BURST_FRACTION, DEFAULT_CHANNELS, DEFAULT_CHANNEL_CAPACITY,
    DEFAULT_CHUNK_SIZE, DEFAULT_CLICK_DEBOUNCE_S, DEFAULT_REFRESH_TIME_S, DEFAULT_SAMPLE_RATE,
};
use std::time::{Duration, Instant};

/// Window geometry and detection thresholds for one run of the loop.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub chunk_size: usize,
    pub sample_rate: u32,
    pub channels: u16,
    pub refresh_time_s: f64,
    pub ambient_mem: usize,
    pub burst_fraction: f64,
    pub click_debounce_s: f64,
    pub channel_capacity: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
            refresh_time_s: DEFAULT_REFRESH_TIME_S,
            ambient_mem: DEFAULT_AMBIENT_MEM,
            burst_fraction: DEFAULT_BURST_FRACTION,
            click_debounce_s: DEFAULT_CLICK_DEBOUNCE_S,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl DetectorConfig {
    /// Mono samples per frame. A capture read delivers `chunk_size` raw
    /// interleaved values; the decoded frame keeps half of them.
    pub fn frame_size(&self) -> usize {
        self.chunk_size / 2
    }

    /// Frames per window, truncated: `rate / chunk * refresh_time`.
    pub fn frames_per_window(&self) -> usize {
        (f64::from(self.sample_rate) / self.chunk_size as f64 * self.refresh_time_s) as usize
    }

    /// Burst threshold, in samples-over-baseline per frame. Scaled by the raw
    /// chunk size, not the frame size: a frame only qualifies when more than
    /// `2 * burst_fraction` of its samples sit above the baseline.
    pub fn burst_threshold(&self) -> f32 {
        (self.chunk_size as f64 * self.burst_fraction) as f32
    }

    pub fn click_debounce(&self) -> Duration {
        Duration::from_secs_f64(self.click_debounce_s.max(0.0))
    }

    pub(crate) fn capture_params(&self) -> CaptureParams {
        CaptureParams {
            sample_rate: self.sample_rate,
            channels: self.channels,
            frame_size: self.frame_size(),
            channel_capacity: self.channel_capacity,
        }
    }
}

/// Outcome of the burst test for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameVerdict {
    Quiet,
    Burst {
        /// Signed mean of the frame. Diagnostic only: it can sit near zero
        /// even during a loud burst, while detection runs on absolute values.
        mean_level: f32,
        /// Whether the debounce gate let this burst trigger a click.
        fire: bool,
    },
}

/// Minimum spacing between triggered clicks.
#[derive(Debug, Clone)]
pub struct ClickDebounce {
    min_gap: Duration,
    last_click: Option<Instant>,
}

impl ClickDebounce {
    pub fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            last_click: None,
        }
    }

    /// Returns true when a click may fire at `now`, recording the click time
    /// when it does. Suppressed bursts leave the timestamp untouched.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_click {
            if now <= last + self.min_gap {
                return false;
            }
        }
        self.last_click = Some(now);
        true
    }

    pub fn last_click(&self) -> Option<Instant> {
        self.last_click
    }
}

/// Per-frame burst detection against the rolling ambient baseline.
pub struct Detector {
    threshold: f32,
    ambient: AmbientEstimator,
    debounce: ClickDebounce,
}

impl Detector {
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            threshold: config.burst_threshold(),
            ambient: AmbientEstimator::new(config.ambient_mem),
            debounce: ClickDebounce::new(config.click_debounce()),
        }
    }

    /// Run the burst test for one frame.
    ///
    /// A frame qualifies as a burst when the count of samples whose absolute
    /// value strictly exceeds the baseline is itself strictly above the
    /// threshold. The baseline is seeded from the first frame if it is still
    /// unset (cold-start guard; the epsilon seed normally covers this).
    pub fn process_frame(&mut self, frame: &[f32], now: Instant) -> FrameVerdict {
        self.ambient.seed_from_frame(frame);
        let Some(baseline) = self.ambient.baseline() else {
            return FrameVerdict::Quiet;
        };
        let over = frame.iter().filter(|s| s.abs() > baseline).count();
        if over as f32 <= self.threshold {
            return FrameVerdict::Quiet;
        }
        FrameVerdict::Burst {
            mean_level: signed_mean(frame),
            fire: self.debounce.try_fire(now),
        }
    }

    /// Absorb a completed window into the history and recompute the baseline.
    /// Returns the baseline in effect afterwards.
    pub fn complete_window(&mut self, window: Vec<f32>) -> Option<f32> {
        self.ambient.absorb_window(window)
    }

    pub fn baseline(&self) -> Option<f32> {
        self.ambient.baseline()
    }

    pub fn window_count(&self) -> usize {
        self.ambient.window_count()
    }

    pub fn last_click(&self) -> Option<Instant> {
        self.debounce.last_click()
    }
}

fn signed_mean(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}
