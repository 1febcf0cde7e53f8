//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;

pub use defaults::{
    DEFAULT_AMBIENT_MEM, DEFAULT_BURST_FRACTION, DEFAULT_CHANNELS, DEFAULT_CHANNEL_CAPACITY,
    DEFAULT_CHUNK_SIZE, DEFAULT_CLICK_DEBOUNCE_S, DEFAULT_REFRESH_TIME_S, DEFAULT_SAMPLE_RATE,
};

use crate::detector::DetectorConfig;

/// CLI options for the chimeclick detector loop. Validated values keep the
/// window geometry and the capture stream consistent.
#[derive(Debug, Parser, Clone)]
#[command(about = "Sound-activated click automation", author, version)]
#[command(allow_negative_numbers = true)]
pub struct AppConfig {
    /// Raw interleaved values per capture read
    #[arg(long = "chunk-size", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Capture sample rate (Hz)
    #[arg(long = "sample-rate", default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Capture channel count
    #[arg(long, default_value_t = DEFAULT_CHANNELS)]
    pub channels: u16,

    /// Seconds of audio gathered per ambient window
    #[arg(long = "refresh-time-s", default_value_t = DEFAULT_REFRESH_TIME_S)]
    pub refresh_time_s: f64,

    /// Number of recent windows the ambient baseline averages over
    #[arg(long = "ambient-mem", default_value_t = DEFAULT_AMBIENT_MEM)]
    pub ambient_mem: usize,

    /// Fraction of a chunk that must exceed the baseline to flag a burst
    #[arg(long = "burst-fraction", default_value_t = DEFAULT_BURST_FRACTION)]
    pub burst_fraction: f64,

    /// Minimum seconds between two triggered clicks
    #[arg(long = "click-debounce-s", default_value_t = DEFAULT_CLICK_DEBOUNCE_S)]
    pub click_debounce_s: f64,

    /// Fixed click target X (defaults to half the screen width)
    #[arg(long = "click-x")]
    pub click_x: Option<i32>,

    /// Fixed click target Y (defaults to 40% of the screen height)
    #[arg(long = "click-y")]
    pub click_y: Option<i32>,

    /// Pick a fresh random on-screen position for every click
    #[arg(long = "random-target", default_value_t = false)]
    pub random_target: bool,

    /// Log clicks without performing them
    #[arg(long = "dummy", env = "CHIMECLICK_DUMMY", default_value_t = false)]
    pub dummy: bool,

    /// Preferred audio input device name
    #[arg(long = "input-device")]
    pub input_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Capture channel depth in frames
    #[arg(long = "channel-capacity", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,
}

impl AppConfig {
    /// Snapshot the window geometry and thresholds for the detector.
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            chunk_size: self.chunk_size,
            sample_rate: self.sample_rate,
            channels: self.channels,
            refresh_time_s: self.refresh_time_s,
            ambient_mem: self.ambient_mem,
            burst_fraction: self.burst_fraction,
            click_debounce_s: self.click_debounce_s,
            channel_capacity: self.channel_capacity,
        }
    }
}
