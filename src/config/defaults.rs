//! Startup defaults. Every constant here matches a source-level constant of
//! the original detector loop; all of them are overridable from the CLI.

/// Raw interleaved values delivered per capture read.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Capture sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Capture channel count.
pub const DEFAULT_CHANNELS: u16 = 2;

/// Seconds of audio per ambient window.
pub const DEFAULT_REFRESH_TIME_S: f64 = 10.0;

/// Number of recent windows retained for the ambient baseline.
pub const DEFAULT_AMBIENT_MEM: usize = 2;

/// Fraction of a chunk that must exceed the baseline to flag a burst.
pub const DEFAULT_BURST_FRACTION: f64 = 0.3;

/// Minimum seconds between two triggered clicks.
pub const DEFAULT_CLICK_DEBOUNCE_S: f64 = 1.0;

/// Capture channel depth, in frames.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

pub(crate) const MIN_CHANNEL_CAPACITY: usize = 8;
pub(crate) const MAX_CHANNEL_CAPACITY: usize = 1024;
