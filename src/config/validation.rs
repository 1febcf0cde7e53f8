use super::defaults::{MAX_CHANNEL_CAPACITY, MIN_CHANNEL_CAPACITY};
use super::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before the loop starts.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size < 2 {
            bail!("--chunk-size must be at least 2, got {}", self.chunk_size);
        }
        if self.sample_rate == 0 {
            bail!("--sample-rate must be positive");
        }
        if self.channels == 0 {
            bail!("--channels must be at least 1");
        }
        if !self.refresh_time_s.is_finite() || self.refresh_time_s <= 0.0 {
            bail!(
                "--refresh-time-s must be a positive number, got {}",
                self.refresh_time_s
            );
        }
        if self.ambient_mem == 0 {
            bail!("--ambient-mem must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.burst_fraction) {
            bail!(
                "--burst-fraction must be between 0.0 and 1.0, got {}",
                self.burst_fraction
            );
        }
        if !self.click_debounce_s.is_finite() || self.click_debounce_s < 0.0 {
            bail!(
                "--click-debounce-s must be zero or positive, got {}",
                self.click_debounce_s
            );
        }
        if !(MIN_CHANNEL_CAPACITY..=MAX_CHANNEL_CAPACITY).contains(&self.channel_capacity) {
            bail!(
                "--channel-capacity must be between {MIN_CHANNEL_CAPACITY} and {MAX_CHANNEL_CAPACITY}, got {}",
                self.channel_capacity
            );
        }
        if self.random_target && (self.click_x.is_some() || self.click_y.is_some()) {
            bail!("--click-x/--click-y cannot be combined with --random-target");
        }
        // A window must hold at least one full frame, or the loop would spin
        // recomputing the baseline over nothing.
        if self.detector_config().frames_per_window() == 0 {
            bail!(
                "--refresh-time-s {} holds less than one chunk of {} samples at {} Hz",
                self.refresh_time_s,
                self.chunk_size,
                self.sample_rate
            );
        }
        Ok(())
    }
}
