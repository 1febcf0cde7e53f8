//! Microphone capture via CPAL.
//!
//! Opens an input stream at the configured rate and channel count, converts
//! every supported sample format to f32, and hands fixed-size mono frames to
//! the detector over a bounded channel.

use super::dispatch::FrameDispatcher;
use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SampleRate, StreamConfig};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Stream geometry for one window's capture.
#[derive(Debug, Clone)]
pub struct CaptureParams {
    pub sample_rate: u32,
    pub channels: u16,
    pub frame_size: usize,
    pub channel_capacity: usize,
}

/// Audio input device wrapper.
///
/// Holds the chosen device; a fresh stream is opened per window so the
/// handle's lifetime matches one window exactly.
pub struct Recorder {
    device: cpal::Device,
}

impl Recorder {
    /// List microphone names so the CLI can expose a human-friendly selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host.input_devices().context("no input devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Create a recorder, optionally forcing a specific device so users can
    /// pick the right microphone when a machine exposes multiple inputs.
    pub fn new(preferred_device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host.input_devices().context("no input devices available")?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| anyhow!("input device '{name}' not found"))?
            }
            None => host
                .default_input_device()
                .context("no default input device available")?,
        };
        Ok(Self { device })
    }

    /// Name of the active capture device.
    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }

    /// Open and start an input stream delivering `frame_size`-sample mono
    /// frames. The returned guard pauses and releases the stream on drop.
    pub fn open_frames(&self, params: &CaptureParams) -> Result<FrameStream> {
        let format = self
            .device
            .default_input_config()
            .with_context(|| {
                format!(
                    "no input config available on '{}'. {}",
                    self.device_name(),
                    mic_permission_hint()
                )
            })?
            .sample_format();
        let stream_config = StreamConfig {
            channels: params.channels.max(1),
            sample_rate: SampleRate(params.sample_rate),
            buffer_size: BufferSize::Default,
        };
        let channels = usize::from(stream_config.channels);

        let (sender, frames) = bounded::<Vec<f32>>(params.channel_capacity.max(1));
        let dropped = Arc::new(AtomicUsize::new(0));
        let dispatcher = Arc::new(Mutex::new(FrameDispatcher::new(
            params.frame_size,
            sender,
            dropped.clone(),
        )));

        debug!(
            format = ?format,
            sample_rate = params.sample_rate,
            channels,
            frame_size = params.frame_size,
            "opening capture stream"
        );

        // Convert every supported sample type to f32 in the callback so the
        // rest of the pipeline stays format-agnostic.
        let stream = match format {
            SampleFormat::F32 => {
                self.build_stream::<f32>(&stream_config, channels, dispatcher, dropped.clone(), |s| s)
            }
            SampleFormat::I16 => {
                self.build_stream::<i16>(&stream_config, channels, dispatcher, dropped.clone(), |s| {
                    f32::from(s) / 32_768.0
                })
            }
            SampleFormat::U16 => {
                self.build_stream::<u16>(&stream_config, channels, dispatcher, dropped.clone(), |s| {
                    (f32::from(s) - 32_768.0) / 32_768.0
                })
            }
            other => bail!("unsupported sample format: {other:?}"),
        }
        .with_context(|| {
            format!(
                "failed to open input stream on '{}'. {}",
                self.device_name(),
                mic_permission_hint()
            )
        })?;

        stream.play().context("failed to start the input stream")?;

        Ok(FrameStream {
            stream,
            frames,
            dropped,
        })
    }

    fn build_stream<T>(
        &self,
        config: &StreamConfig,
        channels: usize,
        dispatcher: Arc<Mutex<FrameDispatcher>>,
        dropped: Arc<AtomicUsize>,
        convert: fn(T) -> f32,
    ) -> Result<cpal::Stream, cpal::BuildStreamError>
    where
        T: cpal::SizedSample + 'static,
    {
        self.device.build_input_stream(
            config,
            move |data: &[T], _| {
                if let Ok(mut pump) = dispatcher.try_lock() {
                    pump.push(data, channels, convert);
                } else {
                    dropped.fetch_add(1, Ordering::Relaxed);
                }
            },
            |err| warn!("audio stream error: {err}"),
            None,
        )
    }
}

/// A live input stream plus the channel its frames arrive on.
///
/// Pausing and releasing the device happens on drop, so the handle is
/// guaranteed to be returned at the end of a window on every exit path.
pub struct FrameStream {
    stream: cpal::Stream,
    frames: Receiver<Vec<f32>>,
    dropped: Arc<AtomicUsize>,
}

impl FrameStream {
    /// Blocking read of one frame, bounded by `timeout` so the caller can
    /// poll its stop flag.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Vec<f32>, RecvTimeoutError> {
        self.frames.recv_timeout(timeout)
    }

    /// Frames dropped so far because the channel was full or contended.
    pub fn dropped_frames(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Drop for FrameStream {
    fn drop(&mut self) {
        if let Err(err) = self.stream.pause() {
            debug!("failed to pause audio stream: {err}");
        }
    }
}

fn mic_permission_hint() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "macOS: System Settings > Privacy & Security > Microphone (enable your terminal)."
    }
    #[cfg(target_os = "linux")]
    {
        "Linux: check PipeWire/PulseAudio permissions and ensure the device is not muted."
    }
    #[cfg(target_os = "windows")]
    {
        "Windows: Settings > Privacy & Security > Microphone (allow access for your terminal)."
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        "Check OS microphone permissions."
    }
}
