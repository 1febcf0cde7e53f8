//! The detector loop: windows of frames from a capture stream, burst tests
//! per frame, baseline settling per window.

use super::{Detector, DetectorConfig, FrameVerdict, WindowBuffer};
use crate::audio::{FrameStream, Recorder};
use crate::click::{ClickTarget, Clicker};
use anyhow::Result;
use crossbeam_channel::RecvTimeoutError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often a blocking frame read rechecks the stop flag.
const STOP_POLL: Duration = Duration::from_millis(250);

/// How one window attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowOutcome {
    Completed,
    /// The capture stream delivered less than a full frame; the window is
    /// discarded and a fresh one started on a new stream.
    ShortRead,
    Stopped,
}

/// Run the detector loop against the system microphone until `stop` is set.
///
/// Each window acquires a fresh capture stream and releases it before the
/// baseline is recomputed, on every exit path. Failing to open or start a
/// stream is fatal; a stream that dies mid-window only costs that window.
pub fn run_live(
    recorder: &Recorder,
    config: &DetectorConfig,
    target: &ClickTarget,
    clicker: &mut dyn Clicker,
    stop: &AtomicBool,
) -> Result<()> {
    let n_frames = config.frames_per_window();
    let frame_size = config.frame_size();
    let mut detector = Detector::new(config);
    info!(
        device = %recorder.device_name(),
        n_frames,
        frame_size,
        threshold = config.burst_threshold(),
        "listening for bursts"
    );

    while !stop.load(Ordering::Relaxed) {
        let stream = recorder.open_frames(&config.capture_params())?;
        let mut window = WindowBuffer::new(n_frames, frame_size);
        let outcome = fill_window(&stream, &mut window, &mut detector, target, clicker, stop);
        let dropped = stream.dropped_frames();
        drop(stream);

        match outcome {
            WindowOutcome::Stopped => break,
            WindowOutcome::ShortRead => {
                warn!("capture stream ended mid-window, restarting window");
            }
            WindowOutcome::Completed => {
                if dropped > 0 {
                    debug!(dropped, "capture frames dropped during window");
                }
                settle_window(&mut detector, window);
            }
        }
    }

    info!("detector loop stopped");
    Ok(())
}

fn fill_window(
    stream: &FrameStream,
    window: &mut WindowBuffer,
    detector: &mut Detector,
    target: &ClickTarget,
    clicker: &mut dyn Clicker,
    stop: &AtomicBool,
) -> WindowOutcome {
    for index in 0..window.n_frames() {
        let frame = loop {
            if stop.load(Ordering::Relaxed) {
                return WindowOutcome::Stopped;
            }
            match stream.recv_timeout(STOP_POLL) {
                Ok(frame) => break frame,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return WindowOutcome::ShortRead,
            }
        };
        if frame.len() != window.frame_size() {
            return WindowOutcome::ShortRead;
        }
        window.store(index, &frame);
        apply_frame(detector, window.frame(index), target, clicker);
    }
    WindowOutcome::Completed
}

fn apply_frame(
    detector: &mut Detector,
    frame: &[f32],
    target: &ClickTarget,
    clicker: &mut dyn Clicker,
) {
    match detector.process_frame(frame, Instant::now()) {
        FrameVerdict::Quiet => {}
        FrameVerdict::Burst { mean_level, fire } => {
            info!(mean_level, "burst detected");
            if fire {
                let (x, y) = target.next_point(&mut rand::thread_rng());
                if let Err(err) = clicker.click(x, y) {
                    warn!("click failed: {err:#}");
                }
            } else {
                debug!("burst suppressed by debounce");
            }
        }
    }
}

fn settle_window(detector: &mut Detector, window: WindowBuffer) {
    match detector.complete_window(window.into_samples()) {
        Some(ambient) => info!(ambient, "ambient baseline updated"),
        None => warn!("window held no valid samples, ambient baseline unchanged"),
    }
}

/// What an offline run over pre-decoded PCM observed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DetectionSummary {
    pub windows: usize,
    pub bursts: usize,
    pub clicks: usize,
    pub ambient: Option<f32>,
}

/// Drive the detector over mono PCM without a capture device.
///
/// Samples are sliced into `frame_size` frames and run through the same
/// per-frame and per-window paths as the live loop; a trailing partial frame
/// and a trailing partial window are discarded, matching the fixed-size reads
/// of live capture.
pub fn detect_from_pcm(
    samples: &[f32],
    config: &DetectorConfig,
    target: &ClickTarget,
    clicker: &mut dyn Clicker,
) -> DetectionSummary {
    let n_frames = config.frames_per_window();
    let frame_size = config.frame_size();
    let mut detector = Detector::new(config);
    let mut summary = DetectionSummary::default();
    let mut window = WindowBuffer::new(n_frames, frame_size);
    let mut index = 0usize;

    for frame in samples.chunks_exact(frame_size) {
        window.store(index, frame);
        match detector.process_frame(window.frame(index), Instant::now()) {
            FrameVerdict::Quiet => {}
            FrameVerdict::Burst { fire, .. } => {
                summary.bursts += 1;
                if fire {
                    let (x, y) = target.next_point(&mut rand::thread_rng());
                    if let Err(err) = clicker.click(x, y) {
                        warn!("click failed: {err:#}");
                    }
                    summary.clicks += 1;
                }
            }
        }
        index += 1;
        if index == n_frames {
            let completed = std::mem::replace(&mut window, WindowBuffer::new(n_frames, frame_size));
            detector.complete_window(completed.into_samples());
            summary.windows += 1;
            index = 0;
        }
    }

    summary.ambient = detector.baseline();
    summary
}
