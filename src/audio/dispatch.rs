use crossbeam_channel::{Sender, TrySendError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Average interleaved multi-channel data down to mono while converting each
/// raw sample to f32. A trailing partial group is averaged over its length.
pub(super) fn downmix_into<T, F>(buf: &mut Vec<f32>, data: &[T], channels: usize, mut convert: F)
where
    T: Copy,
    F: FnMut(T) -> f32,
{
    if channels <= 1 {
        buf.extend(data.iter().copied().map(&mut convert));
        return;
    }
    for group in data.chunks(channels) {
        let sum: f32 = group.iter().copied().map(&mut convert).sum();
        buf.push(sum / group.len() as f32);
    }
}

/// Slices the mono stream into fixed-size frames on the capture callback.
///
/// The callback must never block, so a full channel drops the frame and
/// counts it instead of waiting for the detector.
pub(super) struct FrameDispatcher {
    frame_size: usize,
    pending: Vec<f32>,
    mono: Vec<f32>,
    sender: Sender<Vec<f32>>,
    dropped: Arc<AtomicUsize>,
}

impl FrameDispatcher {
    pub(super) fn new(
        frame_size: usize,
        sender: Sender<Vec<f32>>,
        dropped: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            frame_size: frame_size.max(1),
            pending: Vec::with_capacity(frame_size),
            mono: Vec::new(),
            sender,
            dropped,
        }
    }

    pub(super) fn push<T, F>(&mut self, data: &[T], channels: usize, convert: F)
    where
        T: Copy,
        F: FnMut(T) -> f32,
    {
        self.mono.clear();
        downmix_into(&mut self.mono, data, channels, convert);
        self.pending.extend_from_slice(&self.mono);

        while self.pending.len() >= self.frame_size {
            let frame: Vec<f32> = self.pending.drain(..self.frame_size).collect();
            match self.sender.try_send(frame) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                }
                Err(TrySendError::Disconnected(_)) => break,
            }
        }
    }
}
