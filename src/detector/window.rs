//! NaN-initialized sample buffer for one ambient window.

/// Flat buffer of `n_frames * frame_size` samples. Slots start as NaN so any
/// unfilled position stays detectably invalid for the NaN-ignoring baseline.
pub struct WindowBuffer {
    samples: Vec<f32>,
    frame_size: usize,
}

impl WindowBuffer {
    pub fn new(n_frames: usize, frame_size: usize) -> Self {
        let frame_size = frame_size.max(1);
        Self {
            samples: vec![f32::NAN; n_frames * frame_size],
            frame_size,
        }
    }

    pub fn n_frames(&self) -> usize {
        self.samples.len() / self.frame_size
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Store one frame at its slot. `frame` must hold exactly `frame_size`
    /// samples.
    pub fn store(&mut self, index: usize, frame: &[f32]) {
        let start = index * self.frame_size;
        self.samples[start..start + self.frame_size].copy_from_slice(frame);
    }

    /// The samples stored at frame `index`.
    pub fn frame(&self, index: usize) -> &[f32] {
        let start = index * self.frame_size;
        &self.samples[start..start + self.frame_size]
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}
