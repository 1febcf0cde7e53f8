//! Rolling ambient baseline over a bounded history of raw windows.

use std::collections::VecDeque;

/// Near-zero seed so the very first burst comparison is maximally sensitive.
pub(crate) const AMBIENT_SEED: f32 = 1e-10;

/// Tracks the expected background amplitude magnitude.
///
/// Keeps the `memory` most recent windows verbatim and recomputes the
/// baseline as the mean absolute value over all retained samples, ignoring
/// non-finite entries (unfilled window slots are NaN).
pub struct AmbientEstimator {
    baseline: Option<f32>,
    history: VecDeque<Vec<f32>>,
    memory: usize,
}

impl AmbientEstimator {
    pub fn new(memory: usize) -> Self {
        Self {
            baseline: Some(AMBIENT_SEED),
            history: VecDeque::new(),
            memory: memory.max(1),
        }
    }

    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }

    pub fn window_count(&self) -> usize {
        self.history.len()
    }

    /// Cold-start guard: if the baseline is somehow still unset, seed it from
    /// the current frame's mean absolute value.
    pub fn seed_from_frame(&mut self, frame: &[f32]) {
        if self.baseline.is_none() {
            self.baseline = finite_mean_abs(frame.iter());
        }
    }

    /// Append a completed window, evict past `memory`, and recompute the
    /// baseline over the retained history. A history with no finite sample
    /// leaves the baseline unchanged.
    pub fn absorb_window(&mut self, window: Vec<f32>) -> Option<f32> {
        self.history.push_back(window);
        while self.history.len() > self.memory {
            self.history.pop_front();
        }
        if let Some(mean) = finite_mean_abs(self.history.iter().flatten()) {
            self.baseline = Some(mean);
        }
        self.baseline
    }
}

/// Mean absolute value over the finite entries, `None` when there are none.
fn finite_mean_abs<'a, I>(samples: I) -> Option<f32>
where
    I: IntoIterator<Item = &'a f32>,
{
    let mut sum = 0.0f64;
    let mut count = 0u64;
    for &sample in samples {
        if sample.is_finite() {
            sum += f64::from(sample.abs());
            count += 1;
        }
    }
    (count > 0).then(|| (sum / count as f64) as f32)
}
