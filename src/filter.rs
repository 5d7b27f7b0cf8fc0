//! Output smoothing filter
//!
//! Cascaded two-stage low-pass applied to the mixed signal before it is
//! clamped and buffered. Removes the harshest edges of the naive square
//! and noise waveforms.

/// Weight of the incoming sample in the first stage
const STAGE1_INPUT: f32 = 0.8;
/// Weight of the previous output in the first stage
const STAGE1_HISTORY: f32 = 0.2;
/// Weight of the first stage result in the second stage
const STAGE2_INPUT: f32 = 0.9;
/// Weight of the output two samples back in the second stage
const STAGE2_HISTORY: f32 = 0.1;

/// Two-stage smoothing filter with two samples of history
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothingFilter {
    /// Previous filter output
    prev: f32,
    /// Filter output two samples back
    prev_prev: f32,
}

impl SmoothingFilter {
    /// Create a filter with zeroed history
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one sample
    ///
    /// History keeps the unclamped output; clamping is the caller's concern.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let stage1 = STAGE1_INPUT * sample + STAGE1_HISTORY * self.prev;
        let stage2 = STAGE2_INPUT * stage1 + STAGE2_HISTORY * self.prev_prev;

        self.prev_prev = self.prev;
        self.prev = stage2;
        stage2
    }

    /// Filter history as `(prev, prev_prev)`
    pub fn history(&self) -> (f32, f32) {
        (self.prev, self.prev_prev)
    }

    /// Reset the filter state
    pub fn reset(&mut self) {
        self.prev = 0.0;
        self.prev_prev = 0.0;
    }
}
