//! Bounded output sample buffer
//!
//! Holds the most recent samples produced by the mixer until the host's
//! audio backend collects them. Appending never fails and never blocks:
//! once the buffer holds more than its capacity, the oldest samples are
//! discarded.

use crate::constants::BUFFER_CAPACITY;

/// Append-only sample buffer retaining the newest `capacity` samples
#[derive(Debug, Clone, PartialEq)]
pub struct OutputBuffer {
    /// Buffered samples, oldest first
    samples: Vec<f32>,
    /// Maximum number of retained samples
    capacity: usize,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputBuffer {
    /// Create a buffer holding one second of audio
    pub fn new() -> Self {
        Self::with_capacity(BUFFER_CAPACITY)
    }

    /// Create a buffer with a custom retention limit
    ///
    /// A capacity of 0 is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append one sample, evicting the oldest on overflow
    pub fn push(&mut self, sample: f32) {
        self.samples.push(sample);
        self.truncate_front();
    }

    /// Append a block of samples, evicting the oldest on overflow
    pub fn extend_from_slice(&mut self, block: &[f32]) {
        self.samples.extend_from_slice(block);
        self.truncate_front();
    }

    /// Drop samples from the front until the buffer fits its capacity
    #[inline]
    fn truncate_front(&mut self) {
        if self.samples.len() > self.capacity {
            let excess = self.samples.len() - self.capacity;
            self.samples.drain(..excess);
        }
    }

    /// Non-destructive view of the buffered samples, oldest first
    #[inline]
    pub fn peek(&self) -> &[f32] {
        &self.samples
    }

    /// Take all buffered samples, leaving the buffer empty
    pub fn drain(&mut self) -> Vec<f32> {
        let mut taken = Vec::with_capacity(self.capacity);
        std::mem::swap(&mut taken, &mut self.samples);
        taken
    }

    /// Discard all buffered samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Number of buffered samples
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of retained samples
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
