//! Frame sequencer
//!
//! Counts CPU cycles and advances a step index once every
//! [`FRAME_SEQUENCER_PERIOD`] cycles. The per-channel clocking that the
//! sequencer drives (sweep, linear counter, length, envelope) is applied by
//! [`crate::Apu::step`] on every cycle.

use crate::constants::FRAME_SEQUENCER_PERIOD;

/// Sequencer step count selected by bit 7 of $4017
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerMode {
    /// Steps 0-3
    #[default]
    FourStep,
    /// Steps 0-4
    FiveStep,
}

impl SequencerMode {
    /// Number of steps before the index wraps to 0
    #[inline]
    pub fn step_count(self) -> u8 {
        match self {
            SequencerMode::FourStep => 4,
            SequencerMode::FiveStep => 5,
        }
    }
}

/// Cycle-counted frame sequencer state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameSequencer {
    /// Step mode
    pub mode: SequencerMode,
    /// Current step (wraps at 4 or 5)
    pub step: u8,
    /// CPU cycles since the last step
    pub cycle_counter: u32,
    /// Frame IRQ enable (inverse of bit 6 of $4017). Stored only.
    pub irq_enabled: bool,
}

impl FrameSequencer {
    /// Create a sequencer in 4-step mode at step 0
    pub fn new() -> Self {
        Self::default()
    }

    /// $4017: mode (bit 7), IRQ inhibit (bit 6); restarts the sequence
    pub fn write_control(&mut self, value: u8) {
        self.mode = if value & 0x80 != 0 {
            SequencerMode::FiveStep
        } else {
            SequencerMode::FourStep
        };
        self.irq_enabled = value & 0x40 == 0;
        self.step = 0;
        self.cycle_counter = 0;
    }

    /// Count one CPU cycle
    ///
    /// Returns true when the cycle completed a sequencer period and the
    /// step index advanced.
    #[inline]
    pub fn clock(&mut self) -> bool {
        self.cycle_counter += 1;
        if self.cycle_counter >= FRAME_SEQUENCER_PERIOD {
            self.cycle_counter = 0;
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance the step index, wrapping per mode
    #[inline]
    fn advance(&mut self) {
        self.step += 1;
        if self.step >= self.mode.step_count() {
            self.step = 0;
        }
    }

    /// Return to power-on state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
