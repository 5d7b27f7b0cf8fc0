//! Channel state for the five APU voices
//!
//! Each channel kind is a plain record holding its register-derived
//! configuration and live counters. Register decoding for a channel lives
//! next to its record; the dispatcher in [`crate::apu`] only routes
//! addresses to these methods.

use crate::constants::{
    dmc_level, volume_from_nibble, DMC_SAMPLE_BASE, FALLBACK_FREQUENCY, MAX_FREQUENCY,
};

/// Pulse duty cycle selected by bit 7 of $4000/$4004
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DutyCycle {
    /// High for the first quarter of the period
    #[default]
    Quarter,
    /// High for the first half of the period
    Half,
}

/// Noise shift register width selected by bit 7 of $400E
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseMode {
    /// Long sequence (15-bit)
    #[default]
    Long,
    /// Short sequence (6-bit). Stored only; synthesis always uses the long sequence.
    Short,
}

/// Replace the low byte of an 11-bit timer value
#[inline]
fn set_timer_lo(frequency: u16, value: u8) -> u16 {
    (frequency & 0x0700) | value as u16
}

/// Replace the high 3 bits of an 11-bit timer value, substituting the
/// fallback pitch when the result is zero
#[inline]
fn set_timer_hi(frequency: u16, value: u8) -> u16 {
    let frequency = (frequency & 0x00FF) | (((value & 0x07) as u16) << 8);
    if frequency == 0 {
        FALLBACK_FREQUENCY
    } else {
        frequency
    }
}

/// Pulse (square) channel state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PulseChannel {
    /// Channel enable flag ($4015 bit / timer high trigger)
    pub enabled: bool,
    /// Duty cycle
    pub duty_cycle: DutyCycle,
    /// 11-bit timer value, used directly as the tone frequency in Hz
    pub frequency: u16,
    /// Length counter
    pub counter: u16,
    /// Volume (0.0-1.0)
    pub volume: f32,
    /// Sweep unit enable
    pub sweep_enabled: bool,
    /// Sweep divider period (0-7)
    pub sweep_period: u8,
    /// Sweep divider counter
    pub sweep_counter: u8,
    /// Sweep shift count (0-7)
    pub sweep_shift: u8,
    /// Sweep direction: subtract when set
    pub sweep_negate: bool,
}

impl PulseChannel {
    /// $4000/$4004: duty (bit 7) and volume (bits 0-3)
    pub fn write_control(&mut self, value: u8) {
        self.duty_cycle = if value & 0x80 != 0 {
            DutyCycle::Half
        } else {
            DutyCycle::Quarter
        };
        self.volume = volume_from_nibble(value);
    }

    /// $4001/$4005: sweep enable, period, negate and shift
    pub fn write_sweep(&mut self, value: u8) {
        self.sweep_enabled = value & 0x80 != 0;
        self.sweep_period = (value & 0x70) >> 4;
        self.sweep_negate = value & 0x08 != 0;
        self.sweep_shift = value & 0x07;
    }

    /// $4002/$4006: timer low byte
    pub fn write_timer_lo(&mut self, value: u8) {
        self.frequency = set_timer_lo(self.frequency, value);
    }

    /// $4003/$4007: timer high bits; also enables the channel and resets
    /// the length counter
    pub fn write_timer_hi(&mut self, value: u8) {
        self.frequency = set_timer_hi(self.frequency, value);
        self.enabled = true;
        self.counter = 0;
    }

    /// Clock the sweep unit
    ///
    /// When the divider reaches the sweep period the frequency is shifted by
    /// `frequency >> shift` in the configured direction and clamped to the
    /// 11-bit timer range.
    pub fn clock_sweep(&mut self) {
        if !self.sweep_enabled {
            return;
        }

        self.sweep_counter = self.sweep_counter.saturating_add(1);
        if self.sweep_counter >= self.sweep_period {
            self.sweep_counter = 0;

            let change = self.frequency >> self.sweep_shift;
            self.frequency = if self.sweep_negate {
                self.frequency.saturating_sub(change)
            } else {
                self.frequency.saturating_add(change)
            }
            .min(MAX_FREQUENCY);
        }
    }

    /// Decrement the length counter toward zero
    #[inline]
    pub fn clock_length(&mut self) {
        self.counter = self.counter.saturating_sub(1);
    }
}

/// Triangle channel state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriangleChannel {
    /// Channel enable flag
    pub enabled: bool,
    /// 11-bit timer value, used directly as the tone frequency in Hz
    pub frequency: u16,
    /// Length counter
    pub counter: u16,
    /// Volume (0.0-1.0). No register sets it; it only changes through reset.
    pub volume: f32,
    /// Linear counter control (bit 7 of $4008)
    pub linear_counter_enabled: bool,
    /// Linear counter value
    pub linear_counter: u8,
    /// Linear counter reload value (0-127)
    pub linear_counter_reload: u8,
}

impl TriangleChannel {
    /// $4008: linear counter enable (bit 7) and reload (bits 0-6)
    pub fn write_control(&mut self, value: u8) {
        self.linear_counter_enabled = value & 0x80 != 0;
        self.linear_counter_reload = value & 0x7F;
    }

    /// $400A: timer low byte
    pub fn write_timer_lo(&mut self, value: u8) {
        self.frequency = set_timer_lo(self.frequency, value);
    }

    /// $400B: timer high bits; also enables the channel and resets the
    /// length counter
    pub fn write_timer_hi(&mut self, value: u8) {
        self.frequency = set_timer_hi(self.frequency, value);
        self.enabled = true;
        self.counter = 0;
    }

    /// Clock the linear counter
    ///
    /// While enabled the counter counts down to zero; while disabled it is
    /// held at the reload value.
    pub fn clock_linear_counter(&mut self) {
        if self.linear_counter_enabled {
            self.linear_counter = self.linear_counter.saturating_sub(1);
        } else {
            self.linear_counter = self.linear_counter_reload;
        }
    }

    /// Decrement the length counter toward zero
    #[inline]
    pub fn clock_length(&mut self) {
        self.counter = self.counter.saturating_sub(1);
    }
}

/// Noise channel state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseChannel {
    /// Channel enable flag
    pub enabled: bool,
    /// Shift period in output samples (0-15)
    pub period: u8,
    /// Length counter
    pub counter: u16,
    /// Volume (0.0-1.0)
    pub volume: f32,
    /// Linear-feedback shift register, never zero
    pub shift_register: u16,
    /// Sequence mode
    pub mode: NoiseMode,
}

impl Default for NoiseChannel {
    fn default() -> Self {
        Self {
            enabled: false,
            period: 0,
            counter: 0,
            volume: 0.0,
            shift_register: 1,
            mode: NoiseMode::Long,
        }
    }
}

impl NoiseChannel {
    /// $400C: volume (bits 0-3)
    pub fn write_control(&mut self, value: u8) {
        self.volume = volume_from_nibble(value);
    }

    /// $400E: period (bits 0-3) and mode (bit 7)
    pub fn write_period(&mut self, value: u8) {
        self.period = value & 0x0F;
        self.mode = if value & 0x80 != 0 {
            NoiseMode::Short
        } else {
            NoiseMode::Long
        };
    }

    /// $400F: enables the channel and resets the length counter
    pub fn write_length(&mut self, _value: u8) {
        self.enabled = true;
        self.counter = 0;
    }

    /// Advance the 15-bit shift register by one step
    ///
    /// Feedback is bit 0 XOR bit 1, shifted in at bit 14.
    #[inline]
    pub fn shift(&mut self) {
        let feedback = (self.shift_register ^ (self.shift_register >> 1)) & 1;
        self.shift_register = (self.shift_register >> 1) | (feedback << 14);
    }

    /// Decrement the length counter toward zero
    #[inline]
    pub fn clock_length(&mut self) {
        self.counter = self.counter.saturating_sub(1);
    }
}

/// Delta modulation channel state
///
/// All fields are decoded from the registers, but sample synthesis for this
/// channel is a stub that always yields silence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmcChannel {
    /// Channel enable flag
    pub enabled: bool,
    /// Rate index (0-15)
    pub sample_rate: u8,
    /// Rate counter
    pub counter: u16,
    /// Output level from the direct load register (0.0-1.0)
    pub volume: f32,
    /// Restart the sample when it ends
    pub loop_sample: bool,
    /// Sample start address ($C000-$FFC0)
    pub address: u16,
    /// Sample length in bytes
    pub length: u16,
    /// Playback cursor
    pub current_address: u16,
    /// Bytes left in the current sample
    pub bytes_remaining: u16,
    /// Output shift register
    pub shift_register: u8,
    /// Bits left in the output shift register
    pub bits_remaining: u8,
    /// Output unit silence flag
    pub silence: bool,
}

impl Default for DmcChannel {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_rate: 0,
            counter: 0,
            volume: 0.0,
            loop_sample: false,
            address: 0,
            length: 0,
            current_address: 0,
            bytes_remaining: 0,
            shift_register: 0,
            bits_remaining: 0,
            silence: true,
        }
    }
}

impl DmcChannel {
    /// $4010: rate index (bits 0-3) and loop flag (bit 6)
    pub fn write_control(&mut self, value: u8) {
        self.sample_rate = value & 0x0F;
        self.loop_sample = value & 0x40 != 0;
    }

    /// $4011: direct load (bits 0-6)
    pub fn write_direct_load(&mut self, value: u8) {
        self.volume = dmc_level(value);
    }

    /// $4012: sample address = $C000 + value * 64
    pub fn write_address(&mut self, value: u8) {
        self.address = DMC_SAMPLE_BASE + ((value as u16) << 6);
    }

    /// $4013: sample length = value * 16 + 1
    pub fn write_length(&mut self, value: u8) {
        self.length = ((value as u16) << 4) + 1;
    }
}
