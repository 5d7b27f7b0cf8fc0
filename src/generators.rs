//! Sound generators for the 2A03 APU
//!
//! One free function per channel kind maps the channel's state plus a
//! running phase to a single bipolar sample and advances that phase.
//! Generators run at the audio sample rate, not the CPU cycle rate.
//!
//! - Pulse: square wave with 25% or 50% duty
//! - Triangle: linear ramp up then down
//! - Noise: 15-bit linear-feedback shift register
//! - DMC: silence (stub)

use crate::channels::{DmcChannel, DutyCycle, NoiseChannel, PulseChannel, TriangleChannel};
use crate::constants::{
    AUDIBLE_LIMIT, NOISE_AMPLITUDE, PULSE_AMPLITUDE, SAMPLE_RATE, TRIANGLE_AMPLITUDE,
};
use crate::registers::PulseId;

/// Running phase for every generator, owned by the unit instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseState {
    /// Position within the current waveform period, per pulse channel
    pulse: [u32; 2],
    /// Position within the current triangle period
    triangle: u32,
    /// Samples since the noise shift register last advanced
    noise_divider: u32,
}

impl PhaseState {
    /// Create a zeroed phase state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase of a pulse channel
    #[inline]
    pub fn pulse(&self, id: PulseId) -> u32 {
        self.pulse[id.index()]
    }

    /// Current triangle phase
    #[inline]
    pub fn triangle(&self) -> u32 {
        self.triangle
    }

    /// Reset all phases to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Whether a tone frequency is inside the synthesizable range
#[inline]
pub fn is_audible(frequency: u16) -> bool {
    frequency != 0 && frequency <= AUDIBLE_LIMIT
}

/// Samples per waveform cycle for a tone frequency
///
/// Returns `None` for frequencies that are zero, above the audible limit,
/// or that do not yield a usable period.
#[inline]
fn tone_period(frequency: u16) -> Option<u32> {
    if !is_audible(frequency) {
        return None;
    }
    let period = SAMPLE_RATE / frequency as u32;
    if period == 0 || period > SAMPLE_RATE {
        None
    } else {
        Some(period)
    }
}

/// Generate one pulse sample and advance the pulse phase
pub fn pulse_sample(channel: &PulseChannel, phases: &mut PhaseState, id: PulseId) -> f32 {
    if !channel.enabled {
        return 0.0;
    }
    let Some(period) = tone_period(channel.frequency) else {
        return 0.0;
    };

    let phase = &mut phases.pulse[id.index()];
    *phase = (*phase + 1) % period;

    let high_ticks = match channel.duty_cycle {
        DutyCycle::Half => period / 2,
        DutyCycle::Quarter => period / 4,
    };
    let level = if *phase < high_ticks { 1.0 } else { -1.0 };

    level * channel.volume * PULSE_AMPLITUDE
}

/// Generate one triangle sample and advance the triangle phase
pub fn triangle_sample(channel: &TriangleChannel, phases: &mut PhaseState) -> f32 {
    if !channel.enabled {
        return 0.0;
    }
    let Some(period) = tone_period(channel.frequency) else {
        return 0.0;
    };
    let half = period / 2;
    if half == 0 {
        return 0.0;
    }

    phases.triangle = (phases.triangle + 1) % period;

    let ramp = 2.0 * phases.triangle as f32 / half as f32;
    let level = if phases.triangle < half {
        ramp - 1.0
    } else {
        3.0 - ramp
    };

    level * channel.volume * TRIANGLE_AMPLITUDE
}

/// Generate one noise sample
///
/// The channel's shift register advances once every `period` calls; the
/// output follows its low bit.
pub fn noise_sample(channel: &mut NoiseChannel, phases: &mut PhaseState) -> f32 {
    if !channel.enabled || channel.period == 0 {
        return 0.0;
    }

    phases.noise_divider += 1;
    if phases.noise_divider >= channel.period as u32 {
        phases.noise_divider = 0;
        channel.shift();
    }

    let level = if channel.shift_register & 1 != 0 {
        1.0
    } else {
        -1.0
    };
    level * channel.volume * NOISE_AMPLITUDE
}

/// Generate one DMC sample
///
/// Delta modulation playback is not synthesized; the channel is silent
/// whether or not it is enabled.
pub fn dmc_sample(channel: &DmcChannel) -> f32 {
    if !channel.enabled {
        return 0.0;
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pulse(frequency: u16, duty_cycle: DutyCycle) -> PulseChannel {
        PulseChannel {
            enabled: true,
            frequency,
            duty_cycle,
            volume: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_tone_period_guards() {
        assert_eq!(tone_period(0), None);
        assert_eq!(tone_period(AUDIBLE_LIMIT + 1), None);
        assert_eq!(tone_period(440), Some(100));
        assert_eq!(tone_period(AUDIBLE_LIMIT), Some(2));
    }

    #[test]
    fn test_pulse_half_duty_shape() {
        // 441 Hz -> period of 100 samples
        let channel = pulse(441, DutyCycle::Half);
        let mut phases = PhaseState::new();
        let samples: Vec<f32> = (0..100)
            .map(|_| pulse_sample(&channel, &mut phases, PulseId::One))
            .collect();

        let high = samples.iter().filter(|&&s| s > 0.0).count();
        assert_eq!(high, 50);
        for s in samples {
            assert_abs_diff_eq!(s.abs(), PULSE_AMPLITUDE, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_pulse_quarter_duty_shape() {
        let channel = pulse(441, DutyCycle::Quarter);
        let mut phases = PhaseState::new();
        let high = (0..100)
            .map(|_| pulse_sample(&channel, &mut phases, PulseId::One))
            .filter(|&s| s > 0.0)
            .count();
        assert_eq!(high, 25);
    }

    #[test]
    fn test_pulse_phases_are_independent() {
        let channel = pulse(441, DutyCycle::Half);
        let mut phases = PhaseState::new();
        for _ in 0..10 {
            pulse_sample(&channel, &mut phases, PulseId::One);
        }
        pulse_sample(&channel, &mut phases, PulseId::Two);
        assert_eq!(phases.pulse(PulseId::One), 10);
        assert_eq!(phases.pulse(PulseId::Two), 1);
    }

    #[test]
    fn test_pulse_silence_guards() {
        let mut phases = PhaseState::new();

        let disabled = PulseChannel {
            enabled: false,
            ..pulse(441, DutyCycle::Half)
        };
        assert_eq!(pulse_sample(&disabled, &mut phases, PulseId::One), 0.0);
        assert_eq!(pulse_sample(&pulse(0, DutyCycle::Half), &mut phases, PulseId::One), 0.0);
        assert_eq!(
            pulse_sample(&pulse(AUDIBLE_LIMIT + 1, DutyCycle::Half), &mut phases, PulseId::One),
            0.0
        );
        assert_eq!(phases.pulse(PulseId::One), 0, "silent samples must not advance phase");
    }

    #[test]
    fn test_pulse_volume_scaling() {
        let channel = PulseChannel {
            volume: 0.5,
            ..pulse(441, DutyCycle::Half)
        };
        let mut phases = PhaseState::new();
        let s = pulse_sample(&channel, &mut phases, PulseId::One);
        assert_abs_diff_eq!(s, 0.5 * PULSE_AMPLITUDE, epsilon = 1e-6);
    }

    #[test]
    fn test_triangle_ramps() {
        // 441 Hz -> period 100, half 50
        let channel = TriangleChannel {
            enabled: true,
            frequency: 441,
            volume: 1.0,
            ..Default::default()
        };
        let mut phases = PhaseState::new();
        let samples: Vec<f32> = (0..100)
            .map(|_| triangle_sample(&channel, &mut phases))
            .collect();

        // Rising through the first half
        assert!(samples[..49].windows(2).all(|w| w[1] > w[0]));
        // Falling through the second half
        assert!(samples[50..99].windows(2).all(|w| w[1] < w[0]));
        for s in &samples {
            assert!(s.abs() <= TRIANGLE_AMPLITUDE + 1e-6);
        }
        // Phase 0 sits at the bottom of the ramp
        assert_abs_diff_eq!(samples[99], -TRIANGLE_AMPLITUDE, epsilon = 1e-6);
        // Phase 50 sits at the peak
        assert_abs_diff_eq!(samples[49], TRIANGLE_AMPLITUDE, epsilon = 1e-6);
    }

    #[test]
    fn test_triangle_silence_guards() {
        let mut phases = PhaseState::new();
        let channel = TriangleChannel {
            enabled: false,
            frequency: 441,
            volume: 1.0,
            ..Default::default()
        };
        assert_eq!(triangle_sample(&channel, &mut phases), 0.0);

        let channel = TriangleChannel {
            enabled: true,
            frequency: 0,
            volume: 1.0,
            ..Default::default()
        };
        assert_eq!(triangle_sample(&channel, &mut phases), 0.0);
        assert_eq!(phases.triangle(), 0);
    }

    #[test]
    fn test_noise_advances_every_period() {
        let mut channel = NoiseChannel {
            enabled: true,
            period: 4,
            volume: 1.0,
            ..Default::default()
        };
        let mut phases = PhaseState::new();
        let initial = channel.shift_register;

        for _ in 0..3 {
            noise_sample(&mut channel, &mut phases);
        }
        assert_eq!(channel.shift_register, initial);

        noise_sample(&mut channel, &mut phases);
        assert_ne!(channel.shift_register, initial);
    }

    #[test]
    fn test_noise_output_varies() {
        let mut channel = NoiseChannel {
            enabled: true,
            period: 1,
            volume: 1.0,
            ..Default::default()
        };
        let mut phases = PhaseState::new();
        let outputs: Vec<f32> = (0..200)
            .map(|_| noise_sample(&mut channel, &mut phases))
            .collect();

        assert!(outputs.windows(2).any(|w| w[0] != w[1]));
        for s in outputs {
            assert_abs_diff_eq!(s.abs(), NOISE_AMPLITUDE, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_noise_silence_guards() {
        let mut phases = PhaseState::new();
        let mut channel = NoiseChannel {
            enabled: true,
            period: 0,
            volume: 1.0,
            ..Default::default()
        };
        assert_eq!(noise_sample(&mut channel, &mut phases), 0.0);
        assert_eq!(channel.shift_register, 1);
    }

    #[test]
    fn test_dmc_is_silent() {
        let enabled = DmcChannel {
            enabled: true,
            volume: 1.0,
            ..Default::default()
        };
        assert_eq!(dmc_sample(&enabled), 0.0);
        assert_eq!(dmc_sample(&DmcChannel::default()), 0.0);
    }
}
