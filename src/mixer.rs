//! Audio mixer and output stage
//!
//! Sums the five channel generators with fixed per-channel gains, applies
//! master volume and the smoothing filter, and clamps the result to the
//! valid sample range.
//!
//! A channel contributes only while its gate is open: enabled, audible
//! frequency (or non-zero period for noise), non-zero volume, and not muted.
//! A closed gate skips the generator entirely, so its phase holds.

use crate::channels::{DmcChannel, NoiseChannel, PulseChannel, TriangleChannel};
use crate::constants::{
    DEFAULT_MASTER_VOLUME, DMC_MIX_GAIN, NOISE_MIX_GAIN, PULSE_MIX_GAIN, TRIANGLE_MIX_GAIN,
};
use crate::filter::SmoothingFilter;
use crate::generators::{
    dmc_sample, is_audible, noise_sample, pulse_sample, triangle_sample, PhaseState,
};
use crate::registers::{Channel, ChannelMask, PulseId};

/// Number of mixer inputs
pub const NUM_CHANNELS: usize = 5;

/// Borrowed view of the channel state the mixer reads from
///
/// Noise is borrowed mutably because its shift register advances as it is
/// sampled.
#[derive(Debug)]
pub struct Voices<'a> {
    /// Pulse 1 and pulse 2
    pub pulse: &'a [PulseChannel; 2],
    /// Triangle channel
    pub triangle: &'a TriangleChannel,
    /// Noise channel
    pub noise: &'a mut NoiseChannel,
    /// DMC channel
    pub dmc: &'a DmcChannel,
}

/// Audio mixer and output stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mixer {
    /// Two-stage smoothing filter
    filter: SmoothingFilter,
    /// Master volume (0.0-1.0)
    master_volume: f32,
    /// Operator mute set
    muted: ChannelMask,
    /// Last gain-scaled contribution of each channel, before master volume
    last_outputs: [f32; NUM_CHANNELS],
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    /// Create a mixer at the default master volume
    pub fn new() -> Self {
        Self {
            filter: SmoothingFilter::new(),
            master_volume: DEFAULT_MASTER_VOLUME,
            muted: ChannelMask::empty(),
            last_outputs: [0.0; NUM_CHANNELS],
        }
    }

    /// Produce one output sample from the current channel state
    ///
    /// The result is filtered, scaled by master volume and clamped to
    /// [-1.0, 1.0].
    pub fn render_sample(&mut self, voices: Voices<'_>, phases: &mut PhaseState) -> f32 {
        let mut outputs = [0.0f32; NUM_CHANNELS];

        for id in [PulseId::One, PulseId::Two] {
            let pulse = &voices.pulse[id.index()];
            if self.is_open(id.channel(), pulse.enabled, is_audible(pulse.frequency), pulse.volume) {
                outputs[id.channel().index()] = pulse_sample(pulse, phases, id) * PULSE_MIX_GAIN;
            }
        }

        let triangle = voices.triangle;
        if self.is_open(
            Channel::Triangle,
            triangle.enabled,
            is_audible(triangle.frequency),
            triangle.volume,
        ) {
            outputs[Channel::Triangle.index()] =
                triangle_sample(triangle, phases) * TRIANGLE_MIX_GAIN;
        }

        let noise = voices.noise;
        if self.is_open(Channel::Noise, noise.enabled, noise.period > 0, noise.volume) {
            outputs[Channel::Noise.index()] = noise_sample(noise, phases) * NOISE_MIX_GAIN;
        }

        let dmc = voices.dmc;
        if self.is_open(Channel::Dmc, dmc.enabled, true, dmc.volume) {
            outputs[Channel::Dmc.index()] = dmc_sample(dmc) * DMC_MIX_GAIN;
        }

        self.last_outputs = outputs;

        let mixed: f32 = outputs.iter().sum::<f32>() * self.master_volume;
        self.filter.process(mixed).clamp(-1.0, 1.0)
    }

    /// Gate check shared by every channel kind
    #[inline]
    fn is_open(&self, channel: Channel, enabled: bool, audible: bool, volume: f32) -> bool {
        enabled && audible && volume > 0.0 && !self.muted.contains(channel.mask())
    }

    /// Set master volume, clamped to [0.0, 1.0]
    ///
    /// NaN is treated as silence.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    /// Current master volume
    #[inline]
    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Set mute state for a channel
    pub fn set_mute(&mut self, channel: Channel, muted: bool) {
        self.muted.set(channel.mask(), muted);
    }

    /// Check if a channel is muted
    #[inline]
    pub fn is_muted(&self, channel: Channel) -> bool {
        self.muted.contains(channel.mask())
    }

    /// Replace the whole mute set
    pub fn set_muted_channels(&mut self, muted: ChannelMask) {
        self.muted = muted;
    }

    /// Current mute set
    #[inline]
    pub fn muted_channels(&self) -> ChannelMask {
        self.muted
    }

    /// Last contribution of each channel in mixer order
    #[inline]
    pub fn channel_outputs(&self) -> [f32; NUM_CHANNELS] {
        self.last_outputs
    }

    /// Filter history as `(prev, prev_prev)`
    #[inline]
    pub fn filter_history(&self) -> (f32, f32) {
        self.filter.history()
    }

    /// Reset signal state
    ///
    /// Master volume and mute set are operator settings and are kept.
    pub fn reset(&mut self) {
        self.filter.reset();
        self.last_outputs = [0.0; NUM_CHANNELS];
    }
}
