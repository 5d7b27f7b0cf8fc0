//! 2A03 APU emulation
//!
//! The top-level sound unit. Owns the five channel records, the frame
//! sequencer, every generator phase, the mixer and the output buffer, so
//! two units (a live machine and a snapshot copy, say) never share state.
//!
//! The host drives it from two cadences:
//! - [`Apu::step`] once per emulated CPU cycle (sequencer and channel clocking)
//! - [`Apu::generate_frame_audio`] once per video frame (735 samples)

use log::{debug, info, trace};

use crate::backend::ApuBackend;
use crate::buffer::OutputBuffer;
use crate::channels::{DmcChannel, NoiseChannel, PulseChannel, TriangleChannel};
use crate::config::ApuConfig;
use crate::constants::SAMPLES_PER_FRAME;
use crate::generators::PhaseState;
use crate::mixer::{Mixer, Voices, NUM_CHANNELS};
use crate::registers::{Channel, ChannelMask, PulseId, Register};
use crate::sequencer::FrameSequencer;

/// NES Audio Processing Unit
///
/// # Example
///
/// ```
/// use rp2a03::Apu;
///
/// let mut apu = Apu::new();
///
/// // Pulse 1: 50% duty, full volume, timer 0x1FD
/// apu.write(0x4000, 0x8F);
/// apu.write(0x4002, 0xFD);
/// apu.write(0x4003, 0x01);
///
/// for _ in 0..29_780 {
///     apu.step();
/// }
/// apu.generate_frame_audio();
///
/// let samples = apu.drain_buffer();
/// assert_eq!(samples.len(), 735);
/// ```
#[derive(Debug, Clone)]
pub struct Apu {
    // Channels
    pulse: [PulseChannel; 2],
    triangle: TriangleChannel,
    noise: NoiseChannel,
    dmc: DmcChannel,

    // Timing
    sequencer: FrameSequencer,
    phases: PhaseState,

    // Output processing
    mixer: Mixer,
    buffer: OutputBuffer,

    // Operator gate
    audio_enabled: bool,
}

impl Default for Apu {
    fn default() -> Self {
        Self::new()
    }
}

impl Apu {
    /// Create a unit in power-on state with audio enabled and master
    /// volume at 0.5
    pub fn new() -> Self {
        Self {
            pulse: [PulseChannel::default(); 2],
            triangle: TriangleChannel::default(),
            noise: NoiseChannel::default(),
            dmc: DmcChannel::default(),
            sequencer: FrameSequencer::new(),
            phases: PhaseState::new(),
            mixer: Mixer::new(),
            buffer: OutputBuffer::new(),
            audio_enabled: true,
        }
    }

    /// Create a unit with operator settings taken from a configuration
    pub fn with_config(config: &ApuConfig) -> Self {
        let mut apu = Self::new();
        apu.apply_config(config);
        apu
    }

    /// Apply operator settings (master volume, audio gate, mutes)
    pub fn apply_config(&mut self, config: &ApuConfig) {
        debug!(
            "Applying APU config: volume={} enabled={} muted={:?}",
            config.master_volume, config.audio_enabled, config.muted_channels
        );
        self.mixer.set_master_volume(config.master_volume);
        self.mixer.set_muted_channels(config.muted_channels);
        self.audio_enabled = config.audio_enabled;
    }

    /// Snapshot of the current operator settings
    pub fn config(&self) -> ApuConfig {
        ApuConfig {
            master_volume: self.mixer.master_volume(),
            audio_enabled: self.audio_enabled,
            muted_channels: self.mixer.muted_channels(),
        }
    }

    /// Reset to power-on state
    ///
    /// Clears every channel, the sequencer, generator phases, filter history
    /// and the output buffer. Master volume, the audio gate and channel mutes
    /// are operator settings and survive.
    pub fn reset(&mut self) {
        debug!("APU reset");
        self.pulse = [PulseChannel::default(); 2];
        self.triangle = TriangleChannel::default();
        self.noise = NoiseChannel::default();
        self.dmc = DmcChannel::default();
        self.sequencer.reset();
        self.phases.reset();
        self.mixer.reset();
        self.buffer.clear();
    }

    /// Advance the unit by one CPU cycle
    ///
    /// Counts the cycle toward the next sequencer step, then clocks, in
    /// order: both sweep units, the triangle linear counter, the four length
    /// counters and the envelopes. No-op while audio is disabled.
    pub fn step(&mut self) {
        if !self.audio_enabled {
            return;
        }

        self.sequencer.clock();

        for pulse in self.pulse.iter_mut() {
            pulse.clock_sweep();
        }
        self.triangle.clock_linear_counter();
        self.clock_length_counters();
        self.clock_envelopes();
    }

    /// Clock pulse 1, pulse 2, triangle and noise length counters
    fn clock_length_counters(&mut self) {
        for pulse in self.pulse.iter_mut() {
            pulse.clock_length();
        }
        self.triangle.clock_length();
        self.noise.clock_length();
    }

    /// Volume comes straight from the registers; there is no envelope unit
    /// to clock.
    #[inline]
    fn clock_envelopes(&mut self) {}

    /// Render one video frame of audio into the output buffer
    ///
    /// Appends exactly [`SAMPLES_PER_FRAME`] samples, each in [-1.0, 1.0].
    /// No-op while audio is disabled.
    pub fn generate_frame_audio(&mut self) {
        if !self.audio_enabled {
            return;
        }

        let mut frame = [0.0f32; SAMPLES_PER_FRAME];
        for sample in frame.iter_mut() {
            let voices = Voices {
                pulse: &self.pulse,
                triangle: &self.triangle,
                noise: &mut self.noise,
                dmc: &self.dmc,
            };
            *sample = self.mixer.render_sample(voices, &mut self.phases);
        }
        self.buffer.extend_from_slice(&frame);
    }

    /// Bus write into the APU register range
    ///
    /// Unmapped addresses are logged and ignored.
    pub fn write(&mut self, address: u16, value: u8) {
        match Register::from_addr(address) {
            Some(register) => {
                trace!("APU write: {register} = {value:02X}");
                self.write_register(register, value);
            }
            None => info!("APU write to unknown register: ${address:04X} = {value:02X}"),
        }
    }

    /// Apply a decoded register write
    pub fn write_register(&mut self, register: Register, value: u8) {
        match register {
            Register::Pulse1Control => self.pulse[0].write_control(value),
            Register::Pulse1Sweep => self.pulse[0].write_sweep(value),
            Register::Pulse1TimerLo => self.pulse[0].write_timer_lo(value),
            Register::Pulse1TimerHi => self.pulse[0].write_timer_hi(value),

            Register::Pulse2Control => self.pulse[1].write_control(value),
            Register::Pulse2Sweep => self.pulse[1].write_sweep(value),
            Register::Pulse2TimerLo => self.pulse[1].write_timer_lo(value),
            Register::Pulse2TimerHi => self.pulse[1].write_timer_hi(value),

            Register::TriangleControl => self.triangle.write_control(value),
            Register::TriangleTimerLo => self.triangle.write_timer_lo(value),
            Register::TriangleTimerHi => self.triangle.write_timer_hi(value),

            Register::NoiseControl => self.noise.write_control(value),
            Register::NoisePeriod => self.noise.write_period(value),
            Register::NoiseLength => self.noise.write_length(value),

            Register::DmcControl => self.dmc.write_control(value),
            Register::DmcDirectLoad => self.dmc.write_direct_load(value),
            Register::DmcAddress => self.dmc.write_address(value),
            Register::DmcLength => self.dmc.write_length(value),

            Register::Status => self.set_enabled_channels(ChannelMask::from_register(value)),
            Register::FrameCounter => self.sequencer.write_control(value),
        }
    }

    /// Bus read from the APU register range
    ///
    /// Only $4015 returns data (the channel enable mask); every other
    /// address reads as 0.
    pub fn read(&self, address: u16) -> u8 {
        match Register::from_addr(address) {
            Some(Register::Status) => self.status().bits(),
            Some(_) => 0,
            None => {
                debug!("APU read from unknown register: ${address:04X}");
                0
            }
        }
    }

    /// Channels whose enable flag is set
    pub fn status(&self) -> ChannelMask {
        let mut mask = ChannelMask::empty();
        mask.set(ChannelMask::PULSE1, self.pulse[0].enabled);
        mask.set(ChannelMask::PULSE2, self.pulse[1].enabled);
        mask.set(ChannelMask::TRIANGLE, self.triangle.enabled);
        mask.set(ChannelMask::NOISE, self.noise.enabled);
        mask.set(ChannelMask::DMC, self.dmc.enabled);
        mask
    }

    /// Set every channel's enable flag from a mask
    fn set_enabled_channels(&mut self, mask: ChannelMask) {
        self.pulse[0].enabled = mask.contains(ChannelMask::PULSE1);
        self.pulse[1].enabled = mask.contains(ChannelMask::PULSE2);
        self.triangle.enabled = mask.contains(ChannelMask::TRIANGLE);
        self.noise.enabled = mask.contains(ChannelMask::NOISE);
        self.dmc.enabled = mask.contains(ChannelMask::DMC);
    }

    /// Buffered samples, oldest first
    #[inline]
    pub fn get_buffer(&self) -> &[f32] {
        self.buffer.peek()
    }

    /// Take all buffered samples, leaving the buffer empty
    pub fn drain_buffer(&mut self) -> Vec<f32> {
        self.buffer.drain()
    }

    /// Discard all buffered samples
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Set master volume, clamped to [0.0, 1.0]
    pub fn set_master_volume(&mut self, volume: f32) {
        self.mixer.set_master_volume(volume);
    }

    /// Current master volume
    #[inline]
    pub fn master_volume(&self) -> f32 {
        self.mixer.master_volume()
    }

    /// Open or close the audio gate
    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }

    /// Whether the audio gate is open
    #[inline]
    pub fn is_audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    /// Mute or unmute a channel in the mix
    pub fn set_channel_mute(&mut self, channel: Channel, mute: bool) {
        self.mixer.set_mute(channel, mute);
    }

    /// Check if a channel is muted
    pub fn is_channel_muted(&self, channel: Channel) -> bool {
        self.mixer.is_muted(channel)
    }

    /// Last per-channel contribution (pulse 1, pulse 2, triangle, noise, DMC)
    pub fn channel_outputs(&self) -> [f32; NUM_CHANNELS] {
        self.mixer.channel_outputs()
    }

    /// Pulse channel state
    #[inline]
    pub fn pulse(&self, id: PulseId) -> &PulseChannel {
        &self.pulse[id.index()]
    }

    /// Triangle channel state
    #[inline]
    pub fn triangle(&self) -> &TriangleChannel {
        &self.triangle
    }

    /// Noise channel state
    #[inline]
    pub fn noise(&self) -> &NoiseChannel {
        &self.noise
    }

    /// DMC channel state
    #[inline]
    pub fn dmc(&self) -> &DmcChannel {
        &self.dmc
    }

    /// Frame sequencer state
    #[inline]
    pub fn sequencer(&self) -> &FrameSequencer {
        &self.sequencer
    }

    /// Smoothing filter history as `(prev, prev_prev)`
    #[inline]
    pub fn filter_history(&self) -> (f32, f32) {
        self.mixer.filter_history()
    }
}

// =============================================================================
// ApuBackend trait implementation
// =============================================================================

impl ApuBackend for Apu {
    fn reset(&mut self) {
        Apu::reset(self)
    }

    fn step(&mut self) {
        Apu::step(self)
    }

    fn generate_frame_audio(&mut self) {
        Apu::generate_frame_audio(self)
    }

    fn write_register(&mut self, address: u16, value: u8) {
        Apu::write(self, address, value)
    }

    fn read_register(&self, address: u16) -> u8 {
        Apu::read(self, address)
    }

    fn buffer(&self) -> &[f32] {
        self.get_buffer()
    }

    fn drain_buffer(&mut self) -> Vec<f32> {
        Apu::drain_buffer(self)
    }

    fn clear_buffer(&mut self) {
        Apu::clear_buffer(self)
    }

    fn set_master_volume(&mut self, volume: f32) {
        Apu::set_master_volume(self, volume)
    }

    fn set_audio_enabled(&mut self, enabled: bool) {
        Apu::set_audio_enabled(self, enabled)
    }

    fn is_audio_enabled(&self) -> bool {
        Apu::is_audio_enabled(self)
    }
}

// =============================================================================
// Tests
// =============================================================================
