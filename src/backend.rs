//! Backend trait abstraction for sound unit implementations
//!
//! This module defines the host-facing interface of the sound unit, so a
//! host emulator can drive any implementation through the same calls.

/// Common interface for APU backends
///
/// # Example
///
/// ```
/// use rp2a03::{Apu, ApuBackend};
///
/// fn play_note<B: ApuBackend>(unit: &mut B) -> Vec<f32> {
///     unit.write_register(0x4000, 0x8F); // Pulse 1: 50% duty, full volume
///     unit.write_register(0x4002, 0xB8); // Timer low
///     unit.write_register(0x4003, 0x01); // Timer high + trigger
///
///     unit.step_cycles(29_780);
///     unit.render_frames(1)
/// }
///
/// let samples = play_note(&mut Apu::new());
/// assert_eq!(samples.len(), 735);
/// ```
pub trait ApuBackend {
    /// Reset to power-on state
    ///
    /// Operator settings (master volume, audio gate) are kept.
    fn reset(&mut self);

    /// Advance by one CPU cycle
    fn step(&mut self);

    /// Render one video frame of audio into the output buffer
    fn generate_frame_audio(&mut self);

    /// Write to an APU register
    ///
    /// # Arguments
    ///
    /// * `address` - Bus address ($4000-$4017)
    /// * `value` - Register value
    ///
    /// Unmapped addresses are ignored.
    fn write_register(&mut self, address: u16, value: u8);

    /// Read from an APU register
    ///
    /// # Returns
    ///
    /// The channel status mask for $4015, 0 for every other address
    fn read_register(&self, address: u16) -> u8;

    /// Buffered samples, oldest first
    fn buffer(&self) -> &[f32];

    /// Take all buffered samples, leaving the buffer empty
    fn drain_buffer(&mut self) -> Vec<f32>;

    /// Discard all buffered samples
    fn clear_buffer(&mut self);

    /// Set master volume (clamped to 0.0-1.0)
    fn set_master_volume(&mut self, volume: f32);

    /// Open or close the audio gate
    fn set_audio_enabled(&mut self, enabled: bool);

    /// Whether the audio gate is open
    fn is_audio_enabled(&self) -> bool;

    /// Advance by `cycles` CPU cycles
    fn step_cycles(&mut self, cycles: u32) {
        for _ in 0..cycles {
            self.step();
        }
    }

    /// Render `frames` video frames and take everything buffered
    ///
    /// Anything already in the buffer is returned ahead of the new frames,
    /// subject to the buffer's retention limit.
    fn render_frames(&mut self, frames: usize) -> Vec<f32> {
        for _ in 0..frames {
            self.generate_frame_audio();
        }
        self.drain_buffer()
    }
}
