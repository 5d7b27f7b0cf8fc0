//! 2A03 APU Constants
//!
//! Shared timing constants and output scaling factors used across the
//! channel generators, the frame sequencer and the mixer.

/// Host audio sample rate (44.1 kHz)
pub const SAMPLE_RATE: u32 = 44_100;

/// Video frame rate the unit is synchronized to
pub const FRAME_RATE: u32 = 60;

/// Samples produced by one call to `generate_frame_audio()` (44100 / 60)
pub const SAMPLES_PER_FRAME: usize = (SAMPLE_RATE / FRAME_RATE) as usize;

/// Output buffer capacity: one second of audio
pub const BUFFER_CAPACITY: usize = SAMPLE_RATE as usize;

/// CPU cycles between frame sequencer steps.
///
/// Approximates a quarter-frame tick at the console's cycle rate and a
/// 60 Hz frame cadence.
pub const FRAME_SEQUENCER_PERIOD: u32 = 14_915;

/// Largest value the 11-bit timer (frequency) field can hold
pub const MAX_FREQUENCY: u16 = 0x7FF;

/// Frequencies above this bound are treated as inaudible (silence)
pub const AUDIBLE_LIMIT: u16 = 20_000;

/// Substituted when a timer high-byte write leaves the frequency at zero (A4)
pub const FALLBACK_FREQUENCY: u16 = 440;

/// Master volume a freshly constructed unit starts with
pub const DEFAULT_MASTER_VOLUME: f32 = 0.5;

/// Generator amplitude scaling per channel kind
pub const PULSE_AMPLITUDE: f32 = 0.4;
/// Triangle generator amplitude scaling
pub const TRIANGLE_AMPLITUDE: f32 = 0.5;
/// Noise generator amplitude scaling
pub const NOISE_AMPLITUDE: f32 = 0.3;

/// Mixer gain applied to each pulse channel
pub const PULSE_MIX_GAIN: f32 = 0.2;
/// Mixer gain applied to the triangle channel
pub const TRIANGLE_MIX_GAIN: f32 = 0.2;
/// Mixer gain applied to the noise channel
pub const NOISE_MIX_GAIN: f32 = 0.1;
/// Mixer gain applied to the DMC channel
pub const DMC_MIX_GAIN: f32 = 0.2;

/// Base CPU address for DMC sample fetches ($C000)
pub const DMC_SAMPLE_BASE: u16 = 0xC000;

/// Normalize a 4-bit volume field (0-15) to 0.0-1.0
///
/// Bits above the low nibble are masked off.
#[inline]
pub fn volume_from_nibble(value: u8) -> f32 {
    (value & 0x0F) as f32 / 15.0
}

/// Normalize the 7-bit DMC direct load field (0-127) to 0.0-1.0
#[inline]
pub fn dmc_level(value: u8) -> f32 {
    (value & 0x7F) as f32 / 127.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_per_frame_matches_rate() {
        assert_eq!(SAMPLES_PER_FRAME, 735);
        assert_eq!(SAMPLES_PER_FRAME * FRAME_RATE as usize, BUFFER_CAPACITY);
    }

    #[test]
    fn test_volume_from_nibble_range() {
        assert_eq!(volume_from_nibble(0x00), 0.0);
        assert_eq!(volume_from_nibble(0x0F), 1.0);
        for value in 0u8..=255 {
            let v = volume_from_nibble(value);
            assert!((0.0..=1.0).contains(&v), "volume {v} for {value:#04x} out of range");
        }
    }

    #[test]
    fn test_volume_from_nibble_masks_high_bits() {
        assert_eq!(volume_from_nibble(0xFF), volume_from_nibble(0x0F));
        assert_eq!(volume_from_nibble(0x87), volume_from_nibble(0x07));
        assert_eq!(volume_from_nibble(0xF0), 0.0);
    }

    #[test]
    fn test_dmc_level_masks_bit_seven() {
        assert_eq!(dmc_level(0x7F), 1.0);
        assert_eq!(dmc_level(0xFF), 1.0);
        assert_eq!(dmc_level(0x80), 0.0);
    }

    #[test]
    fn test_fallback_fits_timer_field() {
        assert!(FALLBACK_FREQUENCY <= MAX_FREQUENCY);
    }
}
