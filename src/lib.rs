//! NES APU (2A03) Sound Emulator
//!
//! Emulates the audio unit of the NES: two pulse channels, a triangle
//! channel, a noise channel and a delta modulation channel, clocked by a
//! shared frame sequencer and mixed into a bounded output buffer at
//! 44.1 kHz, synchronized to a 60 Hz video frame.
//!
//! # Features
//! - Bit-level decoding of the $4000-$4017 register map
//! - Cycle-counted frame sequencer (4-step and 5-step modes)
//! - Sweep units, triangle linear counter and length counters
//! - Pulse, triangle and LFSR noise synthesis (DMC is modeled but silent)
//! - Two-stage smoothing filter, master volume and per-channel mute
//! - One-second output buffer that keeps the newest samples on overflow
//! - Plain value state: cloning a unit yields a fully independent snapshot
//!
//! # Crate feature flags
//! - `export-wav` (optional): Render audio to WAV files via `hound`
//!
//! # Backend Trait
//! The `ApuBackend` trait captures the host-facing operations so a host
//! emulator can be generic over the sound unit.
//!
//! # Quick start
//! ```
//! use rp2a03::Apu;
//!
//! let mut apu = Apu::new();
//! apu.write(0x4000, 0x0F); // Pulse 1: 25% duty, volume 15
//! apu.write(0x4003, 0x00); // Timer high + trigger
//! apu.write(0x4002, 0x08); // Timer low
//!
//! apu.generate_frame_audio();
//! let first = apu.get_buffer()[0];
//! assert!(first != 0.0 && (-1.0..=1.0).contains(&first));
//! ```
//!
//! Per emulated CPU cycle the host calls [`Apu::step`]; once per video
//! frame it calls [`Apu::generate_frame_audio`] and collects samples with
//! [`Apu::drain_buffer`].

#![warn(missing_docs)]

pub mod apu; // Top-level sound unit
pub mod backend; // Backend trait abstraction
pub mod buffer; // Bounded output buffer
pub mod channels; // Channel state records
pub mod config; // Operator configuration
pub mod constants;
pub mod export; // Audio export helpers
pub mod filter; // Output smoothing
pub mod generators; // Waveform synthesis
pub mod mixer; // Channel mixing and output stage
pub mod registers; // Register map and channel tags
pub mod sequencer; // Frame sequencer

/// Error types for APU operations
///
/// Core emulation never fails; these cover configuration loading and
/// audio export.
#[derive(thiserror::Error, Debug)]
pub enum ApuError {
    /// IO error from filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration document
    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for ApuError {
    /// Converts a String into `ApuError::Other`.
    ///
    /// Prefer the specific variants (`ConfigError`, `AudioFileError`) where
    /// the failure has a known category.
    fn from(msg: String) -> Self {
        ApuError::Other(msg)
    }
}

impl From<&str> for ApuError {
    /// Converts a string slice into `ApuError::Other`.
    fn from(msg: &str) -> Self {
        ApuError::Other(msg.to_string())
    }
}

/// Result type for APU operations
pub type Result<T> = std::result::Result<T, ApuError>;

// Public API exports
pub use apu::Apu;
pub use backend::ApuBackend;
pub use buffer::OutputBuffer;
pub use channels::{DmcChannel, DutyCycle, NoiseChannel, NoiseMode, PulseChannel, TriangleChannel};
pub use config::ApuConfig;
pub use registers::{Channel, ChannelMask, PulseId, Register};
pub use sequencer::{FrameSequencer, SequencerMode};
