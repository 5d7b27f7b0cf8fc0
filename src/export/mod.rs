//! Audio export
//!
//! Post-processing helpers for rendered audio and, with the `export-wav`
//! feature, WAV file output.

#[cfg(feature = "export-wav")]
pub mod wav;

use crate::constants::SAMPLE_RATE;
use crate::{ApuError, Result};

/// Output settings for exported audio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportConfig {
    /// Sample rate written to the file header
    pub sample_rate: u32,
    /// 1 for mono, 2 for stereo (mono duplicated)
    pub channels: u16,
    /// Scale the peak to full range before writing
    pub normalize: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: 1,
            normalize: false,
        }
    }
}

impl ExportConfig {
    /// Stereo output at the unit's sample rate
    pub fn stereo() -> Self {
        Self {
            channels: 2,
            ..Self::default()
        }
    }

    /// Enable or disable peak normalization
    pub fn normalize(mut self, enabled: bool) -> Self {
        self.normalize = enabled;
        self
    }

    /// Check that the settings describe a writable stream
    pub fn validate(&self) -> Result<()> {
        if !(1..=2).contains(&self.channels) {
            return Err(ApuError::ConfigError(format!(
                "export supports 1 or 2 channels, got {}",
                self.channels
            )));
        }
        if self.sample_rate == 0 {
            return Err(ApuError::ConfigError("export sample rate must be non-zero".into()));
        }
        Ok(())
    }
}

/// Scale samples so the loudest one reaches full range
///
/// Silence is left untouched.
pub fn normalize_samples(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
    if peak > 0.0 {
        let gain = 1.0 / peak;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
}

/// Convert mono samples to interleaved stereo (duplicate each sample)
pub fn mono_to_stereo(mono: &[f32]) -> Vec<f32> {
    let mut stereo = Vec::with_capacity(mono.len() * 2);
    for &sample in mono {
        stereo.push(sample);
        stereo.push(sample);
    }
    stereo
}
