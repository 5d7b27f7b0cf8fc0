//! WAV file export functionality

use super::{mono_to_stereo, normalize_samples, ExportConfig};
use crate::backend::ApuBackend;
use crate::constants::SAMPLES_PER_FRAME;
use crate::{ApuError, Result};
use std::path::Path;

/// Render `frames` video frames from a sound unit into a WAV file
///
/// The unit's buffer is cleared first so the file only holds the newly
/// rendered audio. Frames are drained one at a time, so renders longer
/// than the buffer's one-second retention are written in full.
///
/// # Examples
///
/// ```no_run
/// use rp2a03::export::{wav::render_to_wav, ExportConfig};
/// use rp2a03::Apu;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut apu = Apu::new();
/// apu.write(0x4000, 0x8F);
/// apu.write(0x4002, 0xB8);
/// apu.write(0x4003, 0x01);
///
/// render_to_wav(&mut apu, 120, "tone.wav", &ExportConfig::stereo().normalize(true))?;
/// # Ok(())
/// # }
/// ```
pub fn render_to_wav<B, P>(unit: &mut B, frames: usize, path: P, config: &ExportConfig) -> Result<()>
where
    B: ApuBackend,
    P: AsRef<Path>,
{
    config.validate()?;

    log::info!(
        "Rendering {} frames ({:.1}s)",
        frames,
        (frames * SAMPLES_PER_FRAME) as f32 / config.sample_rate as f32
    );

    unit.clear_buffer();
    let mut samples = Vec::with_capacity(frames * SAMPLES_PER_FRAME);
    for _ in 0..frames {
        unit.generate_frame_audio();
        samples.extend(unit.drain_buffer());
    }

    write_wav(path, &samples, config)
}

/// Write mono samples to a 16-bit PCM WAV file
///
/// Applies normalization and stereo duplication per `config`.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], config: &ExportConfig) -> Result<()> {
    config.validate()?;

    let mut samples = samples.to_vec();
    if config.normalize {
        log::info!("Normalizing audio");
        normalize_samples(&mut samples);
    }

    let final_samples = if config.channels == 2 {
        mono_to_stereo(&samples)
    } else {
        samples
    };

    log::info!("Writing WAV file to {}", path.as_ref().display());
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path.as_ref(), spec)
        .map_err(|e| ApuError::AudioFileError(format!("Failed to create WAV file: {}", e)))?;

    for &sample in &final_samples {
        let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| ApuError::AudioFileError(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| ApuError::AudioFileError(format!("Failed to finalize WAV file: {}", e)))?;

    log::info!("Export complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Apu;

    fn tone_unit() -> Apu {
        let mut apu = Apu::new();
        apu.write(0x4000, 0x8F);
        apu.write(0x4002, 0xB8);
        apu.write(0x4003, 0x01);
        apu
    }

    #[test]
    fn test_write_mono_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");

        let samples = vec![0.0, 0.5, -0.5, 1.0];
        write_wav(&path, &samples, &ExportConfig::default()).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.bits_per_sample, 16);

        let written: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(written, vec![0, 16383, -16383, i16::MAX]);
    }

    #[test]
    fn test_render_stereo_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let mut apu = tone_unit();
        render_to_wav(&mut apu, 3, &path, &ExportConfig::stereo()).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.len() as usize, 3 * SAMPLES_PER_FRAME * 2);
        assert!(apu.get_buffer().is_empty());
    }

    #[test]
    fn test_render_longer_than_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.wav");

        let mut apu = tone_unit();
        render_to_wav(&mut apu, 70, &path, &ExportConfig::default()).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len() as usize, 70 * SAMPLES_PER_FRAME);
    }

    #[test]
    fn test_invalid_channel_count_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        let config = ExportConfig {
            channels: 3,
            ..ExportConfig::default()
        };

        let err = write_wav(&path, &[0.0], &config).unwrap_err();
        assert!(matches!(err, ApuError::ConfigError(_)));
        assert!(!path.exists());
    }
}
