//! Operator configuration
//!
//! Settings that belong to whoever runs the emulator rather than to the
//! emulated machine: they are not touched by `reset()` and can be loaded
//! from JSON.
//!
//! ```
//! use rp2a03::{Apu, ApuConfig};
//!
//! let config = ApuConfig::from_json_str(r#"{ "master_volume": 0.8 }"#).unwrap();
//! let apu = Apu::with_config(&config);
//! assert_eq!(apu.master_volume(), 0.8);
//! assert!(apu.is_audio_enabled());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MASTER_VOLUME;
use crate::registers::ChannelMask;
use crate::Result;

/// Operator settings for an [`crate::Apu`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApuConfig {
    /// Master volume (clamped to 0.0-1.0 when applied)
    pub master_volume: f32,
    /// Audio gate; when false, stepping and rendering are no-ops
    pub audio_enabled: bool,
    /// Channels excluded from the mix
    pub muted_channels: ChannelMask,
}

impl Default for ApuConfig {
    fn default() -> Self {
        Self {
            master_volume: DEFAULT_MASTER_VOLUME,
            audio_enabled: true,
            muted_channels: ChannelMask::empty(),
        }
    }
}

impl ApuConfig {
    /// Parse a configuration from JSON; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApuError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ApuConfig::default();
        assert_eq!(config.master_volume, 0.5);
        assert!(config.audio_enabled);
        assert!(config.muted_channels.is_empty());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ApuConfig::from_json_str(r#"{ "audio_enabled": false }"#).unwrap();
        assert!(!config.audio_enabled);
        assert_eq!(config.master_volume, 0.5);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ApuConfig {
            master_volume: 0.75,
            audio_enabled: false,
            muted_channels: ChannelMask::NOISE | ChannelMask::DMC,
        };
        let json = config.to_json_string().unwrap();
        let parsed = ApuConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = ApuConfig::from_json_str("{ master_volume: }").unwrap_err();
        assert!(matches!(err, ApuError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ApuConfig::from_file("/definitely/not/here/apu.json").unwrap_err();
        assert!(matches!(err, ApuError::Io(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "master_volume": 0.3 }}"#).unwrap();
        let config = ApuConfig::from_file(file.path()).unwrap();
        assert_eq!(config.master_volume, 0.3);
    }
}
