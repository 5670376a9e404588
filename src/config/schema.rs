//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Main configuration for the synth engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Master settings (volume, timbre)
    #[serde(default)]
    pub master: MasterConfig,

    /// ADSR envelope defaults applied to every voice
    #[serde(default)]
    pub envelope: EnvelopeConfig,

    /// Guitar effect chain defaults
    #[serde(default)]
    pub guitar: GuitarConfig,

    /// Wah pedal defaults
    #[serde(default)]
    pub wah: WahConfig,
}

impl SynthConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if let Some(size) = self.audio.buffer_size {
            if !(64..=8192).contains(&size) {
                bail!("Buffer size must be between 64 and 8192");
            }
        }

        if !(0.0..=1.0).contains(&self.master.volume) {
            bail!("Master volume must be between 0.0 and 1.0");
        }

        for (name, value) in [
            ("attack", self.envelope.attack),
            ("decay", self.envelope.decay),
            ("release", self.envelope.release),
        ] {
            if !(0.0..=60.0).contains(&value) {
                bail!("Envelope {} must be between 0.0 and 60.0 seconds", name);
            }
        }
        if !(0.0..=1.0).contains(&self.envelope.sustain) {
            bail!("Envelope sustain must be between 0.0 and 1.0");
        }

        for (name, value) in [
            ("sustain", self.guitar.sustain),
            ("gain", self.guitar.gain),
            ("distortion", self.guitar.distortion),
            ("reverb", self.guitar.reverb),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("Guitar {} must be between 0.0 and 1.0", name);
            }
        }

        if !(0.0..=1.0).contains(&self.wah.position) {
            bail!("Wah position must be between 0.0 and 1.0");
        }

        Ok(())
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Requested sample rate in Hz; the device may negotiate another
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Requested buffer size in frames (None = device default)
    pub buffer_size: Option<u32>,

    /// Output device name (None = default device)
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: None,
            device: None,
        }
    }
}

fn default_sample_rate() -> u32 {
    48000
}

/// Master settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Master volume 0.0-1.0 (default: 0.8)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Initial timbre; unrecognized names fall back to sawtooth
    #[serde(default = "default_wave")]
    pub wave: String,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            wave: default_wave(),
        }
    }
}

fn default_volume() -> f32 {
    0.8
}

fn default_wave() -> String {
    "sawtooth".to_string()
}

/// ADSR envelope defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Attack time in seconds (default: 0.01)
    #[serde(default = "default_attack")]
    pub attack: f32,

    /// Decay time in seconds (default: 0.1)
    #[serde(default = "default_decay")]
    pub decay: f32,

    /// Sustain level 0.0-1.0 (default: 0.7)
    #[serde(default = "default_sustain")]
    pub sustain: f32,

    /// Release time in seconds (default: 0.3)
    #[serde(default = "default_release")]
    pub release: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            attack: default_attack(),
            decay: default_decay(),
            sustain: default_sustain(),
            release: default_release(),
        }
    }
}

fn default_attack() -> f32 {
    0.01
}

fn default_decay() -> f32 {
    0.1
}

fn default_sustain() -> f32 {
    0.7
}

fn default_release() -> f32 {
    0.3
}

/// Guitar effect chain defaults, all 0.0-1.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuitarConfig {
    #[serde(default = "default_half")]
    pub sustain: f32,

    #[serde(default = "default_half")]
    pub gain: f32,

    #[serde(default = "default_half")]
    pub distortion: f32,

    /// Reverb wet amount (default: 0.2)
    #[serde(default = "default_reverb")]
    pub reverb: f32,
}

impl Default for GuitarConfig {
    fn default() -> Self {
        Self {
            sustain: default_half(),
            gain: default_half(),
            distortion: default_half(),
            reverb: default_reverb(),
        }
    }
}

fn default_half() -> f32 {
    0.5
}

fn default_reverb() -> f32 {
    0.2
}

/// Wah pedal defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WahConfig {
    /// Whether the wah is engaged at startup
    #[serde(default)]
    pub enabled: bool,

    /// Auto mode sweeps the pedal with an internal LFO; manual mode
    /// holds the configured position
    #[serde(default = "default_true")]
    pub auto: bool,

    /// Pedal position 0.0-1.0, used in manual mode (default: 0.5)
    #[serde(default = "default_half")]
    pub position: f32,
}

impl Default for WahConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            auto: true,
            position: default_half(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SynthConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.master.volume, 0.8);
        assert_eq!(config.master.wave, "sawtooth");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "audio:\n  sample_rate: 44100\n";
        let config: SynthConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.envelope.attack, 0.01);
        assert_eq!(config.guitar.reverb, 0.2);
        assert!(!config.wah.enabled);
    }

    #[test]
    fn test_invalid_sample_rate_rejected() {
        let mut config = SynthConfig::default();
        config.audio.sample_rate = 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_volume_rejected() {
        let mut config = SynthConfig::default();
        config.master.volume = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_guitar_param_rejected() {
        let mut config = SynthConfig::default();
        config.guitar.distortion = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_buffer_size_rejected() {
        let mut config = SynthConfig::default();
        config.audio.buffer_size = Some(16);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_envelope_section_parses() {
        let yaml = r#"
envelope:
  attack: 0.005
  decay: 0.2
  sustain: 0.5
  release: 1.0
"#;
        let config: SynthConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.envelope.attack, 0.005);
        assert_eq!(config.envelope.sustain, 0.5);
        assert!(config.validate().is_ok());
    }
}
