//! Polyphonic engine: voice pool, mixing, playback
//!
//! The engine owns a fixed pool of eight voices behind one pool-wide
//! lock. Control calls (note on/off, parameter changes) and the render
//! pass share that lock, so a note-on is never observed half-applied
//! mid-mix. The render entry point is invoked by an audio backend with
//! a hard deadline; nothing on that path allocates or performs I/O.

mod backend;
mod player;
mod recorder;

pub use backend::{AudioBackend, StreamInfo};
pub use player::{list_output_devices, CpalBackend, Player};
pub use recorder::Recorder;

use crate::config::SynthConfig;
use crate::synth::{Voice, WaveType};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;
use thiserror::Error;

/// Number of simultaneous voices (notes)
pub const MAX_VOICES: usize = 8;

/// Fixed headroom attenuation applied after the master volume. The
/// unattenuated sum of eight distorted voices routinely exceeds full
/// scale.
const SYNTH_ATTENUATION: f32 = 0.25;

/// Engine and playback errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to open audio stream: {0}")]
    StreamOpen(String),

    #[error("audio stream fault after recovery already spent: {0}")]
    Terminal(String),
}

/// The polyphonic synthesis engine.
///
/// All methods take `&self`; the voice pool lives behind an internal
/// mutex and scalar settings are atomics, so one `Arc<Engine>` can be
/// shared between a control thread and the audio backend's render
/// callback.
pub struct Engine {
    voices: Mutex<[Voice; MAX_VOICES]>,
    /// f32 bits; read lock-free on the render path
    master_volume: AtomicU32,
    sample_rate: AtomicU32,
    running: AtomicBool,
}

impl Engine {
    /// Create an engine from a configuration
    pub fn new(config: &SynthConfig) -> Self {
        let sample_rate = config.audio.sample_rate;
        let wave = WaveType::from_name(&config.master.wave);

        let voices = std::array::from_fn(|_| {
            let mut voice = Voice::new(sample_rate as f32);
            voice.set_wave_type(wave);
            voice.configure_envelope(
                config.envelope.attack,
                config.envelope.decay,
                config.envelope.sustain,
                config.envelope.release,
            );
            voice.set_guitar_sustain(config.guitar.sustain);
            voice.set_guitar_gain(config.guitar.gain);
            voice.set_guitar_distortion(config.guitar.distortion);
            voice.set_guitar_reverb(config.guitar.reverb);
            voice.set_wah_enabled(config.wah.enabled);
            if !config.wah.auto {
                voice.set_wah_position(config.wah.position);
            }
            voice
        });

        Self {
            voices: Mutex::new(voices),
            master_volume: AtomicU32::new(config.master.volume.clamp(0.0, 1.0).to_bits()),
            sample_rate: AtomicU32::new(sample_rate),
            running: AtomicBool::new(false),
        }
    }

    /// Get the current sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.load(Ordering::Relaxed)
    }

    /// Reconfigure every voice for a new sample rate. Called when the
    /// backend (re)opens a stream and negotiates a different rate.
    pub fn set_sample_rate(&self, sample_rate: u32) {
        self.sample_rate.store(sample_rate, Ordering::Relaxed);
        if let Ok(mut voices) = self.voices.lock() {
            for voice in voices.iter_mut() {
                voice.set_sample_rate(sample_rate as f32);
            }
        }
    }

    /// Mark the engine running
    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    /// Mark the engine stopped
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the engine is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start a note on a voice. Out-of-range indices are ignored; the
    /// frequency is clamped to the audible range by the voice.
    pub fn note_on(&self, voice_index: usize, frequency: f32) {
        if voice_index >= MAX_VOICES {
            return;
        }
        if let Ok(mut voices) = self.voices.lock() {
            voices[voice_index].note_on(frequency);
        }
    }

    /// Release a note
    pub fn note_off(&self, voice_index: usize) {
        if voice_index >= MAX_VOICES {
            return;
        }
        if let Ok(mut voices) = self.voices.lock() {
            voices[voice_index].note_off();
        }
    }

    /// Release every voice
    pub fn all_notes_off(&self) {
        if let Ok(mut voices) = self.voices.lock() {
            for voice in voices.iter_mut() {
                voice.note_off();
            }
        }
    }

    /// Bend the pitch of a voice by semitones in [-12, 12]
    pub fn set_pitch_bend(&self, voice_index: usize, semitones: f32) {
        if voice_index >= MAX_VOICES {
            return;
        }
        if let Ok(mut voices) = self.voices.lock() {
            voices[voice_index].set_pitch_bend(semitones);
        }
    }

    /// Set the master volume (0.0-1.0)
    pub fn set_master_volume(&self, volume: f32) {
        self.master_volume
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    /// Get the master volume
    pub fn master_volume(&self) -> f32 {
        f32::from_bits(self.master_volume.load(Ordering::Relaxed))
    }

    /// Select the timbre for every voice
    pub fn set_wave_type(&self, wave: WaveType) {
        if let Ok(mut voices) = self.voices.lock() {
            for voice in voices.iter_mut() {
                voice.set_wave_type(wave);
            }
        }
    }

    /// Set the guitar chain parameters on every voice, each 0.0-1.0
    pub fn set_guitar_params(&self, sustain: f32, gain: f32, distortion: f32, reverb: f32) {
        if let Ok(mut voices) = self.voices.lock() {
            for voice in voices.iter_mut() {
                voice.set_guitar_sustain(sustain);
                voice.set_guitar_gain(gain);
                voice.set_guitar_distortion(distortion);
                voice.set_guitar_reverb(reverb);
            }
        }
    }

    /// Enable or disable the wah pedal on every voice
    pub fn set_wah_enabled(&self, enabled: bool) {
        if let Ok(mut voices) = self.voices.lock() {
            for voice in voices.iter_mut() {
                voice.set_wah_enabled(enabled);
            }
        }
    }

    /// Set the wah pedal position on every voice (switches to manual)
    pub fn set_wah_position(&self, position: f32) {
        if let Ok(mut voices) = self.voices.lock() {
            for voice in voices.iter_mut() {
                voice.set_wah_position(position);
            }
        }
    }

    /// Configure the ADSR envelope on every voice
    pub fn set_envelope(&self, attack: f32, decay: f32, sustain: f32, release: f32) {
        if let Ok(mut voices) = self.voices.lock() {
            for voice in voices.iter_mut() {
                voice.configure_envelope(attack, decay, sustain, release);
            }
        }
    }

    /// Fill a mono buffer with the next block of samples.
    ///
    /// Zeroes the buffer, accumulates every active voice under one
    /// short-lived lock, then scales by master volume and the headroom
    /// attenuation and hard-clamps to [-1, 1] after the lock is
    /// released. A poisoned pool degrades to silence rather than
    /// panicking the render thread.
    pub fn render(&self, buffer: &mut [f32]) {
        buffer.fill(0.0);

        if let Ok(mut voices) = self.voices.lock() {
            for voice in voices.iter_mut() {
                if voice.is_active() {
                    for sample in buffer.iter_mut() {
                        *sample += voice.next_sample();
                    }
                }
            }
        }

        let gain = self.master_volume() * SYNTH_ATTENUATION;
        for sample in buffer.iter_mut() {
            *sample = (*sample * gain).clamp(-1.0, 1.0);
        }
    }
}
