//! Polyphonic voice: timbre generation + envelope + effect chain
//!
//! One voice is one independently playable note. It owns a phase
//! accumulator, an ADSR envelope, a tagged timbre variant carrying the
//! per-timbre synthesis state, and the voice-local effects (reverb,
//! wah). Timbre dispatch is a single match per sample; virtual dispatch
//! has no business on the render path.

use std::f32::consts::PI;

use super::effects::{distort, Reverb, Wah};
use super::envelope::Envelope;

const TWO_PI: f32 = 2.0 * PI;

/// Selectable timbres
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveType {
    /// Additive organ (nine fixed-ratio partials)
    Organ,
    Sawtooth,
    Square,
    Triangle,
    /// FM + filtered noise percussion, classified by note frequency
    Drums,
    /// Electric bass (filtered oscillator stack)
    Bass,
    /// Electric guitar (distortion, wah, reverb chain)
    Guitar,
}

impl WaveType {
    /// Parse a wave type name; unrecognized names fall back to Sawtooth
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "organ" => WaveType::Organ,
            "sawtooth" | "saw" => WaveType::Sawtooth,
            "square" => WaveType::Square,
            "triangle" => WaveType::Triangle,
            "drums" | "drum" => WaveType::Drums,
            "bass" => WaveType::Bass,
            "guitar" => WaveType::Guitar,
            _ => WaveType::Sawtooth,
        }
    }

    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            WaveType::Organ => "organ",
            WaveType::Sawtooth => "sawtooth",
            WaveType::Square => "square",
            WaveType::Triangle => "triangle",
            WaveType::Drums => "drums",
            WaveType::Bass => "bass",
            WaveType::Guitar => "guitar",
        }
    }
}

/// Simple xorshift RNG for noise generation
struct NoiseRng {
    state: u64,
}

impl NoiseRng {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    /// Seed from a note frequency so each hit is decorrelated
    fn from_frequency(frequency: f32) -> Self {
        Self::new((frequency * 1000.0) as u64)
    }

    /// Uniform random sample in -1.0..1.0
    fn next(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x as f64 / u64::MAX as f64 * 2.0 - 1.0) as f32
    }
}

/// Per-note drum synthesis state
struct DrumState {
    /// FM modulator phase, advanced at 1.5x the note phase increment
    phase2: f32,
    /// Exponentially decaying amplitude
    decay: f32,
    /// One-pole state for the metallic high-pass
    noise_lp: f32,
    rng: NoiseRng,
}

impl DrumState {
    fn new(frequency: f32) -> Self {
        Self {
            phase2: 0.0,
            decay: 1.0,
            noise_lp: 0.0,
            rng: NoiseRng::from_frequency(frequency),
        }
    }
}

/// Shared state for the string timbres (bass, guitar): two one-pole
/// filter stages and an energy accumulator that shapes attack/sustain.
struct StringState {
    lp1: f32,
    lp2: f32,
    energy: f32,
}

impl StringState {
    fn new() -> Self {
        Self {
            lp1: 0.0,
            lp2: 0.0,
            energy: 1.0,
        }
    }
}

/// Timbre variant with its disjoint synthesis state
enum Timbre {
    Organ,
    Sawtooth,
    Square,
    Triangle,
    Drums(DrumState),
    Bass(StringState),
    Guitar(StringState),
}

impl Timbre {
    fn for_kind(kind: WaveType, frequency: f32) -> Self {
        match kind {
            WaveType::Organ => Timbre::Organ,
            WaveType::Sawtooth => Timbre::Sawtooth,
            WaveType::Square => Timbre::Square,
            WaveType::Triangle => Timbre::Triangle,
            WaveType::Drums => Timbre::Drums(DrumState::new(frequency)),
            WaveType::Bass => Timbre::Bass(StringState::new()),
            WaveType::Guitar => Timbre::Guitar(StringState::new()),
        }
    }

    fn kind(&self) -> WaveType {
        match self {
            Timbre::Organ => WaveType::Organ,
            Timbre::Sawtooth => WaveType::Sawtooth,
            Timbre::Square => WaveType::Square,
            Timbre::Triangle => WaveType::Triangle,
            Timbre::Drums(_) => WaveType::Drums,
            Timbre::Bass(_) => WaveType::Bass,
            Timbre::Guitar(_) => WaveType::Guitar,
        }
    }

    /// Reinitialize per-note state at the start of a note
    fn reset(&mut self, frequency: f32) {
        match self {
            Timbre::Drums(drum) => *drum = DrumState::new(frequency),
            Timbre::Bass(string) | Timbre::Guitar(string) => *string = StringState::new(),
            _ => {}
        }
    }
}

/// Drum class constants, selected by the note's base frequency
struct DrumClass {
    pitch_decay: f32,
    noise_amount: f32,
    fm_amount: f32,
    decay_rate: f32,
    /// Kick/tom: pitch envelope drops the phase increment
    pitched: bool,
    /// Kick only: extra transient boost
    kick: bool,
    /// Cymbal/hi-hat: high-pass the noise
    metallic: bool,
}

impl DrumClass {
    fn classify(frequency: f32) -> Self {
        if frequency < 100.0 {
            // Kick: strong FM punch, long decay
            Self {
                pitch_decay: 0.995,
                noise_amount: 0.05,
                fm_amount: 4.0,
                decay_rate: 0.9995,
                pitched: true,
                kick: true,
                metallic: false,
            }
        } else if frequency < 250.0 {
            // Tom
            Self {
                pitch_decay: 0.998,
                noise_amount: 0.1,
                fm_amount: 2.0,
                decay_rate: 0.999,
                pitched: true,
                kick: false,
                metallic: false,
            }
        } else if frequency < 350.0 {
            // Snare: mostly noise (snare wires)
            Self {
                pitch_decay: 0.99,
                noise_amount: 0.6,
                fm_amount: 1.5,
                decay_rate: 0.9985,
                pitched: false,
                kick: false,
                metallic: false,
            }
        } else if frequency < 700.0 {
            // Crash/ride cymbal: long metallic sustain
            Self {
                pitch_decay: 1.0,
                noise_amount: 0.85,
                fm_amount: 0.8,
                decay_rate: 0.9997,
                pitched: false,
                kick: false,
                metallic: true,
            }
        } else {
            // Hi-hat
            Self {
                pitch_decay: 1.0,
                noise_amount: 0.9,
                fm_amount: 0.5,
                decay_rate: 0.9992,
                pitched: false,
                kick: false,
                metallic: true,
            }
        }
    }
}

/// One playable voice
pub struct Voice {
    sample_rate: f32,
    base_frequency: f32,
    frequency: f32,
    pitch_bend_semitones: f32,
    phase: f32,
    phase_increment: f32,
    amplitude: f32,

    envelope: Envelope,
    timbre: Timbre,

    // Guitar chain parameters, all 0.0-1.0
    sustain: f32,
    gain: f32,
    distortion: f32,

    reverb: Reverb,
    wah: Wah,
}

impl Voice {
    /// Create a voice at the given sample rate
    pub fn new(sample_rate: f32) -> Self {
        let mut voice = Self {
            sample_rate,
            base_frequency: 440.0,
            frequency: 440.0,
            pitch_bend_semitones: 0.0,
            phase: 0.0,
            phase_increment: 0.0,
            amplitude: 0.8,
            envelope: Envelope::new(sample_rate),
            timbre: Timbre::Sawtooth,
            sustain: 0.5,
            gain: 0.5,
            distortion: 0.5,
            reverb: Reverb::new(sample_rate),
            wah: Wah::new(sample_rate),
        };
        voice.update_frequency();
        voice
    }

    /// Reconfigure for a new sample rate (stream reopen)
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.envelope.set_sample_rate(sample_rate);
        self.reverb.set_sample_rate(sample_rate);
        self.wah.set_sample_rate(sample_rate);
        self.update_frequency();
    }

    /// Set the base frequency in Hz, clamped to the audible range
    pub fn set_frequency(&mut self, frequency: f32) {
        self.base_frequency = frequency.clamp(20.0, 20000.0);
        self.update_frequency();
    }

    /// Get the effective frequency (base plus bend)
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Bend the pitch by semitones, clamped to one octave either way
    pub fn set_pitch_bend(&mut self, semitones: f32) {
        self.pitch_bend_semitones = semitones.clamp(-12.0, 12.0);
        self.update_frequency();
    }

    fn update_frequency(&mut self) {
        self.frequency = self.base_frequency * (self.pitch_bend_semitones / 12.0).exp2();
        self.phase_increment = (TWO_PI * self.frequency) / self.sample_rate;
    }

    /// Select the timbre; switching discards the old variant's state
    pub fn set_wave_type(&mut self, kind: WaveType) {
        if self.timbre.kind() != kind {
            self.timbre = Timbre::for_kind(kind, self.base_frequency);
        }
    }

    /// Get the current timbre
    pub fn wave_type(&self) -> WaveType {
        self.timbre.kind()
    }

    /// Set the voice amplitude (0.0-1.0)
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude.clamp(0.0, 1.0);
    }

    /// Configure the ADSR envelope times and sustain level
    pub fn configure_envelope(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.envelope.configure(attack, decay, sustain, release);
    }

    /// Set the guitar sustain parameter (0.0-1.0)
    pub fn set_guitar_sustain(&mut self, sustain: f32) {
        self.sustain = sustain.clamp(0.0, 1.0);
    }

    /// Set the guitar gain parameter (0.0-1.0)
    pub fn set_guitar_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    /// Set the guitar distortion parameter (0.0-1.0)
    pub fn set_guitar_distortion(&mut self, distortion: f32) {
        self.distortion = distortion.clamp(0.0, 1.0);
    }

    /// Set the reverb wet amount (0.0-1.0)
    pub fn set_guitar_reverb(&mut self, reverb: f32) {
        self.reverb.set_amount(reverb);
    }

    /// Enable or disable the wah pedal
    pub fn set_wah_enabled(&mut self, enabled: bool) {
        self.wah.set_enabled(enabled);
    }

    /// Set the wah pedal position (0.0-1.0, switches to manual mode)
    pub fn set_wah_position(&mut self, position: f32) {
        self.wah.set_position(position);
    }

    /// Start a note at the given frequency.
    ///
    /// Resets phase and per-timbre state, zeroes any pending pitch
    /// bend, and triggers the envelope. Reverb tails are left ringing.
    pub fn note_on(&mut self, frequency: f32) {
        self.base_frequency = frequency.clamp(20.0, 20000.0);
        self.pitch_bend_semitones = 0.0;
        self.update_frequency();
        self.phase = 0.0;
        self.timbre.reset(self.base_frequency);
        self.envelope.note_on();
    }

    /// Release the note
    pub fn note_off(&mut self) {
        self.envelope.note_off();
    }

    /// Hard reset: silence immediately and clear all effect state
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.envelope.reset();
        self.timbre.reset(self.base_frequency);
        self.reverb.reset();
    }

    /// A voice is active iff its envelope is not idle
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    /// Current phase, always in [0, 2π)
    #[cfg(test)]
    pub(crate) fn phase(&self) -> f32 {
        self.phase
    }

    /// Generate the next output sample.
    ///
    /// Returns 0 without touching any state when the envelope is idle;
    /// with a mostly-idle pool this bypass is what keeps the render
    /// pass inside its CPU budget.
    pub fn next_sample(&mut self) -> f32 {
        if !self.envelope.is_active() {
            return 0.0;
        }

        let sample = self.generate();
        let env = self.envelope.next_sample();

        // String timbres ring naturally; boost the envelope so the
        // release stays audible without truncating the tail
        let env = match self.timbre.kind() {
            WaveType::Guitar | WaveType::Bass => (env * 1.5).min(1.0),
            _ => env,
        };

        let out = sample * env * self.amplitude;

        // The increment can exceed a full cycle at low sample rates,
        // so a single subtraction is not enough
        self.phase += self.phase_increment;
        if self.phase >= TWO_PI {
            self.phase %= TWO_PI;
        }

        out
    }

    fn generate(&mut self) -> f32 {
        let phase = self.phase;
        match &mut self.timbre {
            Timbre::Organ => organ_sample(phase),

            Timbre::Sawtooth => phase / PI - 1.0,

            Timbre::Square => {
                if phase < PI {
                    1.0
                } else {
                    -1.0
                }
            }

            Timbre::Triangle => 1.0 - (2.0 / PI) * (phase - PI).abs(),

            Timbre::Drums(drum) => {
                let class = DrumClass::classify(self.base_frequency);

                drum.decay *= class.decay_rate;
                if drum.decay < 0.001 {
                    drum.decay = 0.001;
                }

                // FM body: modulator runs at 1.5x the note phase rate
                let fm = (drum.phase2 * class.fm_amount).sin() * drum.decay * 2.0;
                let body = (phase + fm).sin();

                drum.phase2 += self.phase_increment * 1.5;
                if drum.phase2 >= TWO_PI {
                    drum.phase2 %= TWO_PI;
                }

                // Pitch envelope for kick/tom punch
                if class.pitched && drum.decay > 0.5 {
                    self.phase_increment *= class.pitch_decay;
                }

                let mut noise = drum.rng.next();
                if class.metallic {
                    // One-pole high-pass for the cymbal shimmer
                    drum.noise_lp = noise * 0.5 + drum.noise_lp * 0.5;
                    noise = (noise - drum.noise_lp) * 2.5;
                }

                let mut out = body * (1.0 - class.noise_amount) + noise * class.noise_amount;
                out *= drum.decay;

                if class.kick && drum.decay > 0.7 {
                    out *= 1.8; // Initial transient boost
                }

                out *= 2.5;
                (out * 1.5).tanh()
            }

            Timbre::Bass(string) => {
                // Fundamental is king for bass; sub-octave for weight,
                // saw/square for growl and punch
                let fundamental = phase.sin();
                let sub_octave = 0.4 * (phase * 0.5).sin();
                let saw = 0.3 * (phase / PI - 1.0);
                let square = 0.2 * if phase < PI { 1.0 } else { -1.0 };
                let oscillator = fundamental + sub_octave + saw + square;

                let harmonics = 0.25 * (phase * 2.0).sin() + 0.1 * (phase * 3.0).sin();
                let raw = oscillator + harmonics * 0.3;

                // Two cascaded one-pole low-passes for the deep thump
                string.lp1 += 0.2 * (raw - string.lp1);
                string.lp2 += 0.15 * (string.lp1 - string.lp2);
                let bass_signal = string.lp2;

                // Warm tube compression
                let mut amped = (bass_signal * 2.5 * 1.5).tanh();
                amped += 0.1 * (string.lp1 - string.lp2); // Mid presence

                // Attack emphasis driven by the energy accumulator
                amped *= 1.0 + string.energy * 0.3;
                string.energy *= 0.9998;
                if string.energy < 0.7 {
                    string.energy = 0.7;
                }

                (amped * 1.8).tanh()
            }

            Timbre::Guitar(string) => {
                // Saw for humbucker character, slow-PWM pulse for
                // single-coil edge
                let saw = phase / PI - 1.0;
                let pulse_width = 0.65 + 0.1 * (phase * 0.01).sin();
                let pulse = if phase < PI * pulse_width { 1.0 } else { -1.0 };
                let oscillator = 0.6 * saw + 0.4 * pulse;

                let mut harmonics = 0.0;
                harmonics += 0.5 * (phase * 2.0).sin();
                harmonics += 0.35 * (phase * 3.0).sin();
                harmonics += 0.25 * (phase * 4.0).sin();
                harmonics += 0.15 * (phase * 5.0).sin();
                harmonics += 0.1 * (phase * 6.0).sin();

                let raw = 0.65 * oscillator + 0.35 * harmonics;

                // Pickup: one-pole low-pass, brighter with more gain
                let cutoff = 0.6 + self.gain * 0.2;
                string.lp1 += cutoff * (raw - string.lp1);
                let pickup = string.lp1 + 0.15 * (phase * 0.5).sin();

                // Amp: pre-gain into the distortion stages
                let preamp = pickup * (2.0 + self.gain * 3.0);
                let drive = 15.0 + self.distortion * 15.0;
                let mut distorted = distort(preamp, drive, self.distortion);

                // Presence/bite
                distorted += (0.15 + self.gain * 0.15) * (pickup - string.lp1);

                // Feedback/sustain driven by the energy accumulator
                let feedback = 0.1 + self.sustain * 0.2;
                distorted += feedback * phase.sin() * string.energy;
                distorted += feedback * 0.5 * (phase * 2.0).sin() * string.energy;

                // Higher sustain: slower decay and a higher floor
                let decay_rate = 0.9995 + self.sustain * 0.00045;
                if string.energy > 0.3 + self.sustain * 0.4 {
                    string.energy *= decay_rate;
                }
                let min_energy = 0.3 + self.sustain * 0.5;
                if string.energy < min_energy {
                    string.energy = min_energy;
                }

                let out = distorted * (1.3 + self.gain * 0.7);

                // Wah before reverb, then a final limiter
                let out = self.wah.process(out);
                let out = self.reverb.process(out);
                out.tanh()
            }
        }
    }
}

/// Additive organ: nine fixed-ratio partials with drawbar-style
/// weights, soft-saturated for overdrive character.
fn organ_sample(phase: f32) -> f32 {
    const PARTIALS: [(f32, f32); 9] = [
        (0.5, 1.0), // Sub-octave
        (1.5, 1.0), // Fifth
        (1.0, 1.0), // Fundamental
        (2.0, 1.0), // Octave
        (3.0, 0.6),
        (4.0, 0.6),
        (5.0, 0.3),
        (6.0, 0.3),
        (8.0, 0.2),
    ];

    let mut sample = 0.0;
    for (ratio, weight) in PARTIALS {
        sample += weight * (phase * ratio).sin();
    }
    sample /= 3.0;

    (sample * 2.5).tanh()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48000.0;

    #[test]
    fn test_idle_voice_is_silent() {
        let mut voice = Voice::new(SAMPLE_RATE);
        assert!(!voice.is_active());

        for _ in 0..100 {
            assert_eq!(voice.next_sample(), 0.0);
        }
    }

    #[test]
    fn test_note_on_activates_voice() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.note_on(440.0);

        assert!(voice.is_active());

        let mut max = 0.0f32;
        for _ in 0..1000 {
            max = max.max(voice.next_sample().abs());
        }
        assert!(max > 0.0, "expected audible output");
    }

    #[test]
    fn test_voice_silent_after_release_completes() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.note_on(440.0);

        for _ in 0..2000 {
            voice.next_sample();
        }

        voice.note_off();

        // Default release is 300ms; run well past it
        for _ in 0..48000 {
            voice.next_sample();
        }

        assert!(!voice.is_active());
        assert_eq!(voice.next_sample(), 0.0);
    }

    #[test]
    fn test_phase_stays_in_range() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.note_on(440.0);

        for i in 0..20000 {
            // Bend around mid-note
            if i == 5000 {
                voice.set_pitch_bend(12.0);
            }
            if i == 10000 {
                voice.set_pitch_bend(-12.0);
            }
            voice.next_sample();
            let phase = voice.phase();
            assert!(
                (0.0..TWO_PI).contains(&phase),
                "phase out of range: {phase}"
            );
        }
    }

    #[test]
    fn test_phase_wraps_when_increment_exceeds_cycle() {
        // At 8 kHz a 20 kHz note advances 2.5 cycles per sample; the
        // wrap must still land in [0, 2π) every time
        let mut voice = Voice::new(8000.0);
        voice.note_on(20000.0);

        for _ in 0..10000 {
            voice.next_sample();
            let phase = voice.phase();
            assert!(
                (0.0..TWO_PI).contains(&phase),
                "phase out of range: {phase}"
            );
        }
    }

    #[test]
    fn test_all_wave_types_bounded() {
        let kinds = [
            WaveType::Organ,
            WaveType::Sawtooth,
            WaveType::Square,
            WaveType::Triangle,
            WaveType::Drums,
            WaveType::Bass,
            WaveType::Guitar,
        ];

        for kind in kinds {
            let mut voice = Voice::new(SAMPLE_RATE);
            voice.set_wave_type(kind);
            voice.set_amplitude(1.0);
            voice.set_guitar_distortion(1.0);
            voice.set_guitar_gain(1.0);
            voice.note_on(220.0);

            for _ in 0..10000 {
                let sample = voice.next_sample();
                assert!(
                    (-1.0..=1.0).contains(&sample),
                    "{kind:?} sample out of range: {sample}"
                );
            }
        }
    }

    #[test]
    fn test_pitch_bend_changes_frequency() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.note_on(440.0);
        assert!((voice.frequency() - 440.0).abs() < 0.01);

        voice.set_pitch_bend(12.0);
        assert!((voice.frequency() - 880.0).abs() < 0.01);

        voice.set_pitch_bend(-12.0);
        assert!((voice.frequency() - 220.0).abs() < 0.01);

        // Clamped to one octave
        voice.set_pitch_bend(24.0);
        assert!((voice.frequency() - 880.0).abs() < 0.01);
    }

    #[test]
    fn test_note_on_resets_pitch_bend() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.note_on(440.0);
        voice.set_pitch_bend(7.0);

        voice.note_on(440.0);
        assert!((voice.frequency() - 440.0).abs() < 0.01);
    }

    #[test]
    fn test_frequency_clamped_to_audible_range() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.note_on(5.0);
        assert!((voice.frequency() - 20.0).abs() < 0.01);

        voice.note_on(30000.0);
        assert!((voice.frequency() - 20000.0).abs() < 0.01);
    }

    #[test]
    fn test_wave_type_fallback_parse() {
        assert_eq!(WaveType::from_name("guitar"), WaveType::Guitar);
        assert_eq!(WaveType::from_name("ORGAN"), WaveType::Organ);
        assert_eq!(WaveType::from_name("theremin"), WaveType::Sawtooth);
        assert_eq!(WaveType::from_name(""), WaveType::Sawtooth);
    }

    #[test]
    fn test_sawtooth_first_sample_near_negative_one() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.set_amplitude(1.0);
        voice.note_on(440.0);

        // Phase 0: raw saw = -1; scaled by the first envelope step
        let sample = voice.next_sample();
        assert!(sample <= 0.0 && sample > -0.01);
    }

    #[test]
    fn test_drum_classes_decay_to_silence_floor() {
        // Kick and hi-hat hit different class tables; both must decay
        for freq in [60.0, 900.0] {
            let mut voice = Voice::new(SAMPLE_RATE);
            voice.set_wave_type(WaveType::Drums);
            voice.set_amplitude(1.0);
            voice.note_on(freq);

            let mut early = 0.0f32;
            for _ in 0..4800 {
                early = early.max(voice.next_sample().abs());
            }

            // After several seconds the decay envelope has bottomed out
            for _ in 0..48000 * 4 {
                voice.next_sample();
            }
            let mut late = 0.0f32;
            for _ in 0..4800 {
                late = late.max(voice.next_sample().abs());
            }

            assert!(early > late * 2.0, "drum at {freq} Hz did not decay");
        }
    }

    #[test]
    fn test_hard_reset_silences_voice() {
        let mut voice = Voice::new(SAMPLE_RATE);
        voice.note_on(440.0);
        for _ in 0..1000 {
            voice.next_sample();
        }

        voice.reset();
        assert!(!voice.is_active());
        assert_eq!(voice.next_sample(), 0.0);
    }

    #[test]
    fn test_amplitude_scales_output() {
        let render = |amplitude: f32| -> f32 {
            let mut voice = Voice::new(SAMPLE_RATE);
            voice.set_amplitude(amplitude);
            voice.note_on(440.0);
            let mut max = 0.0f32;
            for _ in 0..4800 {
                max = max.max(voice.next_sample().abs());
            }
            max
        };

        let loud = render(1.0);
        let quiet = render(0.1);
        assert!(loud > quiet * 5.0);
        assert_eq!(render(0.0), 0.0);
    }
}
