//! Voice-local effects: distortion, reverb, wah
//!
//! Stateful per-voice processors applied to the guitar timbre. All the
//! tuning constants here are matched by ear; changing them changes the
//! instrument.

use std::f32::consts::PI;

const TWO_PI: f32 = 2.0 * PI;

/// Tube-amp style distortion.
///
/// Asymmetric soft clip into a second gain stage, with added odd
/// harmonics for bite. `drive` is the pre-amp gain, `amount` the user
/// distortion parameter in [0,1].
pub fn distort(input: f32, drive: f32, amount: f32) -> f32 {
    // Scale drive by the user parameter
    let effective_drive = drive * (0.5 + amount * 1.5);

    let x = input * effective_drive;

    // Asymmetric soft clipping (positive half clips harder)
    let stage1 = if x > 0.0 {
        1.0 - (-x * 1.5).exp()
    } else {
        -1.0 + (x * 1.2).exp()
    };

    // Second gain stage
    let stage2 = (stage1 * (2.0 + amount * 2.0)).tanh();

    // Odd harmonics for aggressive bite
    let harmonics = stage2 + 0.3 * (stage2 * 3.0).tanh();

    (harmonics * 1.2).tanh()
}

/// Plate-style reverb built from three parallel comb filters.
///
/// Delay line lengths are 100 ms scaled by {1.0, 0.77, 0.63}, sized to
/// the actual sample rate. Identity when the amount is below 0.01.
pub struct Reverb {
    amount: f32,
    buffers: [Vec<f32>; 3],
    indices: [usize; 3],
}

// Base delay of 100 ms; the other two lines are prime-ish fractions of
// it so the tails do not phase-lock.
const REVERB_BASE_SECS: f32 = 0.1;
const REVERB_LINE_RATIOS: [f32; 3] = [1.0, 0.77, 0.63];

impl Reverb {
    /// Create a reverb sized for the given sample rate
    pub fn new(sample_rate: f32) -> Self {
        let base = (sample_rate * REVERB_BASE_SECS).max(2.0);
        let buffers = REVERB_LINE_RATIOS.map(|r| vec![0.0; (base * r) as usize]);
        Self {
            amount: 0.0,
            buffers,
            indices: [0; 3],
        }
    }

    /// Set the wet amount (0.0-1.0)
    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount.clamp(0.0, 1.0);
    }

    /// Get the wet amount
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Clear the delay lines
    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(0.0);
        }
        self.indices = [0; 3];
    }

    /// Resize the delay lines for a new sample rate.
    ///
    /// Reallocates; only called from stream (re)configuration, never
    /// from the render path.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        *self = Self {
            amount: self.amount,
            ..Self::new(sample_rate)
        };
    }

    /// Process one sample
    pub fn process(&mut self, input: f32) -> f32 {
        if self.amount < 0.01 {
            return input;
        }

        // Read the delay line taps
        let rev1 = self.buffers[0][self.indices[0]];
        let rev2 = self.buffers[1][self.indices[1]];
        let rev3 = self.buffers[2][self.indices[2]];

        let wet = (rev1 + rev2 + rev3) / 3.0;

        // Feedback decay grows with the wet amount; the shorter lines
        // decay slightly faster to avoid a metallic ring
        let decay = 0.3 + self.amount * 0.5;
        self.buffers[0][self.indices[0]] = input + rev1 * decay;
        self.buffers[1][self.indices[1]] = input + rev2 * decay * 0.9;
        self.buffers[2][self.indices[2]] = input + rev3 * decay * 0.8;

        for (index, buffer) in self.indices.iter_mut().zip(&self.buffers) {
            *index = (*index + 1) % buffer.len();
        }

        input * (1.0 - self.amount * 0.5) + wet * self.amount
    }
}

/// Wah pedal: a state-variable bandpass filter with a sweeping center
/// frequency, either driven by an internal LFO (auto mode) or by an
/// explicitly set pedal position (manual mode).
pub struct Wah {
    sample_rate: f32,
    enabled: bool,
    auto_mode: bool,
    position: f32,
    lfo_phase: f32,
    band1: f32,
    band2: f32,
}

// Classic wah character: high Q, ~400 Hz heel to ~2.2 kHz toe, LFO
// around 3-4 Hz in auto mode.
const WAH_Q: f32 = 6.0;
const WAH_MIN_FREQ: f32 = 400.0;
const WAH_MAX_FREQ: f32 = 2200.0;
const WAH_LFO_HZ: f32 = 3.5;

impl Wah {
    /// Create a disabled wah
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            enabled: false,
            auto_mode: true,
            position: 0.5,
            lfo_phase: 0.0,
            band1: 0.0,
            band2: 0.0,
        }
    }

    /// Enable or disable the effect.
    ///
    /// Enabling defaults to auto mode; disabling clears the filter
    /// memory so re-enabling starts without stale resonance.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.auto_mode = true;
        if !enabled {
            self.band1 = 0.0;
            self.band2 = 0.0;
        }
    }

    /// Check if the effect is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the pedal position (0 = heel, 1 = toe), switching to manual mode
    pub fn set_position(&mut self, position: f32) {
        self.position = position.clamp(0.0, 1.0);
        self.auto_mode = false;
    }

    /// Set the sample rate
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Process one sample; identity when disabled
    pub fn process(&mut self, input: f32) -> f32 {
        if !self.enabled {
            return input;
        }

        let position = if self.auto_mode {
            self.lfo_phase += (TWO_PI * WAH_LFO_HZ) / self.sample_rate;
            if self.lfo_phase >= TWO_PI {
                self.lfo_phase -= TWO_PI;
            }
            0.5 + 0.5 * self.lfo_phase.sin()
        } else {
            self.position
        };

        // Center frequency normalized by the sample rate
        let min_freq = WAH_MIN_FREQ / self.sample_rate;
        let max_freq = WAH_MAX_FREQ / self.sample_rate;
        let center_freq = min_freq + position * (max_freq - min_freq);

        // State variable filter, bandpass output
        let f = 2.0 * (PI * center_freq).sin();
        let q = 1.0 / WAH_Q;

        let hp = input - self.band2 - q * self.band1;
        self.band1 += f * hp;
        self.band2 += f * self.band1;

        let bandpass = self.band1 * WAH_Q * 0.5;

        // Mostly wet, some dry for note clarity, saturated for warmth
        let wet = 0.75 * bandpass + 0.25 * input;
        (wet * 1.5).tanh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distortion_bounded() {
        for amount in [0.0, 0.5, 1.0] {
            for i in -100..=100 {
                let input = i as f32 / 10.0;
                let out = distort(input, 30.0, amount);
                assert!((-1.0..=1.0).contains(&out), "out of range: {out}");
            }
        }
    }

    #[test]
    fn test_distortion_is_asymmetric() {
        let pos = distort(0.1, 15.0, 0.5);
        let neg = distort(-0.1, 15.0, 0.5);
        assert!((pos + neg).abs() > 1e-4, "clipping should be asymmetric");
    }

    #[test]
    fn test_distortion_amount_increases_gain() {
        let soft = distort(0.05, 15.0, 0.0).abs();
        let hard = distort(0.05, 15.0, 1.0).abs();
        assert!(hard > soft);
    }

    #[test]
    fn test_reverb_amount_clamped() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_amount(1.5);
        assert_eq!(reverb.amount(), 1.0);
        reverb.set_amount(-0.5);
        assert_eq!(reverb.amount(), 0.0);
    }

    #[test]
    fn test_reverb_bypass_is_identity() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_amount(0.005);

        for i in 0..1000 {
            let input = (i as f32 * 0.1).sin();
            assert_eq!(reverb.process(input), input);
        }
    }

    #[test]
    fn test_reverb_produces_tail() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_amount(0.8);

        // One impulse, then silence in
        reverb.process(1.0);
        let mut tail_energy = 0.0;
        for _ in 0..48000 {
            tail_energy += reverb.process(0.0).abs();
        }
        assert!(tail_energy > 0.0, "expected a reverb tail");
    }

    #[test]
    fn test_reverb_reset_clears_tail() {
        let mut reverb = Reverb::new(48000.0);
        reverb.set_amount(0.8);

        reverb.process(1.0);
        reverb.reset();

        for _ in 0..48000 {
            assert_eq!(reverb.process(0.0), 0.0);
        }
    }

    #[test]
    fn test_reverb_line_lengths_scale_with_sample_rate() {
        let reverb = Reverb::new(48000.0);
        assert_eq!(reverb.buffers[0].len(), 4800);
        assert_eq!(reverb.buffers[1].len(), (4800.0 * 0.77) as usize);
        assert_eq!(reverb.buffers[2].len(), (4800.0 * 0.63) as usize);

        let reverb = Reverb::new(44100.0);
        assert_eq!(reverb.buffers[0].len(), 4410);
    }

    #[test]
    fn test_wah_disabled_is_identity() {
        let mut wah = Wah::new(48000.0);

        for i in 0..1000 {
            let input = (i as f32 * 0.1).sin();
            assert_eq!(wah.process(input), input);
        }
    }

    #[test]
    fn test_wah_disable_clears_filter_memory() {
        let mut wah = Wah::new(48000.0);
        wah.set_enabled(true);
        assert!(wah.is_enabled());

        for i in 0..1000 {
            wah.process((i as f32 * 0.3).sin());
        }
        assert!(wah.band1 != 0.0 || wah.band2 != 0.0);

        wah.set_enabled(false);
        assert!(!wah.is_enabled());
        assert_eq!(wah.band1, 0.0);
        assert_eq!(wah.band2, 0.0);
    }

    #[test]
    fn test_wah_enable_defaults_to_auto_mode() {
        let mut wah = Wah::new(48000.0);
        wah.set_position(0.2); // Manual
        assert!(!wah.auto_mode);

        wah.set_enabled(true);
        assert!(wah.auto_mode);
    }

    #[test]
    fn test_wah_output_bounded() {
        let mut wah = Wah::new(48000.0);
        wah.set_enabled(true);
        wah.set_position(1.0);

        for i in 0..10000 {
            let out = wah.process((i as f32 * 0.5).sin());
            assert!((-1.0..=1.0).contains(&out), "out of range: {out}");
        }
    }
}
