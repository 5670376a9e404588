//! ADSR envelope generator
//!
//! Attack-Decay-Sustain-Release envelope for amplitude shaping.
//! Advanced once per produced sample; per-sample rates are derived from
//! the user-set times and the sample rate so the hot path is a single
//! add and compare.

/// Envelope stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// ADSR envelope generator
pub struct Envelope {
    sample_rate: f32,

    // Time parameters (in seconds)
    attack: f32,
    decay: f32,
    sustain: f32, // Level (0.0-1.0)
    release: f32,

    // Per-sample rates derived from the times above
    attack_rate: f32,
    decay_rate: f32,
    release_rate: f32,

    // State
    stage: EnvelopeStage,
    level: f32,
}

impl Envelope {
    /// Create a new envelope with default parameters
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            sample_rate,
            attack: 0.01,  // 10ms
            decay: 0.1,    // 100ms
            sustain: 0.7,  // 70% level
            release: 0.3,  // 300ms
            attack_rate: 0.0,
            decay_rate: 0.0,
            release_rate: 0.0,
            stage: EnvelopeStage::Idle,
            level: 0.0,
        };
        env.calculate_rates();
        env
    }

    /// Set the sample rate and rederive the per-sample rates
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.calculate_rates();
    }

    /// Set attack time in seconds
    pub fn set_attack(&mut self, seconds: f32) {
        self.attack = seconds.max(0.001); // Minimum 1ms
        self.calculate_rates();
    }

    /// Set decay time in seconds
    pub fn set_decay(&mut self, seconds: f32) {
        self.decay = seconds.max(0.001);
        self.calculate_rates();
    }

    /// Set sustain level (0.0-1.0)
    pub fn set_sustain(&mut self, level: f32) {
        self.sustain = level.clamp(0.0, 1.0);
        self.calculate_rates();
    }

    /// Set release time in seconds
    pub fn set_release(&mut self, seconds: f32) {
        self.release = seconds.max(0.001);
        self.calculate_rates();
    }

    /// Configure all ADSR parameters at once
    pub fn configure(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.set_attack(attack);
        self.set_decay(decay);
        self.set_sustain(sustain);
        self.set_release(release);
    }

    fn calculate_rates(&mut self) {
        self.attack_rate = 1.0 / (self.attack * self.sample_rate);
        self.decay_rate = (1.0 - self.sustain) / (self.decay * self.sample_rate);
        self.release_rate = self.sustain / (self.release * self.sample_rate);
    }

    /// Start the attack phase from any state.
    ///
    /// The level is deliberately not reset so a fast retrigger ramps
    /// from wherever it was instead of clicking back to zero.
    pub fn note_on(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    /// Start the release phase.
    ///
    /// The release rate is recomputed from the *current* level, not the
    /// nominal sustain level, so a note released mid-attack fades over
    /// a duration proportional to how loud it actually got.
    pub fn note_off(&mut self) {
        if self.stage != EnvelopeStage::Idle {
            if self.level > 0.001 {
                self.release_rate = self.level / (self.release * self.sample_rate);
            }
            self.stage = EnvelopeStage::Release;
        }
    }

    /// Force idle at zero level (hard mute)
    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
    }

    /// Get current stage
    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    /// Check if envelope is active (not idle)
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    /// Get current level without advancing
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Generate the next envelope sample
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Idle => {
                return 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += self.attack_rate;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                self.level -= self.decay_rate;
                if self.level <= self.sustain {
                    self.level = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = self.sustain;
            }

            EnvelopeStage::Release => {
                self.level -= self.release_rate;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        self.level
    }
}
