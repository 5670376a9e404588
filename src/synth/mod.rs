//! Synthesis building blocks
//!
//! Contains the ADSR envelope, the voice (oscillator + timbre state),
//! and the voice-local effects.

mod envelope;
mod effects;
mod voice;

pub use envelope::{Envelope, EnvelopeStage};
pub use effects::{distort, Reverb, Wah};
pub use voice::{Voice, WaveType};
