//! Riff - real-time polyphonic synthesis engine
//!
//! Turns note-on/note-off events and continuous control parameters into
//! a continuous audio signal. Eight independent voices, each an
//! oscillator with its own ADSR envelope and effect chain, mixed under
//! a hard real-time deadline.

pub mod config;
pub mod synth;
pub mod engine;

pub use config::SynthConfig;
pub use engine::Engine;
