//! Audio backend abstraction
//!
//! The platform audio session (device selection, stream open/close,
//! buffer negotiation) is owned by a backend implementation; the engine
//! only renders into whatever buffer the backend asks for. Abstracting
//! the backend keeps the stream-recovery contract testable without a
//! sound card.

use super::{Engine, EngineError};
use std::sync::Arc;

/// Parameters the backend actually negotiated when opening a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    /// Actual sample rate in Hz
    pub sample_rate: u32,
}

/// An audio output backend that periodically pulls samples from the
/// engine's render entry point.
pub trait AudioBackend {
    /// Open an output stream that renders from the given engine.
    ///
    /// Returns the negotiated stream parameters; the caller is
    /// responsible for propagating a changed sample rate to the engine.
    fn open(&mut self, engine: Arc<Engine>) -> Result<StreamInfo, EngineError>;

    /// Close the stream if one is open
    fn close(&mut self);
}
