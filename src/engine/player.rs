//! Real-time playback: cpal backend + stream fault recovery
//!
//! `Player` pairs the engine with an [`AudioBackend`] and owns the
//! stream lifecycle, including the one-shot self-heal after a fatal
//! stream fault. `CpalBackend` is the production backend.

use super::backend::{AudioBackend, StreamInfo};
use super::{Engine, EngineError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Drives an audio backend from the engine and applies the stream
/// fault policy: exactly one reopen per session, then terminal.
pub struct Player<B: AudioBackend> {
    backend: B,
    engine: Arc<Engine>,
    recovery_spent: bool,
}

impl<B: AudioBackend> Player<B> {
    /// Create a player for the given engine and backend
    pub fn new(engine: Arc<Engine>, backend: B) -> Self {
        Self {
            backend,
            engine,
            recovery_spent: false,
        }
    }

    /// Open the stream and start the engine.
    ///
    /// The sample rate the backend actually negotiated is pushed to
    /// every voice before any audio is rendered. Re-arms the one-shot
    /// recovery.
    pub fn start(&mut self) -> Result<(), EngineError> {
        let info = self.backend.open(Arc::clone(&self.engine))?;
        if info.sample_rate != self.engine.sample_rate() {
            self.engine.set_sample_rate(info.sample_rate);
        }
        self.engine.start();
        self.recovery_spent = false;
        Ok(())
    }

    /// Stop the engine and close the stream
    pub fn stop(&mut self) {
        self.engine.stop();
        self.backend.close();
    }

    /// Check if the engine believes itself running
    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Stream fault reported before the backend closed the stream.
    /// Informational only; the after-close callback decides recovery.
    pub fn on_stream_error_before_close(&mut self, _reason: &str) {}

    /// Stream fault reported after the backend closed the stream.
    ///
    /// While the engine believes itself running, performs exactly one
    /// reopen with the same logical configuration. If the reopened
    /// stream negotiated a different sample rate, every voice is
    /// re-notified. A reopen failure, or any fault after the single
    /// recovery was spent, stops the engine and is surfaced as
    /// terminal; there is no retry loop.
    pub fn on_stream_error_after_close(&mut self, reason: &str) -> Result<(), EngineError> {
        if !self.engine.is_running() {
            return Ok(());
        }

        if self.recovery_spent {
            self.engine.stop();
            self.backend.close();
            return Err(EngineError::Terminal(reason.to_string()));
        }
        self.recovery_spent = true;

        self.backend.close();
        match self.backend.open(Arc::clone(&self.engine)) {
            Ok(info) => {
                if info.sample_rate != self.engine.sample_rate() {
                    self.engine.set_sample_rate(info.sample_rate);
                }
                Ok(())
            }
            Err(err) => {
                self.engine.stop();
                Err(EngineError::Terminal(format!("{reason}: reopen failed: {err}")))
            }
        }
    }
}

/// cpal output backend.
///
/// Stream faults are forwarded over a channel because cpal streams are
/// not `Send`; whoever drains [`CpalBackend::faults`] (the play loop)
/// feeds them into [`Player::on_stream_error_after_close`] on its own
/// thread.
pub struct CpalBackend {
    device_name: Option<String>,
    buffer_size: Option<u32>,
    stream: Option<Stream>,
    fault_tx: Sender<String>,
    fault_rx: Option<Receiver<String>>,
}

impl CpalBackend {
    /// Create a backend for the default or a named output device
    pub fn new(device_name: Option<String>, buffer_size: Option<u32>) -> Self {
        let (fault_tx, fault_rx) = channel();
        Self {
            device_name,
            buffer_size,
            stream: None,
            fault_tx,
            fault_rx: Some(fault_rx),
        }
    }

    /// Take the stream fault receiver. Yields one message per fault
    /// reported by the device; can only be taken once.
    pub fn faults(&mut self) -> Option<Receiver<String>> {
        self.fault_rx.take()
    }

    fn find_device(&self) -> Result<Device, EngineError> {
        let host = cpal::default_host();

        if let Some(name) = &self.device_name {
            let mut devices = host
                .output_devices()
                .map_err(|e| EngineError::StreamOpen(e.to_string()))?;
            return devices
                .find(|d| d.name().map(|n| &n == name).unwrap_or(false))
                .ok_or(EngineError::NoOutputDevice);
        }

        host.default_output_device().ok_or(EngineError::NoOutputDevice)
    }

    fn build_stream<T>(
        &self,
        device: &Device,
        config: &StreamConfig,
        engine: Arc<Engine>,
    ) -> Result<Stream, EngineError>
    where
        T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;
        let fault_tx = self.fault_tx.clone();

        // Scratch for the mono mix; allocated here, never in the callback
        let mut scratch = vec![0.0f32; 8192];

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    if !engine.is_running() {
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                        return;
                    }

                    let frames = data.len() / channels;
                    if frames > scratch.len() {
                        scratch.resize(frames, 0.0);
                    }

                    engine.render(&mut scratch[..frames]);

                    for (frame, &sample) in data.chunks_mut(channels).zip(scratch.iter()) {
                        for channel_sample in frame.iter_mut() {
                            *channel_sample = T::from_sample(sample);
                        }
                    }
                },
                move |err| {
                    let _ = fault_tx.send(err.to_string());
                },
                None,
            )
            .map_err(|e| EngineError::StreamOpen(e.to_string()))?;

        Ok(stream)
    }
}

impl AudioBackend for CpalBackend {
    fn open(&mut self, engine: Arc<Engine>) -> Result<StreamInfo, EngineError> {
        let device = self.find_device()?;

        let default_config = device
            .default_output_config()
            .map_err(|e| EngineError::StreamOpen(e.to_string()))?;
        let sample_format = default_config.sample_format();

        let mut stream_config: StreamConfig = default_config.into();
        if let Some(frames) = self.buffer_size {
            stream_config.buffer_size = cpal::BufferSize::Fixed(frames);
        }

        let sample_rate = stream_config.sample_rate.0;

        let stream = match sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(&device, &stream_config, engine)?,
            SampleFormat::I16 => self.build_stream::<i16>(&device, &stream_config, engine)?,
            SampleFormat::U16 => self.build_stream::<u16>(&device, &stream_config, engine)?,
            other => return Err(EngineError::UnsupportedFormat(format!("{other:?}"))),
        };

        stream
            .play()
            .map_err(|e| EngineError::StreamOpen(e.to_string()))?;
        self.stream = Some(stream);

        Ok(StreamInfo { sample_rate })
    }

    fn close(&mut self) {
        self.stream = None;
    }
}

/// List all available output devices as (name, default sample rate)
pub fn list_output_devices() -> Vec<(String, u32)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.sample_rate().0));
            }
        }
    }

    devices
}
