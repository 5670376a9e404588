//! WAV bounce
//!
//! Offline rendering of the engine's output to a mono float WAV file.

use super::Engine;
use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Render chunk size for offline bounces
const BOUNCE_CHUNK: usize = 512;

/// Writes engine output to a WAV file
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    samples_written: u64,
}

impl Recorder {
    /// Create a recorder writing mono 32-bit float WAV at the given rate
    pub fn new(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {path:?}"))?;

        Ok(Self {
            writer,
            sample_rate,
            samples_written: 0,
        })
    }

    /// Get the number of samples written
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Get the duration recorded in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples_written as f64 / self.sample_rate as f64
    }

    /// Write a buffer of samples
    pub fn write_buffer(&mut self, buffer: &[f32]) -> Result<()> {
        for &sample in buffer {
            self.writer
                .write_sample(sample)
                .context("failed to write sample")?;
        }
        self.samples_written += buffer.len() as u64;
        Ok(())
    }

    /// Render `frames` samples from the engine and write them
    pub fn bounce(&mut self, engine: &Engine, frames: usize) -> Result<()> {
        let mut chunk = [0.0f32; BOUNCE_CHUNK];
        let mut remaining = frames;

        while remaining > 0 {
            let n = remaining.min(BOUNCE_CHUNK);
            engine.render(&mut chunk[..n]);
            self.write_buffer(&chunk[..n])?;
            remaining -= n;
        }

        Ok(())
    }

    /// Finalize the WAV file.
    ///
    /// Must be called to close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthConfig;
    use tempfile::NamedTempFile;

    #[test]
    fn test_recorder_creation() {
        let file = NamedTempFile::new().unwrap();
        let recorder = Recorder::new(file.path(), 48000).unwrap();

        assert_eq!(recorder.samples_written(), 0);
        assert_eq!(recorder.duration_secs(), 0.0);
    }

    #[test]
    fn test_recorder_write_buffer() {
        let file = NamedTempFile::new().unwrap();
        let mut recorder = Recorder::new(file.path(), 48000).unwrap();

        recorder.write_buffer(&[0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();

        assert_eq!(recorder.samples_written(), 5);
    }

    #[test]
    fn test_bounce_duration() {
        let file = NamedTempFile::new().unwrap();
        let mut recorder = Recorder::new(file.path(), 48000).unwrap();
        let engine = Engine::new(&SynthConfig::default());

        recorder.bounce(&engine, 48000).unwrap();

        assert!((recorder.duration_secs() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_bounce_produces_valid_wav_with_audio() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let engine = Engine::new(&SynthConfig::default());
        engine.note_on(0, 440.0);

        {
            let mut recorder = Recorder::new(&path, 48000).unwrap();
            recorder.bounce(&engine, 4800).unwrap();
            recorder.finalize().unwrap();
        }

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(spec.sample_format, SampleFormat::Float);

        let samples: Vec<f32> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 4800);
        let max = samples.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!(max > 0.0, "bounce should contain audio");
    }
}
