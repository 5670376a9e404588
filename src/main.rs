//! Riff - real-time polyphonic synthesis engine

use anyhow::{anyhow, Result};
use clap::Parser;
use riff::config;
use riff::engine::{list_output_devices, CpalBackend, Engine, Player, Recorder, MAX_VOICES};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod cli;

use cli::{Cli, Commands};

/// A minor pentatonic phrase used by the play and record demos
const DEMO_NOTES: [f32; 5] = [220.0, 261.63, 293.66, 329.63, 392.0];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { config: config_path } => {
            println!("Loading configuration from {config_path:?}...");
            let cfg = config::load_config(&config_path)?;

            let engine = Arc::new(Engine::new(&cfg));
            let mut backend = CpalBackend::new(cfg.audio.device.clone(), cfg.audio.buffer_size);
            let faults = backend
                .faults()
                .ok_or_else(|| anyhow!("fault receiver already taken"))?;
            let mut player = Player::new(Arc::clone(&engine), backend);

            player.start()?;
            println!("Playing at {} Hz. Press Ctrl-C to stop.", engine.sample_rate());

            let running = Arc::new(AtomicBool::new(true));
            {
                let running = Arc::clone(&running);
                ctrlc::set_handler(move || {
                    running.store(false, Ordering::SeqCst);
                })?;
            }

            let mut step = 0usize;
            while running.load(Ordering::SeqCst) {
                let voice = step % MAX_VOICES;
                engine.note_on(voice, DEMO_NOTES[step % DEMO_NOTES.len()]);

                // Hold the note while watching for stream faults
                match faults.recv_timeout(Duration::from_millis(250)) {
                    Ok(reason) => {
                        eprintln!("Stream fault: {reason}");
                        player.on_stream_error_after_close(&reason)?;
                    }
                    Err(_) => {}
                }

                engine.note_off(voice);
                step += 1;
            }

            engine.all_notes_off();
            std::thread::sleep(Duration::from_millis(400)); // Let releases ring out
            player.stop();
            println!("\nStopped.");
        }

        Commands::Record {
            config: config_path,
            output,
            duration,
        } => {
            println!("Loading configuration from {config_path:?}...");
            let cfg = config::load_config(&config_path)?;

            println!("Rendering {duration} seconds to {output:?}...");

            let engine = Engine::new(&cfg);
            engine.start();

            let sample_rate = cfg.audio.sample_rate;
            let mut recorder = Recorder::new(&output, sample_rate)?;

            // One note per beat, cycling through the voice pool
            let beat_frames = (sample_rate / 2) as usize;
            let total_beats = duration * 2;

            for beat in 0..total_beats {
                let voice = (beat as usize) % MAX_VOICES;
                engine.note_on(voice, DEMO_NOTES[beat as usize % DEMO_NOTES.len()]);
                recorder.bounce(&engine, beat_frames)?;
                engine.note_off(voice);
            }

            // Tail for the final releases
            engine.all_notes_off();
            recorder.bounce(&engine, sample_rate as usize)?;

            recorder.finalize()?;
            println!("Recorded to {output:?}");
        }

        Commands::Devices => {
            println!("Available audio output devices:\n");

            let devices = list_output_devices();
            if devices.is_empty() {
                println!("  (none found)");
            }
            for (name, sample_rate) in devices {
                println!("  - {name} ({sample_rate} Hz)");
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {config_path:?}...");

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Master volume: {:.0}%", cfg.master.volume * 100.0);
                    println!("  Wave: {}", cfg.master.wave);
                    println!(
                        "  Envelope: A={}s D={}s S={} R={}s",
                        cfg.envelope.attack,
                        cfg.envelope.decay,
                        cfg.envelope.sustain,
                        cfg.envelope.release
                    );
                    println!(
                        "  Guitar: sustain={} gain={} distortion={} reverb={}",
                        cfg.guitar.sustain, cfg.guitar.gain, cfg.guitar.distortion, cfg.guitar.reverb
                    );
                    println!(
                        "  Wah: {}",
                        if cfg.wah.enabled { "enabled" } else { "disabled" }
                    );
                }
                Err(e) => {
                    println!("Configuration is invalid: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../riff.example.yaml");

            let path = "riff.yaml";
            if std::path::Path::new(path).exists() {
                println!("riff.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created riff.yaml with example configuration.");
            }
        }
    }

    Ok(())
}
