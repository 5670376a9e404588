//! CLI interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Real-time polyphonic synthesis engine
#[derive(Parser)]
#[command(name = "riff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a demo phrase in real time until interrupted
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "riff.yaml")]
        config: PathBuf,
    },

    /// Render a demo phrase to a WAV file
    Record {
        /// Configuration file path
        #[arg(short, long, default_value = "riff.yaml")]
        config: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "10")]
        duration: u64,
    },

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "riff.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}
