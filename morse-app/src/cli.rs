//! Command line arguments
//!
//! Priority: CLI args > env vars > config file > defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use morse_core::config::PlaybackConfig;

/// Morse Mate - learn Morse code by ear and by eye.
#[derive(Parser, Debug)]
#[command(name = "morse-mate", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Directory holding fun facts and documentation pages.
    #[arg(short = 'd', long = "docs-dir")]
    pub docs_dir: Option<PathBuf>,

    /// Ring the terminal bell for each tone.
    #[arg(long = "bell")]
    pub bell: bool,

    /// Do not open the audio device.
    #[arg(long = "mute")]
    pub mute: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Convert text to Morse.
    Encode {
        text: String,
        /// Play the result.
        #[arg(long)]
        play: bool,
    },
    /// Convert Morse to text.
    Decode { morse: String },
    /// Detect the direction and convert.
    Auto { input: String },
    /// Play a Morse string.
    Play { morse: String },
    /// Run one challenge round.
    Challenge {
        /// Seconds before the answer is revealed (5-30).
        #[arg(short = 't', long = "timer")]
        timer: Option<u32>,
    },
    /// Print a random fun fact.
    Fact,
    /// Print a documentation page.
    Doc { topic: String },
    /// Interactive session (default).
    Repl,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > MORSE_MATE_CONFIG env var > ~/.morse-mate/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("MORSE_MATE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log filter.
    ///
    /// Priority: --log-level flag > RUST_LOG > config file value.
    pub fn resolve_log_filter(&self, config_level: &str) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        if let Ok(filter) = std::env::var("RUST_LOG") {
            return filter;
        }
        config_level.to_string()
    }

    /// Apply the tone flags on top of the file settings.
    pub fn apply_tone_flags(&self, playback: &mut PlaybackConfig) {
        if self.bell {
            playback.bell = true;
        }
        if self.mute {
            playback.audio = false;
        }
    }
}

fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".morse-mate").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".morse-mate").join("config.toml");
    }
    PathBuf::from("config.toml")
}
