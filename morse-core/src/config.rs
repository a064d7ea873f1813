//! TOML configuration

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::challenge::{CountdownSecs, DEFAULT_COUNTDOWN_SECS};
use crate::error::{MorseError, Result};
use crate::table::{MappingPolicy, SymbolTable};
use crate::types::{SpeedPreset, TimingProfile, DEFAULT_FREQUENCY_HZ, DEFAULT_SEPARATOR};

/// Top-level configuration.
///
/// Loaded from `~/.morse-mate/config.toml` by default; every section is
/// optional and falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MorseConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub challenge: ChallengeConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    /// Extra character mappings, e.g. `"!" = "-.-.--"`
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

impl MorseConfig {
    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MorseConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load, falling back to defaults when the file is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check value ranges and that the mappings apply cleanly
    pub fn validate(&self) -> Result<()> {
        if self.playback.dot_ms == 0 || self.playback.dash_ms == 0 {
            return Err(MorseError::Config(
                "dot and dash durations must be non-zero".into(),
            ));
        }
        CountdownSecs::new(self.challenge.countdown_secs)?;
        self.symbol_table()?;
        Ok(())
    }

    /// Timing for playback; a preset overrides the explicit durations
    pub fn timing(&self) -> TimingProfile {
        match self.playback.preset {
            Some(preset) => TimingProfile::from_preset(preset, self.playback.frequency_hz),
            None => TimingProfile::new(
                self.playback.dot_ms,
                self.playback.dash_ms,
                self.playback.frequency_hz,
            ),
        }
    }

    pub fn countdown(&self) -> Result<CountdownSecs> {
        CountdownSecs::new(self.challenge.countdown_secs)
    }

    /// Standard table with the configured separator and extra mappings.
    /// Extra mappings may not collide with existing ones.
    pub fn symbol_table(&self) -> Result<SymbolTable> {
        let mut table = SymbolTable::with_separator(self.codec.word_separator)?;
        for (key, code) in &self.mappings {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(MorseError::Config(format!(
                    "mapping key must be a single character: {key:?}"
                )));
            };
            table.insert(c, code, MappingPolicy::Reject)?;
        }
        Ok(table)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Directory holding fun facts and documentation pages.
    pub docs_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            docs_dir: "docs".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Speed preset; when set, overrides `dot_ms` and `dash_ms`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<SpeedPreset>,
    pub dot_ms: u64,
    pub dash_ms: u64,
    /// Tone frequency; clamped to [37, 32767] at playback time.
    pub frequency_hz: u32,
    /// Play tones through the default audio output device.
    pub audio: bool,
    /// Ring the terminal bell on each tone when no audio device is used.
    pub bell: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        let (dot_ms, dash_ms) = SpeedPreset::Normal.durations_ms();
        Self {
            preset: None,
            dot_ms,
            dash_ms,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            audio: true,
            bell: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Seconds before the answer is revealed, 5 to 30.
    pub countdown_secs: u32,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Play every text to Morse conversion.
    pub autoplay: bool,
    /// Treat plain REPL input as an auto-detected conversion.
    pub autoconvert: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub word_separator: char,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            word_separator: DEFAULT_SEPARATOR,
        }
    }
}
