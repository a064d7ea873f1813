//! Core data types for Morse playback

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MorseError;

/// Lowest tone frequency accepted by the tone generator
pub const MIN_FREQUENCY_HZ: u32 = 37;
/// Highest tone frequency accepted by the tone generator
pub const MAX_FREQUENCY_HZ: u32 = 32_767;
/// Default tone frequency
pub const DEFAULT_FREQUENCY_HZ: u32 = 750;
/// Pause between letters of a word
pub const LETTER_GAP_MS: u64 = 200;
/// Pause at a word separator
pub const WORD_GAP_MS: u64 = 600;
/// Default word separator
pub const DEFAULT_SEPARATOR: char = '/';
/// Marker emitted for characters and symbols missing from the table
pub const UNKNOWN_MARKER: char = '?';

/// Morse playback elements
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Element {
    /// Short tone
    Dot,
    /// Long tone
    Dash,
    /// Pause between letters
    LetterGap,
    /// Pause between words
    WordGap,
}

impl Element {
    /// Classify one character of a Morse string.
    /// Returns `None` for characters that play nothing (e.g. the `?` marker).
    pub fn from_symbol(symbol: char, separator: char) -> Option<Element> {
        match symbol {
            '.' => Some(Element::Dot),
            '-' => Some(Element::Dash),
            ' ' => Some(Element::LetterGap),
            s if s == separator => Some(Element::WordGap),
            _ => None,
        }
    }

    /// Returns true if this element produces a tone
    pub const fn is_keyed(&self) -> bool {
        match self {
            Element::Dot | Element::Dash => true,
            Element::LetterGap | Element::WordGap => false,
        }
    }

    /// How long this element lasts under the given profile
    pub fn duration_ms(&self, timing: &TimingProfile) -> u64 {
        match self {
            Element::Dot => timing.dot_ms,
            Element::Dash => timing.dash_ms,
            Element::LetterGap => LETTER_GAP_MS,
            Element::WordGap => WORD_GAP_MS,
        }
    }
}

/// Clamp a requested frequency into the range the tone generator accepts
pub fn clamp_frequency(hz: u32) -> u32 {
    hz.clamp(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ)
}

/// Playback speed presets
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPreset {
    Slow,
    Normal,
    Fast,
}

impl SpeedPreset {
    /// Dot and dash durations in milliseconds
    pub const fn durations_ms(&self) -> (u64, u64) {
        match self {
            SpeedPreset::Slow => (300, 900),
            SpeedPreset::Normal => (200, 600),
            SpeedPreset::Fast => (100, 300),
        }
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedPreset::Slow => write!(f, "slow"),
            SpeedPreset::Normal => write!(f, "normal"),
            SpeedPreset::Fast => write!(f, "fast"),
        }
    }
}

impl FromStr for SpeedPreset {
    type Err = MorseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(SpeedPreset::Slow),
            "normal" => Ok(SpeedPreset::Normal),
            "fast" => Ok(SpeedPreset::Fast),
            other => Err(MorseError::Config(format!("unknown speed preset: {other}"))),
        }
    }
}

/// Timing parameters for one playback
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TimingProfile {
    /// Dot tone length in milliseconds
    pub dot_ms: u64,
    /// Dash tone length in milliseconds
    pub dash_ms: u64,
    /// Tone frequency, always within [MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ]
    frequency_hz: u32,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::from_preset(SpeedPreset::Normal, DEFAULT_FREQUENCY_HZ)
    }
}

impl TimingProfile {
    /// Create a profile; an out-of-range frequency is clamped, not rejected
    pub fn new(dot_ms: u64, dash_ms: u64, frequency_hz: u32) -> Self {
        Self {
            dot_ms,
            dash_ms,
            frequency_hz: clamp_frequency(frequency_hz),
        }
    }

    /// Create a profile from a speed preset
    pub fn from_preset(preset: SpeedPreset, frequency_hz: u32) -> Self {
        let (dot_ms, dash_ms) = preset.durations_ms();
        Self::new(dot_ms, dash_ms, frequency_hz)
    }

    /// Tone frequency in Hz
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }
}
