//! Text to Morse conversion and back
//!
//! Both directions are total: anything the table does not know becomes
//! the `?` marker instead of an error.

use core::fmt;

use crate::table::SymbolTable;
use crate::types::UNKNOWN_MARKER;

/// Encoded Morse text.
///
/// Letter codes are separated by single spaces and a word boundary is the
/// separator standing as its own token, e.g. `".... .. / - .... . .-. ."`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MorseString(String);

impl MorseString {
    /// Wrap text that is already in Morse notation
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Character-reversed copy, used for reverse playback
    pub fn reversed(&self) -> MorseString {
        MorseString(self.0.chars().rev().collect())
    }
}

impl fmt::Display for MorseString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MorseString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MorseString {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Encode text. Input is uppercased; unmapped characters become `?`.
pub fn encode(table: &SymbolTable, text: &str) -> MorseString {
    let mut out = String::with_capacity(text.len() * 4);
    for c in text.chars().flat_map(char::to_uppercase) {
        if !out.is_empty() {
            out.push(' ');
        }
        match table.code_for(c) {
            Some(code) => out.push_str(code),
            None => out.push(UNKNOWN_MARKER),
        }
    }
    MorseString(out)
}

/// Decode Morse text. Unknown letter codes become `?`.
pub fn decode(table: &SymbolTable, morse: &str) -> String {
    morse
        .trim()
        .split(table.separator())
        .map(|word| {
            word.split_whitespace()
                .map(|letter| table.char_for(letter).unwrap_or(UNKNOWN_MARKER))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the input contains only dots, dashes, whitespace and the separator
pub fn looks_like_morse(input: &str, separator: char) -> bool {
    input
        .chars()
        .all(|c| c == '.' || c == '-' || c == separator || c.is_whitespace())
}

/// Dot and dash counts over a piece of text
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolStats {
    pub dots: usize,
    pub dashes: usize,
}

impl SymbolStats {
    pub fn count(text: &str) -> Self {
        text.chars().fold(Self::default(), |mut stats, c| {
            match c {
                '.' => stats.dots += 1,
                '-' => stats.dashes += 1,
                _ => {}
            }
            stats
        })
    }
}

impl fmt::Display for SymbolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dots: {}\nDashes: {}", self.dots, self.dashes)
    }
}
