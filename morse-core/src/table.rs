//! Bidirectional character/Morse symbol table

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{MorseError, Result};
use crate::types::{DEFAULT_SEPARATOR, UNKNOWN_MARKER};

#[rustfmt::skip]
const STANDARD_CODES: [(char, &str); 36] = [
    ('A', ".-"), ('B', "-..."), ('C', "-.-."), ('D', "-.."), ('E', "."),
    ('F', "..-."), ('G', "--."), ('H', "...."), ('I', ".."), ('J', ".---"),
    ('K', "-.-"), ('L', ".-.."), ('M', "--"), ('N', "-."), ('O', "---"),
    ('P', ".--."), ('Q', "--.-"), ('R', ".-."), ('S', "..."), ('T', "-"),
    ('U', "..-"), ('V', "...-"), ('W', ".--"), ('X', "-..-"), ('Y', "-.--"),
    ('Z', "--.."), ('1', ".----"), ('2', "..---"), ('3', "...--"),
    ('4', "....-"), ('5', "....."), ('6', "-...."), ('7', "--..."),
    ('8', "---.."), ('9', "----."), ('0', "-----"),
];

/// What to do when a new mapping collides with an existing one
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum MappingPolicy {
    /// Refuse the update
    #[default]
    Reject,
    /// Overwrite, dropping whatever the old entries pointed at
    Replace,
}

/// Character to Morse code mapping.
///
/// Letters and digits map to dot/dash strings and the reverse lookup
/// recovers the character. Space maps to the word separator, which is
/// never a valid letter code.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    forward: HashMap<char, String>,
    reverse: HashMap<String, char>,
    separator: char,
    separator_code: String,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// International Morse table for A-Z and 0-9
    pub fn new() -> Self {
        let forward: HashMap<char, String> = STANDARD_CODES
            .iter()
            .map(|&(c, code)| (c, code.to_string()))
            .collect();
        let reverse = STANDARD_CODES
            .iter()
            .map(|&(c, code)| (code.to_string(), c))
            .collect();
        Self {
            forward,
            reverse,
            separator: DEFAULT_SEPARATOR,
            separator_code: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Standard table using a custom word separator
    pub fn with_separator(separator: char) -> Result<Self> {
        let mut table = Self::new();
        table.set_separator(separator)?;
        Ok(table)
    }

    /// Current word separator
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Change the word separator.
    ///
    /// Dots, dashes, whitespace, letters, digits, the unknown marker and any
    /// character that already has a code are refused.
    pub fn set_separator(&mut self, separator: char) -> Result<()> {
        if matches!(separator, '.' | '-' | UNKNOWN_MARKER)
            || separator.is_whitespace()
            || separator.is_alphanumeric()
            || self.forward.contains_key(&separator)
        {
            return Err(MorseError::InvalidSeparator(separator));
        }
        debug!(%separator, "Word separator changed");
        self.separator = separator;
        self.separator_code = separator.to_string();
        Ok(())
    }

    /// Morse code for a character; space yields the word separator
    pub fn code_for(&self, c: char) -> Option<&str> {
        if c == ' ' {
            return Some(&self.separator_code);
        }
        self.forward.get(&c).map(String::as_str)
    }

    /// Character for a letter code
    pub fn char_for(&self, code: &str) -> Option<char> {
        self.reverse.get(code).copied()
    }

    /// Number of letter entries (space excluded)
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Letter entries sorted by character
    pub fn entries(&self) -> Vec<(char, &str)> {
        let mut entries: Vec<_> = self
            .forward
            .iter()
            .map(|(c, code)| (*c, code.as_str()))
            .collect();
        entries.sort_unstable_by_key(|(c, _)| *c);
        entries
    }

    /// Add or change a mapping.
    ///
    /// The key is uppercased. The code must be a non-empty run of dots and
    /// dashes. With `MappingPolicy::Reject` any collision with an existing
    /// key or code fails; with `Replace` the stale entries are removed so
    /// the table stays one-to-one.
    pub fn insert(&mut self, key: char, code: &str, policy: MappingPolicy) -> Result<()> {
        let key = key.to_uppercase().next().unwrap_or(key);
        if key.is_whitespace() {
            return Err(MorseError::ReservedSymbol(format!("{key:?}")));
        }
        if key == self.separator || key == UNKNOWN_MARKER {
            return Err(MorseError::ReservedSymbol(key.to_string()));
        }

        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c == '.' || c == '-') {
            return Err(MorseError::InvalidSymbol(code.to_string()));
        }

        if self.forward.get(&key).map(String::as_str) == Some(code) {
            return Ok(());
        }

        if policy == MappingPolicy::Reject {
            if let Some(&existing) = self.reverse.get(code) {
                return Err(MorseError::CodeCollision {
                    code: code.to_string(),
                    existing,
                });
            }
            if let Some(existing) = self.forward.get(&key) {
                return Err(MorseError::KeyCollision {
                    key,
                    existing: existing.clone(),
                });
            }
        }

        if let Some(old_code) = self.forward.remove(&key) {
            self.reverse.remove(&old_code);
        }
        if let Some(old_key) = self.reverse.remove(code) {
            self.forward.remove(&old_key);
        }

        self.forward.insert(key, code.to_string());
        self.reverse.insert(code.to_string(), key);
        info!(%key, code, "Mapping added");
        Ok(())
    }
}
