use thiserror::Error;

/// Error type for Morse Mate operations.
///
/// Encoding and decoding never fail; these variants cover configuration,
/// file I/O, table updates and the playback guard.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MorseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Playback or challenge already in progress")]
    Busy,

    #[error("Code {code} is already mapped to '{existing}'")]
    CodeCollision { code: String, existing: char },

    #[error("'{key}' is already mapped to {existing}")]
    KeyCollision { key: char, existing: String },

    #[error("Reserved symbol cannot be remapped: {0}")]
    ReservedSymbol(String),

    #[error("Invalid Morse symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Invalid word separator: {0:?}")]
    InvalidSeparator(char),

    #[error("Tone output error: {0}")]
    Tone(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Unknown documentation topic: {0}")]
    UnknownTopic(String),
}

impl From<toml::de::Error> for MorseError {
    fn from(err: toml::de::Error) -> Self {
        MorseError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MorseError {
    fn from(err: toml::ser::Error) -> Self {
        MorseError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MorseError {
    fn from(err: serde_json::Error) -> Self {
        MorseError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Morse Mate operations.
pub type Result<T> = std::result::Result<T, MorseError>;
