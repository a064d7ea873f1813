//! # Morse Core
//!
//! Text/Morse codec, timed playback sequencer, challenge rounds and the
//! session log behind Morse Mate. Front ends own an [`AppState`] and drain
//! the [`updates`] channel on their interactive task.

pub mod types;
pub mod error;
pub mod table;
pub mod codec;
pub mod hal;
pub mod controller;
pub mod updates;
pub mod sequencer;
pub mod challenge;
pub mod session;
pub mod docs;
pub mod config;
pub mod app;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use types::*;
pub use error::{MorseError, Result};
pub use table::{MappingPolicy, SymbolTable};
pub use codec::{decode, encode, looks_like_morse, MorseString, SymbolStats};
pub use hal::{SilentTone, ToneOutput};
pub use controller::{PlaybackGuard, PlaybackPermit};
pub use updates::{ChallengeUpdate, PlaybackUpdate, UiUpdate, UpdateReceiver, UpdateSender};
pub use sequencer::{LayoutRect, PlaybackStep, Sequencer};
pub use challenge::{ChallengePhase, ChallengeRound, ChallengeToken, CountdownSecs};
pub use session::{ExportFormat, SessionLog};
pub use docs::{DocLibrary, DocTopic};
pub use config::MorseConfig;
pub use app::{AppState, Conversion, Direction};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
