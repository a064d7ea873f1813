//! Messages from background tasks to the interactive context
//!
//! Playback and challenge tasks never touch the session log or the display;
//! they send these over an unbounded channel and the interactive side
//! applies them.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::sequencer::LayoutRect;

/// Progress of one playback
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackUpdate {
    /// Layout computed; nothing is highlighted yet
    Started { layout: Vec<LayoutRect>, total_ms: u64 },
    /// Layout element `index` is now sounding
    Highlight { index: usize },
    /// Every element played
    Finished,
    /// Tone output failed part way
    Failed { reason: String },
}

/// Progress of one challenge round
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChallengeUpdate {
    /// Token generated and encoded
    Generated { morse: String },
    /// Countdown tick; `remaining` seconds left before the reveal
    Tick { morse: String, remaining: u32 },
    /// Countdown reached zero
    Revealed { answer: String },
}

impl ChallengeUpdate {
    /// Text shown on the prompt line
    pub fn prompt(&self) -> String {
        match self {
            ChallengeUpdate::Generated { morse } => morse.clone(),
            ChallengeUpdate::Tick { morse, remaining } => {
                format!("{morse} | Answer in: {remaining}s")
            }
            ChallengeUpdate::Revealed { answer } => format!("🎉 Answer: {answer} 🎉"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiUpdate {
    Playback(PlaybackUpdate),
    Challenge(ChallengeUpdate),
}

pub type UpdateSender = UnboundedSender<UiUpdate>;
pub type UpdateReceiver = UnboundedReceiver<UiUpdate>;

/// Create the update channel
pub fn channel() -> (UpdateSender, UpdateReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}
