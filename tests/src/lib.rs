//! Host-based integration tests for Morse Mate
//!
//! Playback and challenge tests run on a paused tokio clock and record
//! tones through `ToneCapture`.

pub mod codec_properties;
pub mod playback_timing;
pub mod challenge_flow;
pub mod session_export;
pub mod app_flow;

use morse_core::{updates, AppState, MorseConfig, UiUpdate, UpdateReceiver};

/// Fresh state with default configuration
pub fn default_app() -> (AppState, UpdateReceiver) {
    let (tx, rx) = updates::channel();
    let app = AppState::new(MorseConfig::default(), tx).expect("default config is valid");
    (app, rx)
}

/// Everything currently queued on the update channel
pub fn drain(rx: &mut UpdateReceiver) -> Vec<UiUpdate> {
    let mut out = Vec::new();
    while let Ok(update) = rx.try_recv() {
        out.push(update);
    }
    out
}
