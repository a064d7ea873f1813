//! Single-flight guard for playback and challenge tasks

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{MorseError, Result};

/// Allows at most one playback or challenge at a time.
///
/// Cloning shares the same flag. A second request while a permit is
/// outstanding is rejected rather than queued.
#[derive(Debug, Clone, Default)]
pub struct PlaybackGuard {
    busy: Arc<AtomicBool>,
}

impl PlaybackGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the permit, or fail with `MorseError::Busy`
    pub fn try_acquire(&self) -> Result<PlaybackPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| PlaybackPermit {
                busy: Arc::clone(&self.busy),
            })
            .map_err(|_| MorseError::Busy)
    }

    /// Whether a permit is currently held
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the lifetime of one background task; released on drop
#[derive(Debug)]
pub struct PlaybackPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for PlaybackPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
