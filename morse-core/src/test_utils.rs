//! Test utilities: tone capture and timing analysis

use std::sync::{Arc, Mutex};

use tokio::time::{Duration, Instant};

use crate::error::{MorseError, Result};
use crate::hal::ToneOutput;

/// One captured tone
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSpan {
    pub frequency_hz: u32,
    pub start: Instant,
    pub duration: Duration,
}

#[derive(Debug, Default)]
struct CaptureInner {
    spans: Vec<ToneSpan>,
    current: Option<(u32, Instant)>,
    fail_after: Option<usize>,
}

/// Tone backend that records every tone with tokio timestamps.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// sequencer owns the other.
#[derive(Debug, Clone, Default)]
pub struct ToneCapture {
    inner: Arc<Mutex<CaptureInner>>,
}

impl ToneCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `tone_on` fail once `count` tones have been captured
    pub fn fail_after(count: usize) -> Self {
        let capture = Self::new();
        capture.inner.lock().unwrap().fail_after = Some(count);
        capture
    }

    /// All completed tones
    pub fn spans(&self) -> Vec<ToneSpan> {
        self.inner.lock().unwrap().spans.clone()
    }

    /// Rebuild dots and dashes: tones shorter than `threshold` are dots
    pub fn to_symbols(&self, threshold: Duration) -> String {
        self.spans()
            .iter()
            .map(|span| if span.duration < threshold { '.' } else { '-' })
            .collect()
    }

    /// Gaps between the end of one tone and the start of the next
    pub fn gaps(&self) -> Vec<Duration> {
        let spans = self.spans();
        spans
            .windows(2)
            .map(|pair| pair[1].start.duration_since(pair[0].start + pair[0].duration))
            .collect()
    }

    /// Total time from first tone start to last tone end
    pub fn total_span(&self) -> Duration {
        let spans = self.spans();
        match (spans.first(), spans.last()) {
            (Some(first), Some(last)) => (last.start + last.duration).duration_since(first.start),
            _ => Duration::ZERO,
        }
    }
}

impl ToneOutput for ToneCapture {
    fn tone_on(&mut self, frequency_hz: u32) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_after.is_some_and(|limit| inner.spans.len() >= limit) {
            return Err(MorseError::Tone("capture limit reached".into()));
        }
        inner.current = Some((frequency_hz, Instant::now()));
        Ok(())
    }

    fn tone_off(&mut self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some((frequency_hz, start)) = inner.current.take() {
            inner.spans.push(ToneSpan {
                frequency_hz,
                start,
                duration: Instant::now().duration_since(start),
            });
        }
        Ok(())
    }

    fn is_sounding(&self) -> bool {
        self.inner.lock().unwrap().current.is_some()
    }
}
