//! Playback sequencer: turns a Morse string into timed tones and highlights

use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::controller::PlaybackPermit;
use crate::error::Result;
use crate::hal::ToneOutput;
use crate::types::{Element, TimingProfile};
use crate::updates::{PlaybackUpdate, UiUpdate, UpdateSender};

const LAYOUT_START_X: u32 = 10;
const LAYOUT_TOP: u32 = 10;
const LAYOUT_HEIGHT: u32 = 30;
const DOT_WIDTH: u32 = 20;
const DOT_ADVANCE: u32 = 30;
const DASH_WIDTH: u32 = 50;
const DASH_ADVANCE: u32 = 60;
const WORD_GAP_ADVANCE: u32 = 30;
const LETTER_GAP_ADVANCE: u32 = 10;

/// One drawn rectangle of the visual pattern
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayoutRect {
    pub element: Element,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One step of a playback plan
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlaybackStep {
    pub element: Element,
    pub duration_ms: u64,
    /// Layout index highlighted while this step sounds
    pub highlight: Option<usize>,
}

/// Compute the visual pattern. Only dots and dashes are drawn; gaps move
/// the cursor.
pub fn layout(morse: &str, separator: char) -> Vec<LayoutRect> {
    let mut rects = Vec::new();
    let mut x = LAYOUT_START_X;
    for element in morse.chars().filter_map(|c| Element::from_symbol(c, separator)) {
        let (width, advance) = match element {
            Element::Dot => (DOT_WIDTH, DOT_ADVANCE),
            Element::Dash => (DASH_WIDTH, DASH_ADVANCE),
            Element::WordGap => (0, WORD_GAP_ADVANCE),
            Element::LetterGap => (0, LETTER_GAP_ADVANCE),
        };
        if element.is_keyed() {
            rects.push(LayoutRect {
                element,
                x,
                y: LAYOUT_TOP,
                width,
                height: LAYOUT_HEIGHT,
            });
        }
        x = advance_cursor(x, advance);
    }
    rects
}

/// Move the drawing cursor; pinned at the far edge for very long input
const fn advance_cursor(x: u32, by: u32) -> u32 {
    x.saturating_add(by)
}

/// Compute the timed steps for a Morse string
pub fn plan(morse: &str, timing: &TimingProfile, separator: char) -> Vec<PlaybackStep> {
    let mut next_highlight = 0;
    morse
        .chars()
        .filter_map(|c| Element::from_symbol(c, separator))
        .map(|element| {
            let highlight = element.is_keyed().then(|| {
                next_highlight += 1;
                next_highlight - 1
            });
            PlaybackStep {
                element,
                duration_ms: element.duration_ms(timing),
                highlight,
            }
        })
        .collect()
}

/// Total playback time of a plan in milliseconds
pub fn total_duration_ms(steps: &[PlaybackStep]) -> u64 {
    steps.iter().map(|step| step.duration_ms).sum()
}

/// Run a plan against a tone output, reporting highlights as they happen
pub async fn play<T: ToneOutput + ?Sized>(
    steps: &[PlaybackStep],
    frequency_hz: u32,
    tone: &mut T,
    updates: &UpdateSender,
) -> Result<()> {
    for step in steps {
        let duration = Duration::from_millis(step.duration_ms);
        if let Some(index) = step.highlight {
            debug!(index, element = ?step.element, ms = step.duration_ms, "Tone");
            updates
                .send(UiUpdate::Playback(PlaybackUpdate::Highlight { index }))
                .ok();

            tone.tone_on(frequency_hz)?;
            sleep(duration).await;
            tone.tone_off()?;
        } else {
            sleep(duration).await;
        }
    }
    Ok(())
}

/// Playback front end holding the timing for one invocation
#[derive(Copy, Clone, Debug)]
pub struct Sequencer {
    timing: TimingProfile,
    separator: char,
}

impl Sequencer {
    pub fn new(timing: TimingProfile, separator: char) -> Self {
        Self { timing, separator }
    }

    pub fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    /// Lay out the pattern and report it, then play on a background task.
    ///
    /// The layout is sent before this returns. The permit is released when
    /// the task finishes, whether or not playback succeeded.
    pub fn spawn<T>(
        &self,
        morse: &str,
        mut tone: T,
        updates: UpdateSender,
        permit: PlaybackPermit,
    ) -> JoinHandle<Result<()>>
    where
        T: ToneOutput + 'static,
    {
        let steps = self.start(morse, &updates);
        let frequency_hz = self.timing.frequency_hz();

        tokio::spawn(async move {
            let _permit = permit;
            run_reporting(&steps, frequency_hz, &mut tone, &updates).await
        })
    }

    /// Lay out and report a pattern, returning its steps
    pub(crate) fn start(&self, morse: &str, updates: &UpdateSender) -> Vec<PlaybackStep> {
        let layout = layout(morse, self.separator);
        let steps = plan(morse, &self.timing, self.separator);
        let total_ms = total_duration_ms(&steps);
        info!(
            elements = layout.len(),
            total_ms,
            frequency_hz = self.timing.frequency_hz(),
            "Playback started"
        );
        updates
            .send(UiUpdate::Playback(PlaybackUpdate::Started { layout, total_ms }))
            .ok();
        steps
    }
}

/// Play and send the terminal `Finished`/`Failed` update
pub(crate) async fn run_reporting<T: ToneOutput + ?Sized>(
    steps: &[PlaybackStep],
    frequency_hz: u32,
    tone: &mut T,
    updates: &UpdateSender,
) -> Result<()> {
    let result = play(steps, frequency_hz, tone, updates).await;
    let update = match &result {
        Ok(()) => PlaybackUpdate::Finished,
        Err(e) => {
            warn!(error = %e, "Playback aborted");
            tone.tone_off().ok();
            PlaybackUpdate::Failed {
                reason: e.to_string(),
            }
        }
    };
    updates.send(UiUpdate::Playback(update)).ok();
    result
}
