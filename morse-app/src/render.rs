//! Text rendering of the playback pattern

use morse_core::{LayoutRect, PlaybackUpdate};

/// Layout pixels per terminal column
const PIXELS_PER_COLUMN: u32 = 10;
const LIT: char = '█';
const UNLIT: char = '░';

/// Draw the pattern with the first `lit` elements highlighted
pub fn render_pattern(layout: &[LayoutRect], lit: usize) -> String {
    let Some(last) = layout.last() else {
        return String::new();
    };
    let columns = (last.x.saturating_add(last.width) / PIXELS_PER_COLUMN) as usize;
    let mut row = vec![' '; columns];
    for (i, rect) in layout.iter().enumerate() {
        let fill = if i < lit { LIT } else { UNLIT };
        let start = (rect.x / PIXELS_PER_COLUMN) as usize;
        let end = (rect.x.saturating_add(rect.width) / PIXELS_PER_COLUMN) as usize;
        for cell in &mut row[start..end.min(columns)] {
            *cell = fill;
        }
    }
    row.into_iter().collect::<String>().trim_end().to_string()
}

/// Current pattern and how far playback has got
#[derive(Debug, Default)]
pub struct PatternView {
    layout: Vec<LayoutRect>,
    lit: usize,
}

impl PatternView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a playback update; returns the redrawn pattern
    pub fn apply(&mut self, update: &PlaybackUpdate) -> Option<String> {
        match update {
            PlaybackUpdate::Started { layout, .. } => {
                self.layout = layout.clone();
                self.lit = 0;
            }
            PlaybackUpdate::Highlight { index } => {
                self.lit = self.lit.max(index + 1);
            }
            PlaybackUpdate::Finished | PlaybackUpdate::Failed { .. } => return None,
        }
        Some(render_pattern(&self.layout, self.lit))
    }
}
