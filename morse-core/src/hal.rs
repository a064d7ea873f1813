//! Tone output abstraction
//!
//! The sequencer only switches a tone on and off; timing is done by the
//! caller. Backends live in the application crate.

use crate::error::Result;

/// Trait for tone generators
pub trait ToneOutput: Send {
    /// Start sounding at the given (already clamped) frequency
    fn tone_on(&mut self, frequency_hz: u32) -> Result<()>;

    /// Stop sounding
    fn tone_off(&mut self) -> Result<()>;

    /// Whether a tone is currently sounding
    fn is_sounding(&self) -> bool;
}

impl<T: ToneOutput + ?Sized> ToneOutput for Box<T> {
    fn tone_on(&mut self, frequency_hz: u32) -> Result<()> {
        (**self).tone_on(frequency_hz)
    }

    fn tone_off(&mut self) -> Result<()> {
        (**self).tone_off()
    }

    fn is_sounding(&self) -> bool {
        (**self).is_sounding()
    }
}

/// Backend that produces no sound, only tracks on/off state
#[derive(Debug, Default)]
pub struct SilentTone {
    sounding: bool,
}

impl SilentTone {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToneOutput for SilentTone {
    fn tone_on(&mut self, _frequency_hz: u32) -> Result<()> {
        self.sounding = true;
        Ok(())
    }

    fn tone_off(&mut self) -> Result<()> {
        self.sounding = false;
        Ok(())
    }

    fn is_sounding(&self) -> bool {
        self.sounding
    }
}
