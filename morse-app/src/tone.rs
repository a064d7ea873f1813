//! Tone backends
//!
//! `SineTone` drives the default audio output device through cpal (with the
//! `audio` feature). `BellTone` rings the terminal bell and `SilentTone`
//! only tracks state, for sessions with no sound device.

use std::f32::consts::TAU;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use morse_core::config::PlaybackConfig;
use morse_core::{MorseError, Result, SilentTone, ToneOutput};
use tracing::{debug, trace, warn};

const BEL: &[u8] = b"\x07";
/// Peak sample value; leaves headroom below full scale
const AMPLITUDE: f32 = 0.25;

/// Frequency shared between the tone handle and the audio callback.
/// Zero means silence.
#[derive(Clone, Debug, Default)]
pub struct ToneSignal {
    frequency_hz: Arc<AtomicU32>,
}

impl ToneSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, frequency_hz: u32) {
        self.frequency_hz.store(frequency_hz, Ordering::Relaxed);
    }

    pub fn silence(&self) {
        self.set(0);
    }

    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz.load(Ordering::Relaxed)
    }
}

/// Phase-continuous sine generator
#[derive(Debug, Clone)]
pub struct SineOscillator {
    sample_rate: u32,
    phase: f32,
}

impl SineOscillator {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            phase: 0.0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Next sample at `frequency_hz`; zero restarts the phase and yields silence
    pub fn next_sample(&mut self, frequency_hz: u32) -> f32 {
        if frequency_hz == 0 {
            self.phase = 0.0;
            return 0.0;
        }
        let value = (self.phase * TAU).sin() * AMPLITUDE;
        self.phase = (self.phase + frequency_hz as f32 / self.sample_rate as f32).fract();
        value
    }

    /// Fill interleaved frames, the same value on every channel
    pub fn fill(&mut self, signal: &ToneSignal, data: &mut [f32], channels: usize) {
        let frequency_hz = signal.frequency_hz();
        for frame in data.chunks_mut(channels.max(1)) {
            let value = self.next_sample(frequency_hz);
            frame.iter_mut().for_each(|sample| *sample = value);
        }
    }
}

/// Sine tone on the default output device.
///
/// The stream runs for the life of the value and plays whatever frequency
/// the shared signal holds.
pub struct SineTone {
    signal: ToneSignal,
    #[cfg(feature = "audio")]
    _stream: Option<device::OutputStream>,
}

impl SineTone {
    /// Open the default output device
    #[cfg(feature = "audio")]
    pub fn open() -> Result<Self> {
        let signal = ToneSignal::new();
        let stream = device::open(signal.clone())?;
        Ok(Self {
            signal,
            _stream: Some(stream),
        })
    }

    #[cfg(not(feature = "audio"))]
    pub fn open() -> Result<Self> {
        Err(MorseError::Tone("built without the audio feature".into()))
    }

    /// A tone with no device attached; the signal can be rendered by hand
    pub fn detached() -> Self {
        Self {
            signal: ToneSignal::new(),
            #[cfg(feature = "audio")]
            _stream: None,
        }
    }

    pub fn signal(&self) -> &ToneSignal {
        &self.signal
    }
}

impl ToneOutput for SineTone {
    fn tone_on(&mut self, frequency_hz: u32) -> Result<()> {
        trace!(frequency_hz, "Sine on");
        self.signal.set(frequency_hz);
        Ok(())
    }

    fn tone_off(&mut self) -> Result<()> {
        self.signal.silence();
        Ok(())
    }

    fn is_sounding(&self) -> bool {
        self.signal.frequency_hz() != 0
    }
}

#[cfg(feature = "audio")]
mod device {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{FromSample, Sample, SizedSample};
    use morse_core::{MorseError, Result};
    use tracing::info;

    use super::{SineOscillator, ToneSignal};

    /// Keeps the cpal stream alive; dropping it stops output.
    pub(super) struct OutputStream(#[allow(dead_code)] cpal::Stream);

    // SAFETY: the stream handle is only held and dropped, never used to
    // share data; samples are produced on cpal's own audio thread from the
    // atomic `ToneSignal`.
    unsafe impl Send for OutputStream {}

    pub(super) fn open(signal: ToneSignal) -> Result<OutputStream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| MorseError::Tone("No default output device found".into()))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let supported = device
            .default_output_config()
            .map_err(|e| MorseError::Tone(format!("Failed to query output config: {e}")))?;
        let format = supported.sample_format();
        let config = supported.config();
        info!(
            device = %device_name,
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            format = ?format,
            "Audio output opened"
        );

        let stream = match format {
            cpal::SampleFormat::F32 => build::<f32>(&device, &config, signal),
            cpal::SampleFormat::I16 => build::<i16>(&device, &config, signal),
            cpal::SampleFormat::U16 => build::<u16>(&device, &config, signal),
            other => Err(MorseError::Tone(format!(
                "Unsupported sample format {other:?}"
            ))),
        }?;
        stream
            .play()
            .map_err(|e| MorseError::Tone(format!("Failed to start output stream: {e}")))?;
        Ok(OutputStream(stream))
    }

    fn build<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        signal: ToneSignal,
    ) -> Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let channels = config.channels as usize;
        let mut oscillator = SineOscillator::new(config.sample_rate.0);
        let mut scratch: Vec<f32> = Vec::new();

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    scratch.resize(data.len(), 0.0);
                    oscillator.fill(&signal, &mut scratch, channels);
                    for (out, value) in data.iter_mut().zip(&scratch) {
                        *out = T::from_sample(*value);
                    }
                },
                |err| tracing::error!("Audio output error: {}", err),
                None,
            )
            .map_err(|e| MorseError::Tone(format!("Failed to build output stream: {e}")))
    }
}

/// Rings the terminal bell at the start of every tone
#[derive(Debug)]
pub struct BellTone<W: Write + Send> {
    out: W,
    sounding: bool,
}

impl BellTone<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> BellTone<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sounding: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ToneOutput for BellTone<W> {
    fn tone_on(&mut self, frequency_hz: u32) -> Result<()> {
        trace!(frequency_hz, "Bell");
        self.out
            .write_all(BEL)
            .and_then(|()| self.out.flush())
            .map_err(|e| MorseError::Tone(e.to_string()))?;
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

/// Which backend playback should use
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ToneSettings {
    /// Try the audio device first
    pub audio: bool,
    /// Ring the bell when no audio device is used
    pub bell: bool,
}

impl ToneSettings {
    pub fn from_config(playback: &PlaybackConfig) -> Self {
        Self {
            audio: playback.audio,
            bell: playback.bell,
        }
    }
}

/// Pick the backend for one playback: the audio device when enabled and
/// available, then the bell, then silence.
pub fn make_tone(settings: ToneSettings) -> Box<dyn ToneOutput> {
    if settings.audio && cfg!(feature = "audio") {
        match SineTone::open() {
            Ok(tone) => return Box::new(tone),
            Err(e) => warn!(error = %e, "Audio output unavailable"),
        }
    }
    if settings.bell {
        debug!("Using terminal bell");
        Box::new(BellTone::stdout())
    } else {
        Box::new(SilentTone::new())
    }
}
