//! Application state shared by every front end
//!
//! All mutable state lives here and is touched only from the interactive
//! context. Background tasks report back through `UiUpdate`s which the
//! owner feeds to [`AppState::apply`].

use core::fmt;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::challenge::{generate_token, spawn_challenge, ChallengeRound, CountdownSecs};
use crate::codec::{self, MorseString, SymbolStats};
use crate::config::MorseConfig;
use crate::controller::PlaybackGuard;
use crate::docs::DocLibrary;
use crate::error::Result;
use crate::hal::ToneOutput;
use crate::sequencer::Sequencer;
use crate::session::SessionLog;
use crate::table::{MappingPolicy, SymbolTable};
use crate::types::{SpeedPreset, TimingProfile};
use crate::updates::{ChallengeUpdate, UiUpdate, UpdateSender};

/// Which way a conversion went
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Direction {
    TextToMorse,
    MorseToText,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::TextToMorse => write!(f, "Text→Morse"),
            Direction::MorseToText => write!(f, "Morse→Text"),
        }
    }
}

/// Result of an auto-detected conversion
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Conversion {
    pub direction: Direction,
    pub output: String,
}

pub struct AppState {
    config: MorseConfig,
    table: SymbolTable,
    timing: TimingProfile,
    countdown: CountdownSecs,
    log: SessionLog,
    docs: DocLibrary,
    guard: PlaybackGuard,
    updates: UpdateSender,
    output: String,
}

impl AppState {
    /// Build state from a configuration. Fails if the configuration does
    /// not validate.
    pub fn new(config: MorseConfig, updates: UpdateSender) -> Result<Self> {
        config.validate()?;
        let table = config.symbol_table()?;
        let timing = config.timing();
        let countdown = config.countdown()?;
        let docs = DocLibrary::new(&config.general.docs_dir);
        Ok(Self {
            config,
            table,
            timing,
            countdown,
            log: SessionLog::new(),
            docs,
            guard: PlaybackGuard::new(),
            updates,
            output: String::new(),
        })
    }

    pub fn config(&self) -> &MorseConfig {
        &self.config
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    pub fn countdown(&self) -> CountdownSecs {
        self.countdown
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Mutable log access for load and save
    pub fn log_mut(&mut self) -> &mut SessionLog {
        &mut self.log
    }

    pub fn docs(&self) -> &DocLibrary {
        &self.docs
    }

    /// Last text shown on the output line
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn autoplay(&self) -> bool {
        self.config.session.autoplay
    }

    pub fn set_autoplay(&mut self, enabled: bool) {
        self.config.session.autoplay = enabled;
    }

    pub fn autoconvert(&self) -> bool {
        self.config.session.autoconvert
    }

    pub fn set_autoconvert(&mut self, enabled: bool) {
        self.config.session.autoconvert = enabled;
    }

    pub fn convert_to_morse(&mut self, text: &str) -> MorseString {
        let morse = codec::encode(&self.table, text.trim());
        self.log.append(format!("{}: {}", Direction::TextToMorse, morse));
        self.output = morse.to_string();
        morse
    }

    pub fn convert_to_text(&mut self, morse: &str) -> String {
        let text = codec::decode(&self.table, morse);
        self.log.append(format!("{}: {}", Direction::MorseToText, text));
        self.output = text.clone();
        text
    }

    /// Decode if the input looks like Morse, encode otherwise
    pub fn auto_convert(&mut self, input: &str) -> Conversion {
        let input = input.trim();
        let (direction, output) = if codec::looks_like_morse(input, self.table.separator()) {
            (Direction::MorseToText, codec::decode(&self.table, input))
        } else {
            (
                Direction::TextToMorse,
                codec::encode(&self.table, input).into_string(),
            )
        };
        debug!(%direction, "Auto conversion");
        self.log.append(format!("Auto: {direction}: {output}"));
        self.output = output.clone();
        Conversion { direction, output }
    }

    /// Play a Morse string on a background task.
    ///
    /// Fails with `MorseError::Busy` while another playback or challenge
    /// is running.
    pub fn play<T>(&self, morse: &str, tone: T) -> Result<JoinHandle<Result<()>>>
    where
        T: ToneOutput + 'static,
    {
        let permit = self.guard.try_acquire()?;
        let sequencer = Sequencer::new(self.timing, self.table.separator());
        Ok(sequencer.spawn(morse, tone, self.updates.clone(), permit))
    }

    /// Play the current output backwards
    pub fn play_reverse<T>(&self, tone: T) -> Result<JoinHandle<Result<()>>>
    where
        T: ToneOutput + 'static,
    {
        let reversed = MorseString::new(self.output.as_str()).reversed();
        self.play(reversed.as_str(), tone)
    }

    /// Start a challenge round: pick and encode a token, log it, then play
    /// it while counting down on a background task.
    pub fn start_challenge<T, R>(&mut self, rng: &mut R, tone: T) -> Result<JoinHandle<String>>
    where
        T: ToneOutput + 'static,
        R: Rng + ?Sized,
    {
        let permit = self.guard.try_acquire()?;
        let token = generate_token(rng);
        let morse = codec::encode(&self.table, &token);
        info!(countdown = self.countdown.get(), "Challenge started");

        self.log.append(format!("Challenge: {morse}"));
        self.output = morse.to_string();

        let round = ChallengeRound::new(token, morse, self.countdown);
        let sequencer = Sequencer::new(self.timing, self.table.separator());
        Ok(spawn_challenge(
            round,
            sequencer,
            tone,
            self.updates.clone(),
            permit,
        ))
    }

    /// Apply an update from a background task. Returns the new output
    /// line when it changed.
    pub fn apply(&mut self, update: &UiUpdate) -> Option<String> {
        match update {
            UiUpdate::Challenge(challenge) => {
                if let ChallengeUpdate::Revealed { answer } = challenge {
                    self.log.append(format!("Answer: {answer}"));
                }
                self.output = challenge.prompt();
                Some(self.output.clone())
            }
            UiUpdate::Playback(_) => None,
        }
    }

    /// Add a character mapping
    pub fn add_mapping(&mut self, key: char, code: &str, policy: MappingPolicy) -> Result<()> {
        self.table.insert(key, code, policy)
    }

    pub fn set_preset(&mut self, preset: SpeedPreset) {
        self.timing = TimingProfile::from_preset(preset, self.timing.frequency_hz());
        self.config.playback.preset = Some(preset);
        info!(%preset, "Speed preset changed");
    }

    pub fn set_timing(&mut self, timing: TimingProfile) {
        self.timing = timing;
        self.config.playback.preset = None;
    }

    pub fn set_countdown(&mut self, secs: u32) -> Result<()> {
        self.countdown = CountdownSecs::new(secs)?;
        self.config.challenge.countdown_secs = secs;
        Ok(())
    }

    /// Dot and dash counts over the session log
    pub fn stats(&self) -> SymbolStats {
        self.log.stats()
    }

    /// A random fun fact
    pub fn fun_fact<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.docs.random_fact(rng)
    }
}
