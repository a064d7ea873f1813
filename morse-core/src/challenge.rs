//! Challenge round state machine
//!
//! A round moves Generated -> Countdown -> Revealed and never goes back;
//! a new challenge is a new round.

use core::fmt;

use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::codec::MorseString;
use crate::controller::PlaybackPermit;
use crate::error::{MorseError, Result};
use crate::hal::ToneOutput;
use crate::sequencer::{run_reporting, Sequencer};
use crate::updates::{ChallengeUpdate, UiUpdate, UpdateSender};

/// Letters in a challenge token
pub const TOKEN_LEN: usize = 3;
/// Default countdown length in seconds
pub const DEFAULT_COUNTDOWN_SECS: u32 = 10;
pub const MIN_COUNTDOWN_SECS: u32 = 5;
pub const MAX_COUNTDOWN_SECS: u32 = 30;

/// A challenge answer
pub type ChallengeToken = heapless::String<TOKEN_LEN>;

/// Pick `TOKEN_LEN` uppercase letters uniformly at random
pub fn generate_token<R: Rng + ?Sized>(rng: &mut R) -> ChallengeToken {
    let mut token = ChallengeToken::new();
    for _ in 0..TOKEN_LEN {
        let letter = char::from(b'A' + rng.gen_range(0..26u8));
        // capacity is exactly TOKEN_LEN
        token.push(letter).ok();
    }
    token
}

/// Validated countdown length
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CountdownSecs(u32);

impl Default for CountdownSecs {
    fn default() -> Self {
        Self(DEFAULT_COUNTDOWN_SECS)
    }
}

impl CountdownSecs {
    pub fn new(secs: u32) -> Result<Self> {
        if !(MIN_COUNTDOWN_SECS..=MAX_COUNTDOWN_SECS).contains(&secs) {
            return Err(MorseError::Config(format!(
                "challenge countdown must be between {MIN_COUNTDOWN_SECS} and {MAX_COUNTDOWN_SECS} seconds, got {secs}"
            )));
        }
        Ok(Self(secs))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Phases of a challenge round
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ChallengePhase {
    /// Token picked and encoded, countdown not started
    Generated,
    /// Counting down; `remaining` seconds until the reveal
    Countdown { remaining: u32 },
    /// Answer shown; terminal
    Revealed,
}

impl fmt::Display for ChallengePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengePhase::Generated => write!(f, "Generated"),
            ChallengePhase::Countdown { remaining } => write!(f, "Countdown({remaining})"),
            ChallengePhase::Revealed => write!(f, "Revealed"),
        }
    }
}

/// One challenge round
#[derive(Clone, Debug)]
pub struct ChallengeRound {
    token: ChallengeToken,
    morse: MorseString,
    countdown: CountdownSecs,
    phase: ChallengePhase,
}

impl ChallengeRound {
    pub fn new(token: ChallengeToken, morse: MorseString, countdown: CountdownSecs) -> Self {
        Self {
            token,
            morse,
            countdown,
            phase: ChallengePhase::Generated,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn morse(&self) -> &MorseString {
        &self.morse
    }

    pub fn phase(&self) -> ChallengePhase {
        self.phase
    }

    /// Seconds left, zero once revealed
    pub fn remaining(&self) -> u32 {
        match self.phase {
            ChallengePhase::Generated => self.countdown.get(),
            ChallengePhase::Countdown { remaining } => remaining,
            ChallengePhase::Revealed => 0,
        }
    }

    /// Generated -> Countdown. No effect in later phases.
    pub fn begin_countdown(&mut self) -> ChallengePhase {
        if self.phase == ChallengePhase::Generated {
            self.phase = ChallengePhase::Countdown {
                remaining: self.countdown.get(),
            };
            debug!(phase = %self.phase, "Challenge countdown started");
        }
        self.phase
    }

    /// One second elapsed. Reaching zero reveals the answer.
    pub fn tick(&mut self) -> ChallengePhase {
        if let ChallengePhase::Countdown { remaining } = self.phase {
            self.phase = match remaining.saturating_sub(1) {
                0 => ChallengePhase::Revealed,
                left => ChallengePhase::Countdown { remaining: left },
            };
        }
        self.phase
    }

    /// Run the countdown in real time, reporting each tick and the reveal
    pub async fn run_countdown(&mut self, updates: &UpdateSender) {
        self.begin_countdown();
        while let ChallengePhase::Countdown { remaining } = self.phase {
            updates
                .send(UiUpdate::Challenge(ChallengeUpdate::Tick {
                    morse: self.morse.to_string(),
                    remaining,
                }))
                .ok();
            sleep(Duration::from_secs(1)).await;
            self.tick();
        }
        info!(answer = %self.token, "Challenge revealed");
        updates
            .send(UiUpdate::Challenge(ChallengeUpdate::Revealed {
                answer: self.token.to_string(),
            }))
            .ok();
    }
}

/// Play the round's Morse and run its countdown side by side on a
/// background task. Resolves to the revealed answer.
pub fn spawn_challenge<T>(
    mut round: ChallengeRound,
    sequencer: Sequencer,
    mut tone: T,
    updates: UpdateSender,
    permit: PlaybackPermit,
) -> JoinHandle<String>
where
    T: ToneOutput + 'static,
{
    updates
        .send(UiUpdate::Challenge(ChallengeUpdate::Generated {
            morse: round.morse().to_string(),
        }))
        .ok();
    let steps = sequencer.start(round.morse().as_str(), &updates);
    let frequency_hz = sequencer.timing().frequency_hz();

    tokio::spawn(async move {
        let _permit = permit;
        let playback = run_reporting(&steps, frequency_hz, &mut tone, &updates);
        let countdown = round.run_countdown(&updates);
        // a failed playback is already reported; the reveal still happens
        let (_played, ()) = tokio::join!(playback, countdown);
        round.token().to_string()
    })
}
