//! Interactive session: the single context that owns `AppState`
//!
//! Commands come from stdin, progress comes from the update channel, and
//! both are handled on this task only.

use std::path::PathBuf;

use morse_core::{
    AppState, DocTopic, ExportFormat, MappingPolicy, MorseError, SpeedPreset, UiUpdate,
    UpdateReceiver,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::render::PatternView;
use crate::tone::{make_tone, ToneSettings};

pub const HELP: &str = "\
Commands:
  <text>                 convert (auto-detect when autoconvert is on)
  :morse <text>          text to Morse
  :text <morse>          Morse to text
  :auto <input>          detect direction and convert
  :play [morse]          play the given Morse or the last output
  :reverse               play the last output backwards
  :challenge             guess the three-letter word
  :stats                 dot and dash counts in the session log
  :fact                  random fun fact
  :doc <topic>           what-is-morse | how-to-use | feature-guide | fun-facts
  :map <char> <code> [!] add a mapping; trailing ! replaces collisions
  :speed slow|normal|fast
  :timer <5-30>          challenge countdown seconds
  :autoplay on|off
  :autoconvert on|off
  :log                   show the session log
  :save <path> [format]  text | json | csv | markdown
  :load <path>           replace the session log with a text file
  :help
  :quit";

/// One parsed REPL line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Convert(String),
    ToMorse(String),
    ToText(String),
    Auto(String),
    Play(Option<String>),
    Reverse,
    Challenge,
    Stats,
    Fact,
    Doc(DocTopic),
    Map { key: char, code: String, replace: bool },
    Speed(SpeedPreset),
    Timer(u32),
    Autoplay(bool),
    Autoconvert(bool),
    Log,
    Save { path: PathBuf, format: Option<ExportFormat> },
    Load(PathBuf),
    Help,
    Quit,
}

fn parse_switch(arg: &str) -> Result<bool, String> {
    match arg {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(format!("expected on or off, got {other:?}")),
    }
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(arg)
    }
}

/// Parse one input line. Lines not starting with `:` are conversions.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Convert(line.to_string()));
    };
    let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let arg = arg.trim();

    let command = match name {
        "morse" => Command::ToMorse(arg.to_string()),
        "text" => Command::ToText(arg.to_string()),
        "auto" => Command::Auto(arg.to_string()),
        "play" => Command::Play((!arg.is_empty()).then(|| arg.to_string())),
        "reverse" => Command::Reverse,
        "challenge" => Command::Challenge,
        "stats" => Command::Stats,
        "fact" => Command::Fact,
        "doc" => Command::Doc(
            required(arg, ":doc <topic>")?
                .parse()
                .map_err(|e: MorseError| e.to_string())?,
        ),
        "map" => {
            let mut parts = arg.split_whitespace();
            let usage = "usage: :map <char> <code> [!]";
            let key = parts.next().ok_or(usage)?;
            let code = parts.next().ok_or(usage)?;
            let replace = match parts.next() {
                None => false,
                Some("!") => true,
                Some(_) => return Err(usage.to_string()),
            };
            let mut chars = key.chars();
            let (Some(key), None) = (chars.next(), chars.next()) else {
                return Err(usage.to_string());
            };
            Command::Map {
                key,
                code: code.to_string(),
                replace,
            }
        }
        "speed" => Command::Speed(
            required(arg, ":speed slow|normal|fast")?
                .parse()
                .map_err(|e: MorseError| e.to_string())?,
        ),
        "timer" => Command::Timer(
            required(arg, ":timer <5-30>")?
                .parse()
                .map_err(|_| format!("not a number: {arg:?}"))?,
        ),
        "autoplay" => Command::Autoplay(parse_switch(arg)?),
        "autoconvert" => Command::Autoconvert(parse_switch(arg)?),
        "log" => Command::Log,
        "save" => {
            let mut parts = arg.split_whitespace();
            let path = PathBuf::from(parts.next().ok_or("usage: :save <path> [format]")?);
            let format = parts
                .next()
                .map(str::parse::<ExportFormat>)
                .transpose()
                .map_err(|e| e.to_string())?;
            Command::Save { path, format }
        }
        "load" => Command::Load(PathBuf::from(required(arg, ":load <path>")?)),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command :{other} (try :help)")),
    };
    Ok(command)
}

/// Text produced by one command
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }
}

/// Front end state wrapped around `AppState`
pub struct Repl {
    app: AppState,
    view: PatternView,
    tones: ToneSettings,
    rng: StdRng,
}

impl Repl {
    pub fn new(app: AppState, tones: ToneSettings) -> Self {
        Self {
            app,
            view: PatternView::new(),
            tones,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic challenges and facts, for tests
    pub fn with_seed(app: AppState, tones: ToneSettings, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new(app, tones)
        }
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut AppState {
        &mut self.app
    }

    /// Which tone backend playback uses
    pub fn tones(&self) -> ToneSettings {
        self.tones
    }

    fn play(&mut self, morse: &str) -> Result<JoinHandle<morse_core::Result<()>>, MorseError> {
        self.app.play(morse, make_tone(self.tones))
    }

    /// Play a fresh conversion when autoplay is on. A busy guard only adds
    /// a warning; the conversion is still shown.
    fn autoplay(&mut self, morse: &str, reply: &mut Reply) {
        if !self.app.autoplay() || morse.is_empty() {
            return;
        }
        if let Err(e) = self.play(morse) {
            warn!(error = %e, "Autoplay skipped");
            reply.lines.push(format!("⚠ Autoplay skipped: {e}"));
        }
    }

    /// Run one command against the state.
    ///
    /// Playback and challenges are started here and left running; their
    /// progress arrives through the update channel.
    pub fn execute(&mut self, command: Command) -> Result<Reply, MorseError> {
        let reply = match command {
            Command::Convert(input) if self.app.autoconvert() => {
                return self.execute(Command::Auto(input));
            }
            Command::Convert(input) | Command::ToMorse(input) => {
                let morse = self.app.convert_to_morse(&input).into_string();
                let mut reply = Reply::line(morse.clone());
                self.autoplay(&morse, &mut reply);
                reply
            }
            Command::ToText(morse) => Reply::line(self.app.convert_to_text(&morse)),
            Command::Auto(input) => {
                let conversion = self.app.auto_convert(&input);
                let mut reply = Reply::line(conversion.output.clone());
                if conversion.direction == morse_core::Direction::TextToMorse {
                    self.autoplay(&conversion.output, &mut reply);
                }
                reply
            }
            Command::Play(morse) => {
                let morse = morse.unwrap_or_else(|| self.app.output().to_string());
                self.play(&morse)?;
                Reply::default()
            }
            Command::Reverse => {
                self.app.play_reverse(make_tone(self.tones))?;
                Reply::default()
            }
            Command::Challenge => {
                self.app.start_challenge(&mut self.rng, make_tone(self.tones))?;
                Reply::default()
            }
            Command::Stats => Reply {
                lines: self.app.stats().to_string().lines().map(str::to_owned).collect(),
                quit: false,
            },
            Command::Fact => Reply::line(self.app.fun_fact(&mut self.rng)),
            Command::Doc(topic) => Reply {
                lines: vec![format!("== {topic} =="), self.app.docs().read(topic)],
                quit: false,
            },
            Command::Map { key, code, replace } => {
                let policy = if replace {
                    MappingPolicy::Replace
                } else {
                    MappingPolicy::Reject
                };
                self.app.add_mapping(key, &code, policy)?;
                Reply::line(format!("Mapped {} → {code}", key.to_uppercase()))
            }
            Command::Speed(preset) => {
                self.app.set_preset(preset);
                let timing = self.app.timing();
                Reply::line(format!(
                    "Speed {preset}: dot {} ms, dash {} ms",
                    timing.dot_ms, timing.dash_ms
                ))
            }
            Command::Timer(secs) => {
                self.app.set_countdown(secs)?;
                Reply::line(format!("Challenge timer {secs}s"))
            }
            Command::Autoplay(on) => {
                self.app.set_autoplay(on);
                Reply::line(format!("Autoplay {}", if on { "on" } else { "off" }))
            }
            Command::Autoconvert(on) => {
                self.app.set_autoconvert(on);
                Reply::line(format!("Autoconvert {}", if on { "on" } else { "off" }))
            }
            Command::Log => Reply {
                lines: self.app.log().lines().to_vec(),
                quit: false,
            },
            Command::Save { path, format } => {
                let format = format
                    .or_else(|| ExportFormat::from_path(&path))
                    .unwrap_or(ExportFormat::Text);
                self.app.log().save(&path, format)?;
                Reply::line(format!("Session saved to {}", path.display()))
            }
            Command::Load(path) => {
                self.app.log_mut().load_file(&path)?;
                Reply::line(format!(
                    "Loaded {} lines from {}",
                    self.app.log().len(),
                    path.display()
                ))
            }
            Command::Help => Reply {
                lines: HELP.lines().map(str::to_owned).collect(),
                quit: false,
            },
            Command::Quit => Reply {
                lines: Vec::new(),
                quit: true,
            },
        };
        Ok(reply)
    }

    /// Apply a background update; returns text to print
    pub fn handle_update(&mut self, update: &UiUpdate) -> Option<String> {
        match update {
            UiUpdate::Playback(playback) => self.view.apply(playback),
            UiUpdate::Challenge(_) => self.app.apply(update),
        }
    }

    /// Drive a spawned task to completion while rendering its updates
    pub async fn follow<T>(
        &mut self,
        mut handle: JoinHandle<T>,
        updates: &mut UpdateReceiver,
    ) -> Result<T, JoinError> {
        loop {
            tokio::select! {
                Some(update) = updates.recv() => {
                    if let Some(text) = self.handle_update(&update) {
                        println!("{text}");
                    }
                }
                joined = &mut handle => {
                    while let Ok(update) = updates.try_recv() {
                        if let Some(text) = self.handle_update(&update) {
                            println!("{text}");
                        }
                    }
                    return joined;
                }
            }
        }
    }

    /// Read commands from stdin until `:quit` or end of input
    pub async fn run(&mut self, mut updates: UpdateReceiver) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("Morse Mate {}. Type :help for commands.", morse_core::VERSION);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    debug!(%line, "Input");
                    let reply = parse_command(&line)
                        .and_then(|command| self.execute(command).map_err(|e| e.to_string()));
                    match reply {
                        Ok(reply) => {
                            for text in &reply.lines {
                                println!("{text}");
                            }
                            if reply.quit {
                                break;
                            }
                        }
                        Err(message) => {
                            warn!(%message, "Command failed");
                            println!("⚠ {message}");
                        }
                    }
                }
                Some(update) = updates.recv() => {
                    if let Some(text) = self.handle_update(&update) {
                        println!("{text}");
                    }
                }
            }
        }
        Ok(())
    }
}
