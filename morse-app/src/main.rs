//! Morse Mate binary
//!
//! 1. Parse arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the application state and its update channel
//! 4. Run a one-shot command or the interactive session

use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use morse_app::cli::{CliArgs, Command};
use morse_app::repl::Repl;
use morse_app::tone::{make_tone, ToneSettings};
use morse_core::{updates, AppState, DocTopic, MorseConfig, MorseError, UpdateReceiver};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_path = args.resolve_config_path();
    let loaded = MorseConfig::load(&config_path);
    let config_level = loaded
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(args.resolve_log_filter(&config_level))
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match loaded {
        Ok(config) => config,
        Err(MorseError::Io(_)) if !config_path.exists() => {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            MorseConfig::default()
        }
        Err(e) => {
            tracing::warn!(
                path = %config_path.display(),
                error = %e,
                "Invalid config, using defaults"
            );
            MorseConfig::default()
        }
    };
    if let Some(dir) = args.docs_dir.clone() {
        config.general.docs_dir = dir.display().to_string();
    }
    args.apply_tone_flags(&mut config.playback);
    let tones = ToneSettings::from_config(&config.playback);

    let (tx, rx) = updates::channel();
    let app = match AppState::new(config, tx) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("morse-mate: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(version = morse_core::VERSION, "Morse Mate starting");

    let mut session = Repl::new(app, tones);
    match run(&mut session, args.command.unwrap_or(Command::Repl), rx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("morse-mate: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    session: &mut Repl,
    command: Command,
    mut rx: UpdateReceiver,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Encode { text, play } => {
            let morse = session.app_mut().convert_to_morse(&text);
            println!("{morse}");
            if play && !morse.is_empty() {
                let handle = session.app().play(morse.as_str(), make_tone(session.tones()))?;
                session.follow(handle, &mut rx).await??;
            }
        }
        Command::Decode { morse } => println!("{}", session.app_mut().convert_to_text(&morse)),
        Command::Auto { input } => println!("{}", session.app_mut().auto_convert(&input).output),
        Command::Play { morse } => {
            let handle = session.app().play(&morse, make_tone(session.tones()))?;
            session.follow(handle, &mut rx).await??;
        }
        Command::Challenge { timer } => {
            if let Some(secs) = timer {
                session.app_mut().set_countdown(secs)?;
            }
            let tones = session.tones();
            let handle = session
                .app_mut()
                .start_challenge(&mut StdRng::from_entropy(), make_tone(tones))?;
            session.follow(handle, &mut rx).await?;
        }
        Command::Fact => println!("{}", session.app().fun_fact(&mut rand::thread_rng())),
        Command::Doc { topic } => {
            let topic: DocTopic = topic.parse()?;
            println!("== {topic} ==");
            println!("{}", session.app().docs().read(topic));
        }
        Command::Repl => session.run(rx).await?,
    }
    Ok(())
}
