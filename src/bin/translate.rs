//! One-shot translation client.
//!
//! ```text
//! translate "Good morning"                 # English → Darija
//! translate -d reverse "صباح الخير"         # Darija → English
//! echo "See you tomorrow" | translate -s   # read stdin, speak the result
//! translate --voice --speak                # voice → voice
//! ```
//!
//! The translation goes to stdout; any error message goes to stderr with a
//! non-zero exit status.

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use voice_translator::{
    config::AppConfig,
    direction::Direction,
    pipeline::{new_shared_state, PipelineError, RunOutcome, VoiceOrchestrator},
    speech::{recognizer_from_config, CommandSynthesizer},
    translate::HttpTranslator,
};

/// CLI wrapper for [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliDirection {
    /// Source language → target language (English → Darija by default).
    Forward,
    /// Target language → source language.
    Reverse,
}

impl From<CliDirection> for Direction {
    fn from(cli: CliDirection) -> Self {
        match cli {
            CliDirection::Forward => Direction::Forward,
            CliDirection::Reverse => Direction::Reverse,
        }
    }
}

/// CLI wrapper for [`LevelFilter`].
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(cli: CliLogLevel) -> Self {
        match cli {
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "translate",
    version,
    about = "Translate text (or speech) through the translation backend",
    long_about = "Sends text to the configured translation backend and prints the result.\n\
                  Without TEXT the input is read from stdin; with --voice it is recorded \
                  from the microphone."
)]
struct Cli {
    /// Text to translate
    text: Option<String>,

    /// Translation direction
    #[arg(short, long, value_enum, default_value_t = CliDirection::Forward)]
    direction: CliDirection,

    /// Settings file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the backend endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Record the input from the microphone instead of TEXT
    #[arg(long, conflicts_with = "text")]
    voice: bool,

    /// Speak the translation in the target language
    #[arg(short, long)]
    speak: bool,

    /// Log verbosity (stderr)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn)]
    log_level: CliLogLevel,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.backend.endpoint = endpoint.clone();
    }
    Ok(config)
}

/// Text to translate: the argument if given, otherwise piped stdin.
fn read_input(arg: Option<&str>) -> Result<String> {
    if let Some(text) = arg {
        return Ok(text.to_string());
    }
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut buf = String::new();
    stdin
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

/// Message printed for an outcome that produced no translation.
fn failure_message(outcome: &RunOutcome) -> Option<String> {
    match outcome {
        RunOutcome::Completed => None,
        RunOutcome::Failed(err) => Some(err.to_string()),
        RunOutcome::Unavailable => Some(PipelineError::RecognitionUnavailable.to_string()),
        RunOutcome::Rejected | RunOutcome::Stale => Some("Translation was interrupted".into()),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .parse_default_env()
        .init();

    let config = load_config(&cli)?;

    let translator = Arc::new(HttpTranslator::from_config(&config.backend, &config.languages));
    log::info!("Translation backend: {}", translator.endpoint());
    let orchestrator = VoiceOrchestrator::new(
        new_shared_state(&config),
        &config.languages,
        recognizer_from_config(&config),
        translator,
        Arc::new(CommandSynthesizer::from_config(&config.synthesis)),
    );
    orchestrator.set_direction(cli.direction.into());

    let outcome = if cli.voice {
        if cli.speak {
            orchestrator.voice_to_voice().await
        } else {
            match orchestrator.mic().await {
                RunOutcome::Completed => orchestrator.translate().await,
                other => other,
            }
        }
    } else {
        let text = read_input(cli.text.as_deref())?;
        let max = config.backend.max_chars;
        let len = text.trim().chars().count();
        if len > max {
            // The input field would cut it silently; refuse instead.
            eprintln!("{}", PipelineError::InputTooLong { len, max });
            return Ok(ExitCode::FAILURE);
        }
        orchestrator.set_input(&text);
        orchestrator.translate().await
    };

    if let Some(message) = failure_message(&outcome) {
        eprintln!("{message}");
        return Ok(ExitCode::FAILURE);
    }

    let translation = orchestrator
        .state()
        .lock()
        .result
        .translation()
        .map(str::to_string)
        .unwrap_or_default();
    println!("{translation}");

    if cli.speak {
        // Voice-to-voice already started speaking.
        if !cli.voice && !orchestrator.speak_result().await {
            log::warn!("Speech synthesis is not available");
        }
        orchestrator.wait_for_speech().await;
    }
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
