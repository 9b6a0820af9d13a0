//! Speech synthesis through an external text-to-speech program.
//!
//! The program and its argument template come from [`SynthesisConfig`].
//! Each argument may contain the placeholders `{text}`, `{tag}` (full
//! BCP-47 tag, e.g. `ar-MA`) and `{lang}` (primary subtag, e.g. `ar`).
//!
//! ```toml
//! [synthesis]
//! command = "espeak-ng"
//! args = ["-v", "{lang}", "{text}"]
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::process::{Child, Command};

use super::output::{SpeechSynthesizer, SynthesisError};
use super::primary_subtag;
use crate::config::SynthesisConfig;

/// Runs one child process per utterance; starting a new one or calling
/// [`cancel`](SpeechSynthesizer::cancel) kills the previous.
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    current: Mutex<Option<Child>>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            current: Mutex::new(None),
        }
    }

    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    /// Expand the argument template for one utterance.
    pub fn render_args(&self, text: &str, language: &str) -> Vec<String> {
        let lang = primary_subtag(language);
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{lang}", &lang)
                    .replace("{tag}", language)
                    .replace("{text}", text)
            })
            .collect()
    }
}

impl std::fmt::Debug for CommandSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSynthesizer")
            .field("program", &self.program)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    fn is_available(&self) -> bool {
        !self.program.is_empty() && find_program(&self.program).is_some()
    }

    async fn speak(&self, text: &str, language: &str) -> Result<(), SynthesisError> {
        let child = Command::new(&self.program)
            .args(self.render_args(text, language))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SynthesisError::Failed(format!("{}: {e}", self.program)))?;

        // Replacing the handle drops (and kills) any earlier utterance.
        *self.current.lock() = Some(child);
        Ok(())
    }

    fn cancel(&self) {
        if let Some(mut child) = self.current.lock().take() {
            if let Err(e) = child.start_kill() {
                log::debug!("speech: cancel: {e}");
            }
        }
    }

    async fn wait_idle(&self) {
        let child = self.current.lock().take();
        if let Some(mut child) = child {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    log::warn!("speech: {} exited with {status}", self.program)
                }
                Ok(_) => {}
                Err(e) => log::warn!("speech: waiting for {}: {e}", self.program),
            }
        }
    }
}

/// Resolve `program` the way a shell would: paths are checked directly,
/// bare names are searched in `PATH`.
fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path).find_map(|dir| {
        let full = dir.join(program);
        if full.is_file() {
            return Some(full);
        }
        #[cfg(windows)]
        {
            let exe = full.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_args_substitutes_placeholders() {
        let synth = CommandSynthesizer::from_config(&SynthesisConfig::default());
        assert_eq!(synth.render_args("مرحبا", "ar-MA"), ["-v", "ar", "مرحبا"]);

        let synth = CommandSynthesizer::new(
            "say",
            vec!["--voice={tag}".into(), "--".into(), "{text}".into()],
        );
        assert_eq!(
            synth.render_args("Hello", "en-US"),
            ["--voice=en-US", "--", "Hello"]
        );
    }

    #[test]
    fn missing_program_is_unavailable() {
        let synth = CommandSynthesizer::new("definitely-not-a-real-tts-binary", vec![]);
        assert!(!synth.is_available());
        assert!(!CommandSynthesizer::new("", vec![]).is_available());
    }

    #[cfg(unix)]
    #[test]
    fn program_on_path_is_available() {
        assert!(CommandSynthesizer::new("sh", vec![]).is_available());
        assert!(CommandSynthesizer::new("/bin/sh", vec![]).is_available());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn speak_starts_and_cancel_stops_the_process() {
        let synth = CommandSynthesizer::new("sleep", vec!["5".into()]);
        synth.speak("ignored", "en-US").await.unwrap();
        assert!(synth.current.lock().is_some());

        synth.cancel();
        assert!(synth.current.lock().is_none());
        // Idempotent when nothing is playing.
        synth.cancel();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn wait_idle_returns_after_the_utterance() {
        let synth = CommandSynthesizer::new("true", vec![]);
        synth.speak("Hello", "en-US").await.unwrap();
        synth.wait_idle().await;
        assert!(synth.current.lock().is_none());
        // Nothing playing: returns immediately.
        synth.wait_idle().await;
    }

    #[tokio::test]
    async fn spawn_failure_is_reported() {
        let synth = CommandSynthesizer::new("definitely-not-a-real-tts-binary", vec![]);
        let err = synth.speak("Hello", "en-US").await.unwrap_err();
        assert!(matches!(err, SynthesisError::Failed(_)));
    }
}
