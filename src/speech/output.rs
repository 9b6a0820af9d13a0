//! Speech output adapter.
//!
//! [`SpeechOutput::speak`] cancels whatever is currently being spoken and
//! starts a new utterance in the output language of the given direction.
//! Completion is not awaited and failures never reach the user; they are
//! logged and dropped by the caller.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::direction::{Direction, LanguagePair};

/// Errors from the synthesis side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("speech synthesis is not available")]
    Unavailable,

    #[error("speech synthesis failed: {0}")]
    Failed(String),
}

/// Host speech-synthesis capability.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn is_available(&self) -> bool;

    /// Start speaking `text` in `language`.  Resolves once playback has
    /// started, not when it ends.
    async fn speak(&self, text: &str, language: &str) -> Result<(), SynthesisError>;

    /// Stop any in-progress utterance.  A no-op when silent.
    fn cancel(&self);

    /// Resolve once the current utterance (if any) has finished.
    async fn wait_idle(&self) {}
}

/// Capability-gated wrapper over a [`SpeechSynthesizer`].
pub struct SpeechOutput {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    languages: LanguagePair,
}

impl SpeechOutput {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, languages: LanguagePair) -> Self {
        Self {
            synthesizer,
            languages,
        }
    }

    pub fn is_available(&self) -> bool {
        self.synthesizer.is_available()
    }

    /// Speak `text` in the output language of `direction`.
    ///
    /// Empty text is a no-op; so is an unavailable synthesizer (reported as
    /// [`SynthesisError::Unavailable`] for the caller to log).
    pub async fn speak(&self, text: &str, direction: Direction) -> Result<(), SynthesisError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        if !self.synthesizer.is_available() {
            return Err(SynthesisError::Unavailable);
        }
        let language = self.languages.output_tag(direction);
        self.synthesizer.cancel();
        log::debug!("speech: speaking {} chars ({language})", text.chars().count());
        self.synthesizer.speak(text, language).await
    }

    pub fn cancel(&self) {
        self.synthesizer.cancel();
    }

    pub async fn wait_idle(&self) {
        self.synthesizer.wait_idle().await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
