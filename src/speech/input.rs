//! Speech input adapter: one single-shot recognition per call.
//!
//! [`SpeechInput::capture`] maps the direction to a recognition tag, opens a
//! [`RecordingSession`] and resolves with the first final transcript.  Only
//! one session may be open at a time; a concurrent call fails with
//! [`SpeechError::Busy`] without disturbing the running session.
//! [`SpeechInput::release`] abandons the open session so a new one can start
//! while the old recognizer call is still pending.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;

use crate::direction::{Direction, LanguagePair};

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors from the recognition side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    /// The host exposes no recognition capability.
    #[error("speech recognition is not available")]
    Unavailable,

    /// Another recording session is already open.
    #[error("a recording session is already active")]
    Busy,

    /// The session started but errored or produced nothing usable.
    #[error("speech recognition failed: {0}")]
    Failed(String),
}

// ---------------------------------------------------------------------------
// SpeechRecognizer trait
// ---------------------------------------------------------------------------

/// Host speech-recognition capability.
///
/// `recognize` runs exactly one session in `language` and returns its
/// first final transcript; no interim results, no continuation.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Capability probe.
    fn is_available(&self) -> bool;

    async fn recognize(&self, language: &str) -> Result<String, SpeechError>;
}

/// Stand-in used when no recognition backend is compiled in or loadable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRecognizer;

#[async_trait]
impl SpeechRecognizer for NoRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    async fn recognize(&self, _language: &str) -> Result<String, SpeechError> {
        Err(SpeechError::Unavailable)
    }
}

// ---------------------------------------------------------------------------
// RecordingSession
// ---------------------------------------------------------------------------

/// The open recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSession {
    language: String,
    started_at: Instant,
}

impl RecordingSession {
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Slot contents: the open session and the id of the capture that owns it.
type SessionSlot = Mutex<Option<(u64, RecordingSession)>>;

/// Clears the session slot on drop: result, error, or the capture future
/// being dropped all end the session.  A slot already taken over by a newer
/// session is left alone.
struct SessionGuard<'a> {
    slot: &'a SessionSlot,
    id: u64,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|(id, _)| *id == self.id) {
            *slot = None;
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechInput
// ---------------------------------------------------------------------------

/// Capability-gated wrapper over a [`SpeechRecognizer`].
pub struct SpeechInput {
    recognizer: Arc<dyn SpeechRecognizer>,
    languages: LanguagePair,
    session: SessionSlot,
    next_id: AtomicU64,
}

impl SpeechInput {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, languages: LanguagePair) -> Self {
        Self {
            recognizer,
            languages,
            session: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_available()
    }

    pub fn is_recording(&self) -> bool {
        self.session.lock().is_some()
    }

    /// Snapshot of the open session, if any.
    pub fn session(&self) -> Option<RecordingSession> {
        self.session.lock().as_ref().map(|(_, s)| s.clone())
    }

    /// Abandon the open session, if any.  The pending recognizer call is not
    /// aborted; its transcript still reaches its own caller, but the slot is
    /// free for the next capture.
    pub fn release(&self) {
        if let Some((_, session)) = self.session.lock().take() {
            log::debug!("speech: recording session released ({})", session.language);
        }
    }

    /// Record one utterance in the input language of `direction`.
    pub async fn capture(&self, direction: Direction) -> Result<String, SpeechError> {
        if !self.recognizer.is_available() {
            return Err(SpeechError::Unavailable);
        }
        let language = self.languages.input_tag(direction).to_string();

        let _guard = self.open_session(&language)?;
        log::debug!("speech: recording session opened ({language})");

        let transcript = self.recognizer.recognize(&language).await?;
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(SpeechError::Failed("empty transcript".into()));
        }
        Ok(transcript.to_string())
    }

    fn open_session(&self, language: &str) -> Result<SessionGuard<'_>, SpeechError> {
        let mut slot = self.session.lock();
        if slot.is_some() {
            return Err(SpeechError::Busy);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *slot = Some((
            id,
            RecordingSession {
                language: language.to_string(),
                started_at: Instant::now(),
            },
        ));
        Ok(SessionGuard {
            slot: &self.session,
            id,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
