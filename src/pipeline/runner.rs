//! Pipeline orchestrator: drives recognition → translation → synthesis.
//!
//! [`VoiceOrchestrator`] owns the [`SharedState`] handle and the three I/O
//! adapters.  Front-ends call its trigger methods (usually from a spawned
//! task) and render whatever the shared state says.
//!
//! # Flows
//!
//! ```text
//! mic()            Idle ─▶ Recording ─▶ Transcribed ─▶ Idle
//! translate()      Idle ─▶ Translating ─▶ Idle                 (result shown)
//! voice_to_voice() Idle ─▶ Recording ─▶ Transcribed ─▶ Translating
//!                       ─▶ Spoken ─▶ Idle                      (result spoken)
//!
//! any failure      ─▶ Error ─▶ Idle   (message on the result surface)
//! ```
//!
//! A trigger arriving while the pipeline is not `Idle` is rejected, never
//! queued.  Each run takes a generation ticket when it leaves `Idle`; a
//! [`reset`](VoiceOrchestrator::reset) bumps the generation so late results
//! from abandoned calls are dropped instead of overwriting newer state.
//!
//! The state lock is only taken between awaits, never across one.

use std::sync::Arc;

use thiserror::Error;

use super::state::{AppState, PipelineState, ResultView, SharedState};
use crate::direction::{Direction, LanguagePair};
use crate::speech::{
    SpeechError, SpeechInput, SpeechOutput, SpeechRecognizer, SpeechSynthesizer,
};
use crate::translate::{RequestError, TranslationOutcome, TranslationRequest, Translator};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Failures recovered at the orchestrator boundary.
///
/// The `Display` text is what the result surface shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Please provide the text for translation")]
    EmptyInput,

    #[error("Text is too long ({len}/{max} characters)")]
    InputTooLong { len: usize, max: usize },

    #[error("Speech recognition is not available")]
    RecognitionUnavailable,

    /// Detail is kept for logs only.
    #[error("Speech recognition failed")]
    RecognitionFailed(String),

    #[error("Translation error (HTTP {0})")]
    Server(u16),

    #[error("Backend connection error")]
    Transport,
}

impl From<RequestError> for PipelineError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::EmptyInput => PipelineError::EmptyInput,
            RequestError::TooLong { len, max } => PipelineError::InputTooLong { len, max },
        }
    }
}

// ---------------------------------------------------------------------------
// RunOutcome
// ---------------------------------------------------------------------------

/// How a trigger ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The flow ran to its end.
    Completed,
    /// Pipeline was busy; nothing happened.
    Rejected,
    /// Recognition is not available on this host; nothing happened.
    Unavailable,
    /// The flow failed; the message is on the result surface.
    Failed(PipelineError),
    /// A reset happened mid-run; the late result was discarded.
    Stale,
}

// ---------------------------------------------------------------------------
// Ticket
// ---------------------------------------------------------------------------

/// Identity of one run: the generation it started in and the direction it
/// snapshotted.
#[derive(Debug, Clone, Copy)]
struct Ticket {
    generation: u64,
    direction: Direction,
}

fn set_phase(st: &mut AppState, to: PipelineState) {
    if st.pipeline != to {
        log::debug!("pipeline: {} → {}", st.pipeline.label(), to.label());
        st.pipeline = to;
    }
}

// ---------------------------------------------------------------------------
// VoiceOrchestrator
// ---------------------------------------------------------------------------

/// Drives the translation pipeline.  Share it as `Arc<VoiceOrchestrator>`.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use voice_translator::config::AppConfig;
/// use voice_translator::pipeline::{new_shared_state, VoiceOrchestrator};
/// use voice_translator::speech::{CommandSynthesizer, NoRecognizer};
/// use voice_translator::translate::HttpTranslator;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let state = new_shared_state(&config);
/// let orchestrator = VoiceOrchestrator::new(
///     state.clone(),
///     &config.languages,
///     Arc::new(NoRecognizer),
///     Arc::new(HttpTranslator::from_config(&config.backend, &config.languages)),
///     Arc::new(CommandSynthesizer::from_config(&config.synthesis)),
/// );
/// orchestrator.set_input("Hello");
/// orchestrator.translate().await;
/// println!("{}", state.lock().result.text());
/// # }
/// ```
pub struct VoiceOrchestrator {
    state: SharedState,
    speech_in: SpeechInput,
    translator: Arc<dyn Translator>,
    speech_out: SpeechOutput,
}

impl VoiceOrchestrator {
    pub fn new(
        state: SharedState,
        languages: &LanguagePair,
        recognizer: Arc<dyn SpeechRecognizer>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            state,
            speech_in: SpeechInput::new(recognizer, languages.clone()),
            translator,
            speech_out: SpeechOutput::new(synthesizer, languages.clone()),
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn recognition_available(&self) -> bool {
        self.speech_in.is_available()
    }

    pub fn synthesis_available(&self) -> bool {
        self.speech_out.is_available()
    }

    // -----------------------------------------------------------------------
    // Triggers
    // -----------------------------------------------------------------------

    /// Record one utterance into the input field.  Does not translate.
    pub async fn mic(&self) -> RunOutcome {
        let ticket = match self.start_recording() {
            Ok(t) => t,
            Err(outcome) => return outcome,
        };
        let transcript = match self.record(ticket).await {
            Ok(t) => t,
            Err(outcome) => return outcome,
        };
        self.commit(ticket, |st| {
            st.input.set_text(&transcript);
            set_phase(st, PipelineState::Transcribed);
            set_phase(st, PipelineState::Idle);
            RunOutcome::Completed
        })
        .unwrap_or_else(|stale| stale)
    }

    /// Translate the current input field and show the result.
    pub async fn translate(&self) -> RunOutcome {
        let (ticket, request) = {
            let mut st = self.state.lock();
            if st.pipeline.is_busy() {
                log::debug!(
                    "pipeline: translate rejected, {} in progress",
                    st.pipeline.label()
                );
                return RunOutcome::Rejected;
            }
            let request = match TranslationRequest::new(
                st.input.text(),
                st.direction.current(),
                st.input.max_chars(),
            ) {
                Ok(r) => r,
                Err(e) => {
                    let err = PipelineError::from(e);
                    log::warn!("pipeline: {err}");
                    st.result = ResultView::Error(err.to_string());
                    return RunOutcome::Failed(err);
                }
            };
            st.generation += 1;
            let ticket = Ticket {
                generation: st.generation,
                direction: request.direction(),
            };
            begin_translating(&mut st);
            (ticket, request)
        };

        match self.request(ticket, &request, PipelineState::Idle).await {
            Ok(_) => RunOutcome::Completed,
            Err(outcome) => outcome,
        }
    }

    /// Record, translate, then speak the translation in the target language.
    pub async fn voice_to_voice(&self) -> RunOutcome {
        let ticket = match self.start_recording() {
            Ok(t) => t,
            Err(outcome) => return outcome,
        };
        let transcript = match self.record(ticket).await {
            Ok(t) => t,
            Err(outcome) => return outcome,
        };

        let request = self.commit(ticket, |st| {
            st.input.set_text(&transcript);
            set_phase(st, PipelineState::Transcribed);
            match TranslationRequest::new(st.input.text(), ticket.direction, st.input.max_chars()) {
                Ok(request) => {
                    begin_translating(st);
                    Ok(request)
                }
                Err(e) => Err(fail(st, PipelineError::from(e))),
            }
        });
        let request = match request {
            Ok(Ok(r)) => r,
            Ok(Err(outcome)) => return outcome,
            Err(stale) => return stale,
        };

        let translated = match self.request(ticket, &request, PipelineState::Spoken).await {
            Ok(t) => t,
            Err(outcome) => return outcome,
        };

        if let Err(e) = self.speech_out.speak(&translated, ticket.direction).await {
            log::warn!("pipeline: speech output: {e}");
        }
        self.commit(ticket, |st| {
            set_phase(st, PipelineState::Idle);
            RunOutcome::Completed
        })
        .unwrap_or_else(|stale| stale)
    }

    /// Speak the translation currently on the result surface.  Returns
    /// `false` when there was nothing to speak or synthesis failed.
    pub async fn speak_result(&self) -> bool {
        let (text, direction) = {
            let st = self.state.lock();
            match st.result.translation() {
                Some(t) => (t.to_string(), st.direction.current()),
                None => return false,
            }
        };
        match self.speech_out.speak(&text, direction).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("pipeline: speech output: {e}");
                false
            }
        }
    }

    /// Resolve once speech output has gone quiet.
    pub async fn wait_for_speech(&self) {
        self.speech_out.wait_idle().await;
    }

    // -----------------------------------------------------------------------
    // Direct state edits
    // -----------------------------------------------------------------------

    /// Toggle the direction and labels together.
    pub fn swap(&self) -> Direction {
        let direction = self.state.lock().direction.swap();
        log::debug!("pipeline: direction now {direction:?}");
        direction
    }

    pub fn set_direction(&self, direction: Direction) {
        let mut st = self.state.lock();
        if st.direction.current() != direction {
            st.direction.swap();
            log::debug!("pipeline: direction now {direction:?}");
        }
    }

    pub fn set_input(&self, text: &str) {
        self.state.lock().input.set_text(text);
    }

    /// Empty the input field and put the placeholder back.
    pub fn clear(&self) {
        let mut st = self.state.lock();
        st.input.clear();
        st.result = ResultView::Placeholder;
    }

    /// Return to `Idle` from anywhere, abandoning in-flight work and
    /// silencing speech output.
    pub fn reset(&self) {
        {
            let mut st = self.state.lock();
            st.generation += 1;
            st.recording = false;
            st.loading = false;
            if st.result == ResultView::Pending {
                st.result = ResultView::Placeholder;
            }
            set_phase(&mut st, PipelineState::Idle);
        }
        self.speech_in.release();
        self.speech_out.cancel();
        log::info!("pipeline: reset");
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    /// Guarded `Idle → Recording`.  Overlapping triggers are rejected before
    /// availability is considered.
    fn start_recording(&self) -> Result<Ticket, RunOutcome> {
        let mut st = self.state.lock();
        if st.pipeline.is_busy() {
            log::debug!(
                "pipeline: recording rejected, {} in progress",
                st.pipeline.label()
            );
            return Err(RunOutcome::Rejected);
        }
        if !self.speech_in.is_available() {
            log::debug!("pipeline: speech recognition unavailable");
            return Err(RunOutcome::Unavailable);
        }
        st.generation += 1;
        st.recording = true;
        set_phase(&mut st, PipelineState::Recording);
        Ok(Ticket {
            generation: st.generation,
            direction: st.direction.current(),
        })
    }

    /// Await the transcript; on failure the run is already wound down.
    async fn record(&self, ticket: Ticket) -> Result<String, RunOutcome> {
        let result = self.speech_in.capture(ticket.direction).await;
        let outcome = self.commit(ticket, |st| {
            st.recording = false;
            match result {
                Ok(transcript) => Ok(transcript),
                Err(SpeechError::Unavailable) => {
                    set_phase(st, PipelineState::Idle);
                    Err(RunOutcome::Unavailable)
                }
                Err(SpeechError::Busy) => {
                    // An abandoned session still holds the microphone.
                    set_phase(st, PipelineState::Idle);
                    Err(RunOutcome::Rejected)
                }
                Err(SpeechError::Failed(detail)) => {
                    Err(fail(st, PipelineError::RecognitionFailed(detail)))
                }
            }
        });
        outcome.and_then(|r| r)
    }

    /// Await the backend; on success the translation is on the surface and
    /// the pipeline moves to `next`.
    async fn request(
        &self,
        ticket: Ticket,
        request: &TranslationRequest,
        next: PipelineState,
    ) -> Result<String, RunOutcome> {
        let outcome = self.translator.translate(request).await;
        let step = self.commit(ticket, |st| {
            st.loading = false;
            match outcome {
                TranslationOutcome::Success { translated_text } => {
                    st.result = ResultView::Translation(translated_text.clone());
                    set_phase(st, next);
                    Ok(translated_text)
                }
                TranslationOutcome::ServerError { status_code } => {
                    Err(fail(st, PipelineError::Server(status_code)))
                }
                TranslationOutcome::TransportError => Err(fail(st, PipelineError::Transport)),
            }
        });
        step.and_then(|r| r)
    }

    /// Run `f` under the lock if `ticket` is still current.
    fn commit<T>(
        &self,
        ticket: Ticket,
        f: impl FnOnce(&mut AppState) -> T,
    ) -> Result<T, RunOutcome> {
        let mut st = self.state.lock();
        if st.generation != ticket.generation {
            log::debug!(
                "pipeline: discarding stale result (generation {})",
                ticket.generation
            );
            return Err(RunOutcome::Stale);
        }
        Ok(f(&mut st))
    }
}

fn begin_translating(st: &mut AppState) {
    st.loading = true;
    st.result = ResultView::Pending;
    set_phase(st, PipelineState::Translating);
}

/// `* → Error → Idle` with the message on the result surface.
fn fail(st: &mut AppState, err: PipelineError) -> RunOutcome {
    log::error!("pipeline: {err:?}");
    st.recording = false;
    st.loading = false;
    st.result = ResultView::Error(err.to_string());
    set_phase(st, PipelineState::Error);
    set_phase(st, PipelineState::Idle);
    RunOutcome::Failed(err)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
