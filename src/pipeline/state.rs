//! Pipeline state machine and shared application state.
//!
//! [`PipelineState`] drives the orchestrator's state machine.  The UI reads
//! it via [`SharedState`] to render the appropriate controls.
//!
//! [`AppState`] is the single source of truth for everything a front-end
//! shows: pipeline phase, direction and labels, the input field, the result
//! surface and the loading / recording indicators.
//!
//! [`SharedState`] is `Arc<Mutex<AppState>>`, cheap to clone and safe to
//! share across threads.  Never hold the lock across an `.await`.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::AppConfig;
use crate::direction::DirectionState;

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the voice / text translation pipeline.
///
/// ```text
/// Idle ──mic / voice-to-voice──▶ Recording ──transcript──▶ Transcribed
///   │                                                          │
///   │                            mic flow ends here ◀──────────┤
///   │                                                          ▼
///   └────────────translate─────────────────────────────────▶ Translating
///                                                              │
///                      Success (voice-to-voice) ──▶ Spoken ──▶ Idle
///                      Success (translate)      ──────────────▶ Idle
///                      ServerError / TransportError ──▶ Error ──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Ready for a trigger.
    #[default]
    Idle,
    /// A recognition session is capturing speech.
    Recording,
    /// The transcript has been written to the input field.
    Transcribed,
    /// The translation request is in flight.
    Translating,
    /// The translation is being handed to speech output.
    Spoken,
    /// A failure is being reported; returns to `Idle` immediately.
    Error,
}

impl PipelineState {
    /// Returns `true` in every state except `Idle`.
    ///
    /// Triggers arriving while busy are rejected, not queued.
    ///
    /// ```
    /// use voice_translator::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::Recording.is_busy());
    /// assert!(PipelineState::Translating.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        !matches!(self, PipelineState::Idle)
    }

    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Recording => "Listening",
            PipelineState::Transcribed => "Transcribed",
            PipelineState::Translating => "Translating",
            PipelineState::Spoken => "Speaking",
            PipelineState::Error => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// InputField
// ---------------------------------------------------------------------------

/// The text box: contents plus the limits and affordances derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    text: String,
    max_chars: usize,
}

impl InputField {
    pub fn new(max_chars: usize) -> Self {
        Self {
            text: String::new(),
            max_chars,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Replace the contents, cutting anything past `max_chars` characters.
    pub fn set_text(&mut self, text: &str) {
        self.text = match text.char_indices().nth(self.max_chars) {
            Some((cut, _)) => text[..cut].to_string(),
            None => text.to_string(),
        };
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// `"n/max"` counter shown under the text box.
    pub fn char_count_label(&self) -> String {
        format!("{}/{}", self.char_count(), self.max_chars)
    }

    /// The clear button is shown whenever there is any text.
    pub fn show_clear(&self) -> bool {
        !self.text.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ResultView
// ---------------------------------------------------------------------------

/// Placeholder shown before any translation.
pub const RESULT_PLACEHOLDER: &str = "Translation will appear here...";

/// What the result surface currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Placeholder,
    /// Cleared while a request is in flight.
    Pending,
    Translation(String),
    Error(String),
}

impl ResultView {
    /// Text to render.
    pub fn text(&self) -> &str {
        match self {
            ResultView::Placeholder => RESULT_PLACEHOLDER,
            ResultView::Pending => "",
            ResultView::Translation(t) => t,
            ResultView::Error(msg) => msg,
        }
    }

    /// The translated text, if the surface shows one.
    pub fn translation(&self) -> Option<&str> {
        match self {
            ResultView::Translation(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultView::Error(_))
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state, mutated by the orchestrator and selection sync,
/// read by the front-ends.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current phase of the pipeline.
    pub pipeline: PipelineState,
    /// Direction and its labels.
    pub direction: DirectionState,
    /// The text box.
    pub input: InputField,
    /// The result surface.
    pub result: ResultView,
    /// A translation request is in flight.
    pub loading: bool,
    /// A recording session is active.
    pub recording: bool,
    /// Bumped whenever a run leaves `Idle` or is reset; results carrying an
    /// older generation are discarded.
    pub(crate) generation: u64,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            pipeline: PipelineState::Idle,
            direction: DirectionState::new(&config.languages),
            input: InputField::new(config.backend.max_chars),
            result: ResultView::Placeholder,
            loading: false,
            recording: false,
            generation: 0,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AppState`].
pub type SharedState = Arc<Mutex<AppState>>;

/// Construct a new [`SharedState`] wrapping a fresh [`AppState`].
pub fn new_shared_state(config: &AppConfig) -> SharedState {
    Arc::new(Mutex::new(AppState::new(config)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;

    #[test]
    fn only_idle_is_not_busy() {
        assert!(!PipelineState::Idle.is_busy());
        for s in [
            PipelineState::Recording,
            PipelineState::Transcribed,
            PipelineState::Translating,
            PipelineState::Spoken,
            PipelineState::Error,
        ] {
            assert!(s.is_busy(), "{s:?} should be busy");
        }
    }

    #[test]
    fn labels() {
        assert_eq!(PipelineState::Idle.label(), "Idle");
        assert_eq!(PipelineState::Recording.label(), "Listening");
        assert_eq!(PipelineState::Translating.label(), "Translating");
    }

    #[test]
    fn default_pipeline_state_is_idle() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
    }

    #[test]
    fn input_field_counts_characters_not_bytes() {
        let mut field = InputField::new(500);
        field.set_text("مرحبا");
        assert_eq!(field.char_count(), 5);
        assert_eq!(field.char_count_label(), "5/500");
    }

    #[test]
    fn input_field_truncates_at_max_chars() {
        let mut field = InputField::new(3);
        field.set_text("héllo");
        assert_eq!(field.text(), "hél");
        field.set_text("abc");
        assert_eq!(field.text(), "abc");
    }

    #[test]
    fn clear_affordance_follows_text() {
        let mut field = InputField::new(10);
        assert!(!field.show_clear());
        field.set_text("x");
        assert!(field.show_clear());
        field.clear();
        assert!(!field.show_clear());
        assert_eq!(field.char_count_label(), "0/10");
    }

    #[test]
    fn result_view_text() {
        assert_eq!(ResultView::Placeholder.text(), RESULT_PLACEHOLDER);
        assert_eq!(ResultView::Pending.text(), "");
        let view = ResultView::Translation("مرحبا".into());
        assert_eq!(view.text(), "مرحبا");
        assert_eq!(view.translation(), Some("مرحبا"));
        assert!(ResultView::Error("x".into()).is_error());
    }

    #[test]
    fn app_state_defaults() {
        let state = AppState::default();
        assert_eq!(state.pipeline, PipelineState::Idle);
        assert_eq!(state.direction.current(), Direction::Forward);
        assert_eq!(state.input.max_chars(), 500);
        assert_eq!(state.result, ResultView::Placeholder);
        assert!(!state.loading);
        assert!(!state.recording);
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state(&AppConfig::default());
        let state2 = Arc::clone(&state);

        state.lock().pipeline = PipelineState::Recording;
        assert_eq!(state2.lock().pipeline, PipelineState::Recording);
    }
}
