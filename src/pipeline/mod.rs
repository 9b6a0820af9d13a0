//! Translation pipeline: the orchestrator and the state every front-end reads.
//!
//! # Architecture
//!
//! ```text
//!  UI trigger (button / CLI)
//!        │
//!        ▼
//!  VoiceOrchestrator::{mic, translate, voice_to_voice}   ← spawned tokio task
//!        │
//!        ├─ SpeechInput::capture(direction)     → Recording → Transcribed
//!        ├─ Translator::translate(request)      → Translating
//!        └─ SpeechOutput::speak(text, direction) → Spoken
//!
//!  SelectionSync ──▶ AppState.input
//!
//!  SharedState (Arc<Mutex<AppState>>) ←── read by the egui popup each frame
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voice_translator::config::AppConfig;
//! use voice_translator::pipeline::{new_shared_state, RunOutcome, VoiceOrchestrator};
//! use voice_translator::speech::{CommandSynthesizer, NoRecognizer};
//! use voice_translator::translate::HttpTranslator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let state = new_shared_state(&config);
//!     let orchestrator = Arc::new(VoiceOrchestrator::new(
//!         state.clone(),
//!         &config.languages,
//!         Arc::new(NoRecognizer),
//!         Arc::new(HttpTranslator::from_config(&config.backend, &config.languages)),
//!         Arc::new(CommandSynthesizer::from_config(&config.synthesis)),
//!     ));
//!
//!     orchestrator.set_input("Hello");
//!     if orchestrator.translate().await == RunOutcome::Completed {
//!         println!("{}", state.lock().result.text());
//!     }
//! }
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{PipelineError, RunOutcome, VoiceOrchestrator};
pub use state::{
    new_shared_state, AppState, InputField, PipelineState, ResultView, SharedState,
    RESULT_PLACEHOLDER,
};
