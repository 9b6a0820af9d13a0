//! Speech input (recognition) and output (synthesis).
//!
//! # Architecture
//!
//! ```text
//! ┌───────────── SpeechInput ─────────────┐   ┌──────── SpeechOutput ────────┐
//! │ direction → input tag                 │   │ direction → output tag       │
//! │ RecordingSession slot (one at a time) │   │ cancel, then speak           │
//! │          │                            │   │          │                   │
//! │          ▼                            │   │          ▼                   │
//! │  dyn SpeechRecognizer                 │   │  dyn SpeechSynthesizer       │
//! │   ├─ WhisperRecognizer (cpal+whisper) │   │   └─ CommandSynthesizer      │
//! │   └─ NoRecognizer                     │   │        (espeak-ng, say, …)   │
//! └───────────────────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! Both host capabilities are probed with `is_available()` before use; an
//! absent capability degrades silently.

pub mod command;
pub mod input;
pub mod output;

#[cfg(feature = "native-speech")]
pub mod whisper;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use command::CommandSynthesizer;
pub use input::{NoRecognizer, RecordingSession, SpeechError, SpeechInput, SpeechRecognizer};
pub use output::{SpeechOutput, SpeechSynthesizer, SynthesisError};

#[cfg(feature = "native-speech")]
pub use whisper::WhisperRecognizer;

use std::sync::Arc;

use crate::config::AppConfig;

/// The best recognizer this build can offer.
///
/// With `native-speech`, loads the configured Whisper model; a missing or
/// broken model degrades to [`NoRecognizer`] with a warning.
pub fn recognizer_from_config(config: &AppConfig) -> Arc<dyn SpeechRecognizer> {
    #[cfg(feature = "native-speech")]
    {
        let path = crate::config::AppPaths::new().model_file(&config.recognition.model);
        match WhisperRecognizer::load(&path, config.recognition.clone()) {
            Ok(recognizer) => return Arc::new(recognizer),
            Err(e) => log::warn!("speech: recognition disabled: {e}"),
        }
    }
    #[cfg(not(feature = "native-speech"))]
    {
        let _ = config;
        log::info!("speech: built without native-speech, recognition disabled");
    }
    Arc::new(NoRecognizer)
}

/// Primary language subtag of a BCP-47 tag, lowercased: `"ar-MA"` → `"ar"`.
pub fn primary_subtag(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "native-speech"))]
    #[test]
    fn recognizer_without_native_speech_is_unavailable() {
        assert!(!recognizer_from_config(&AppConfig::default()).is_available());
    }

    #[test]
    fn primary_subtag_strips_region() {
        assert_eq!(primary_subtag("en-US"), "en");
        assert_eq!(primary_subtag("ar_MA"), "ar");
        assert_eq!(primary_subtag("FR"), "fr");
        assert_eq!(primary_subtag(""), "");
    }
}
