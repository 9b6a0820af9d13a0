//! Audio helpers for the native recognizer.
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → downmix → resample
//!           → UtteranceEndpoint (stop on trailing silence) → trim_silence
//! ```
//!
//! Device capture is only compiled with the `native-speech` feature; the
//! signal helpers are plain functions and always available.

#[cfg(feature = "native-speech")]
pub mod capture;
pub mod resample;
pub mod vad;

#[cfg(feature = "native-speech")]
pub use capture::{AudioChunk, CaptureError, Microphone, StreamHandle};
pub use resample::{downmix, resample, to_recognizer_rate, RECOGNIZER_RATE};
pub use vad::{Endpoint, UtteranceEndpoint, VadDetector, FRAME_SAMPLES};
