//! Request and outcome value types for one translation exchange.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::direction::Direction;

// ---------------------------------------------------------------------------
// RequestError
// ---------------------------------------------------------------------------

/// Reasons a [`TranslationRequest`] cannot be built.  Both are caught before
/// any I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("no text to translate")]
    EmptyInput,

    #[error("text is {len} characters, the limit is {max}")]
    TooLong { len: usize, max: usize },
}

// ---------------------------------------------------------------------------
// TranslationRequest
// ---------------------------------------------------------------------------

/// Validated input for one exchange: non-empty, trimmed, within the limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    text: String,
    direction: Direction,
}

impl TranslationRequest {
    /// Trim `text` and validate it against `max_chars` (counted in
    /// characters, not bytes).
    ///
    /// ```
    /// use voice_translator::direction::Direction;
    /// use voice_translator::translate::{RequestError, TranslationRequest};
    ///
    /// let req = TranslationRequest::new("  Hello ", Direction::Forward, 500).unwrap();
    /// assert_eq!(req.text(), "Hello");
    /// assert_eq!(
    ///     TranslationRequest::new(" \n ", Direction::Forward, 500),
    ///     Err(RequestError::EmptyInput)
    /// );
    /// ```
    pub fn new(text: &str, direction: Direction, max_chars: usize) -> Result<Self, RequestError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RequestError::EmptyInput);
        }
        let len = text.chars().count();
        if len > max_chars {
            return Err(RequestError::TooLong { len, max: max_chars });
        }
        Ok(Self {
            text: text.to_string(),
            direction,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// JSON body posted to the backend.
#[derive(Debug, Serialize)]
pub(crate) struct WireRequest<'a> {
    pub text: &'a str,
    pub direction: &'a str,
}

/// Success body.  `translatedText` is optional here so a 200 without it can
/// be classified rather than failing to parse.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(rename = "translatedText", default)]
    translated_text: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// TranslationOutcome
// ---------------------------------------------------------------------------

/// Classified result of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Success { translated_text: String },
    /// The service answered but did not deliver a translation.
    ServerError { status_code: u16 },
    /// No usable response at all.
    TransportError,
}

impl TranslationOutcome {
    /// Classify a complete HTTP response.
    ///
    /// Only `200 OK` with a non-empty string `translatedText` is a success.
    /// Anything else the server sent back, other 2xx codes included, is a
    /// `ServerError` with the response status.
    pub fn classify(status_code: u16, body: &[u8]) -> Self {
        if status_code != 200 {
            return TranslationOutcome::ServerError { status_code };
        }
        let text = serde_json::from_slice::<WireResponse>(body)
            .ok()
            .and_then(|r| r.translated_text)
            .and_then(|v| match v {
                serde_json::Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            });
        match text {
            Some(translated_text) => TranslationOutcome::Success { translated_text },
            None => TranslationOutcome::ServerError { status_code },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TranslationOutcome::Success { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
