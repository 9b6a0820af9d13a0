//! `Translator` trait and its HTTP implementation.
//!
//! [`HttpTranslator`] posts `{"text", "direction"}` as JSON to the configured
//! endpoint with a static HTTP Basic credential and classifies whatever comes
//! back into a [`TranslationOutcome`].  There are no retries; the request
//! timeout is whatever `backend.timeout_secs` says (none by default).

use std::time::Duration;

use async_trait::async_trait;

use super::request::{TranslationOutcome, TranslationRequest, WireRequest};
use crate::config::BackendConfig;
use crate::direction::LanguagePair;

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// One request, one classified outcome.  Never fails in the `Result` sense;
/// every failure mode is a [`TranslationOutcome`] variant.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> TranslationOutcome;
}

// ---------------------------------------------------------------------------
// HttpTranslator
// ---------------------------------------------------------------------------

pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
    languages: LanguagePair,
}

impl std::fmt::Debug for HttpTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTranslator")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl HttpTranslator {
    /// Build from the `backend` and `languages` settings.
    ///
    /// Falls back to a default client if the builder rejects the
    /// configuration.
    pub fn from_config(backend: &BackendConfig, languages: &LanguagePair) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = backend.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|e| {
            log::warn!("translate: client builder failed ({e}), using defaults");
            reqwest::Client::new()
        });

        Self {
            client,
            endpoint: backend.endpoint.clone(),
            username: backend.username.clone(),
            password: backend.password.clone(),
            languages: languages.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, request: &TranslationRequest) -> TranslationOutcome {
        let body = WireRequest {
            text: request.text(),
            direction: self.languages.wire_code(request.direction()),
        };
        log::debug!(
            "translate: POST {} ({} chars, {})",
            self.endpoint,
            request.text().chars().count(),
            body.direction
        );

        let response = match self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                log::warn!("translate: transport error: {e}");
                return TranslationOutcome::TransportError;
            }
        };

        let status = response.status().as_u16();
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                log::warn!("translate: failed reading response body (HTTP {status}): {e}");
                return TranslationOutcome::TransportError;
            }
        };

        let outcome = TranslationOutcome::classify(status, &bytes);
        if let TranslationOutcome::ServerError { status_code } = outcome {
            log::warn!("translate: server error (HTTP {status_code})");
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
