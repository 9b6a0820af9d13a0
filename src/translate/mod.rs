//! Client for the remote translation service.
//!
//! ```text
//! TranslationRequest ──▶ dyn Translator ──▶ TranslationOutcome
//!  (trimmed, ≤ max)       HttpTranslator     Success{translated_text}
//!                         POST + Basic auth  ServerError{status_code}
//!                                            TransportError
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use voice_translator::config::AppConfig;
//! use voice_translator::direction::Direction;
//! use voice_translator::translate::{HttpTranslator, TranslationRequest, Translator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = HttpTranslator::from_config(&config.backend, &config.languages);
//!     let req = TranslationRequest::new("Hello", Direction::Forward, 500).unwrap();
//!     println!("{:?}", client.translate(&req).await);
//! }
//! ```

pub mod client;
pub mod request;

pub use client::{HttpTranslator, Translator};
pub use request::{RequestError, TranslationOutcome, TranslationRequest};
