//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::direction::LanguagePair;

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Connection details for the remote translation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Full URL the translation request is POSTed to.
    pub endpoint: String,
    /// Basic-auth user of the static shared credential.
    pub username: String,
    /// Basic-auth password of the static shared credential.
    pub password: String,
    /// Maximum characters accepted in the input field and in a request.
    pub max_chars: usize,
    /// Optional transport timeout.  `None` waits for the transport itself.
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/translator-backend/api/translate".into(),
            username: "darija-client".into(),
            password: "darija-secret".into(),
            max_chars: 500,
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// RecognitionConfig
// ---------------------------------------------------------------------------

/// Settings for the local Whisper recognizer (`native-speech` feature).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// GGML model file stem inside the models directory (e.g. `"ggml-base"`).
    pub model: String,
    /// RMS threshold above which a 30 ms frame counts as speech.
    pub vad_threshold: f32,
    /// Trailing silence that ends an utterance once speech was heard.
    pub silence_secs: f32,
    /// Hard cap on a single utterance.
    pub max_utterance_secs: f32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            model: "ggml-base".into(),
            vad_threshold: 0.01,
            silence_secs: 1.2,
            max_utterance_secs: 15.0,
        }
    }
}

// ---------------------------------------------------------------------------
// SynthesisConfig
// ---------------------------------------------------------------------------

/// External text-to-speech command.
///
/// Argument placeholders: `{lang}` primary language subtag (`"ar"`),
/// `{tag}` full tag (`"ar-MA"`), `{text}` the utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            command: "espeak-ng".into(),
            args: vec!["-v".into(), "{lang}".into(), "{text}".into()],
        }
    }
}

// ---------------------------------------------------------------------------
// SelectionConfig
// ---------------------------------------------------------------------------

/// Global text-selection capture (`desktop` feature).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Watch selection gestures at all.
    pub enabled: bool,
    /// Delay between the gesture and sampling the selection, letting the
    /// host finish updating it.
    pub settle_delay_ms: u64,
    /// Two presses closer than this count as a double click.
    pub double_click_ms: u64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            settle_delay_ms: 50,
            double_click_ms: 400,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Popup window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels.
    pub window_position: Option<(f32, f32)>,
    /// Keep the popup floating above all other windows.
    pub always_on_top: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_position: None,
            always_on_top: true,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use voice_translator::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// println!("{}", config.backend.endpoint);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub languages: LanguagePair,
    pub recognition: RecognitionConfig,
    pub synthesis: SynthesisConfig,
    pub selection: SelectionConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.backend.endpoint, loaded.backend.endpoint);
        assert_eq!(original.backend.username, loaded.backend.username);
        assert_eq!(original.backend.max_chars, loaded.backend.max_chars);
        assert_eq!(original.backend.timeout_secs, loaded.backend.timeout_secs);
        assert_eq!(original.languages, loaded.languages);
        assert_eq!(original.recognition.model, loaded.recognition.model);
        assert_eq!(original.synthesis.args, loaded.synthesis.args);
        assert_eq!(
            original.selection.settle_delay_ms,
            loaded.selection.settle_delay_ms
        );
        assert_eq!(original.ui.always_on_top, loaded.ui.always_on_top);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.backend.endpoint, BackendConfig::default().endpoint);
        assert_eq!(config.languages, LanguagePair::default());
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(
            cfg.backend.endpoint,
            "http://localhost:8080/translator-backend/api/translate"
        );
        assert_eq!(cfg.backend.username, "darija-client");
        assert_eq!(cfg.backend.max_chars, 500);
        assert!(cfg.backend.timeout_secs.is_none());
        assert_eq!(cfg.languages.forward_code, "EN_DA");
        assert_eq!(cfg.languages.source.tag, "en-US");
        assert_eq!(cfg.languages.target.tag, "ar-MA");
        assert_eq!(cfg.synthesis.command, "espeak-ng");
        assert_eq!(cfg.selection.settle_delay_ms, 50);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.backend.endpoint = "https://translate.example.com/api".into();
        cfg.backend.timeout_secs = Some(20);
        cfg.languages.forward_code = "FORWARD".into();
        cfg.languages.reverse_code = "REVERSE".into();
        cfg.selection.enabled = false;
        cfg.ui.window_position = Some((100.0, 200.0));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.backend.endpoint, "https://translate.example.com/api");
        assert_eq!(loaded.backend.timeout_secs, Some(20));
        assert_eq!(loaded.languages.forward_code, "FORWARD");
        assert_eq!(loaded.languages.reverse_code, "REVERSE");
        assert!(!loaded.selection.enabled);
        assert_eq!(loaded.ui.window_position, Some((100.0, 200.0)));
    }

    #[test]
    fn partial_file_fills_missing_sections() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[backend]\nendpoint = \"http://10.0.0.2/api/translate\"\nusername = \"u\"\npassword = \"p\"\nmax_chars = 200\n",
        )
        .expect("write");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(loaded.backend.endpoint, "http://10.0.0.2/api/translate");
        assert_eq!(loaded.backend.max_chars, 200);
        assert_eq!(loaded.languages, LanguagePair::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "backend = 42").expect("write");
        assert!(AppConfig::load_from(&path).is_err());
    }
}
