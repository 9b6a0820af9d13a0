//! Where settings and speech models live.
//!
//! ```text
//! <config root>/voice-translator/settings.toml
//! <data root>/voice-translator/models/<model>.bin
//! ```
//!
//! The roots come from `dirs` (`~/.config` and `~/.local/share` on Linux,
//! `%APPDATA%` / `%LOCALAPPDATA%` on Windows, `~/Library/Application Support`
//! on macOS).

use std::path::{Path, PathBuf};

const APP_DIR: &str = "voice-translator";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
    /// Whisper GGML models (`native-speech`).
    pub models_dir: PathBuf,
}

impl AppPaths {
    /// Platform directories; the working directory stands in for any the
    /// platform does not report.
    pub fn new() -> Self {
        let here = || PathBuf::from(".");
        Self::with_roots(
            &dirs::config_dir().unwrap_or_else(here),
            &dirs::data_local_dir().unwrap_or_else(here),
        )
    }

    pub fn with_roots(config_root: &Path, data_root: &Path) -> Self {
        let config_dir = config_root.join(APP_DIR);
        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            models_dir: data_root.join(APP_DIR).join("models"),
        }
    }

    /// Resolve `recognition.model`.  A bare stem such as `ggml-base` maps
    /// into [`models_dir`](Self::models_dir); anything that already looks
    /// like a file path is used as given.
    pub fn model_file(&self, model: &str) -> PathBuf {
        let as_path = Path::new(model);
        if as_path.components().count() > 1 || model.ends_with(".bin") {
            return as_path.to_path_buf();
        }
        self.models_dir.join(format!("{model}.bin"))
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_under_explicit_roots() {
        let paths = AppPaths::with_roots(Path::new("/cfg"), Path::new("/data"));
        assert_eq!(
            paths.settings_file,
            Path::new("/cfg/voice-translator/settings.toml")
        );
        assert_eq!(paths.models_dir, Path::new("/data/voice-translator/models"));
    }

    #[test]
    fn platform_paths_end_in_app_dir() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.ends_with(APP_DIR));
        assert!(paths.settings_file.starts_with(&paths.config_dir));
    }

    #[test]
    fn model_stem_maps_into_models_dir() {
        let paths = AppPaths::with_roots(Path::new("/cfg"), Path::new("/data"));
        assert_eq!(
            paths.model_file("ggml-base"),
            Path::new("/data/voice-translator/models/ggml-base.bin")
        );
    }

    #[test]
    fn model_path_is_used_as_given() {
        let paths = AppPaths::with_roots(Path::new("/cfg"), Path::new("/data"));
        assert_eq!(
            paths.model_file("/opt/whisper/ggml-small.bin"),
            Path::new("/opt/whisper/ggml-small.bin")
        );
        assert_eq!(paths.model_file("tiny.bin"), Path::new("tiny.bin"));
        assert!(paths.model_file("ggml-base.en").ends_with("models/ggml-base.en.bin"));
    }
}
