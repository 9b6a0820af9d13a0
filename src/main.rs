//! Application entry point: translator popup.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the translator, recognizer and synthesizer from config.
//! 5. Create the shared state and the [`VoiceOrchestrator`].
//! 6. With the `desktop` feature, start the gesture listener thread and the
//!    selection capture task feeding the [`SelectionStore`].
//! 7. Run [`eframe::run_native`], which blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use voice_translator::{
    app::TranslatorApp,
    config::AppConfig,
    pipeline::{new_shared_state, VoiceOrchestrator},
    selection::{SelectionStore, SelectionSync},
    speech::{recognizer_from_config, CommandSynthesizer},
    translate::HttpTranslator,
};

// ---------------------------------------------------------------------------
// Selection capture (desktop)
// ---------------------------------------------------------------------------

/// Wire global gestures → selection capture → store.  The returned listener
/// must stay alive for as long as capture should run.
#[cfg(feature = "desktop")]
fn start_selection_capture(
    rt: &tokio::runtime::Runtime,
    config: &AppConfig,
    store: SelectionStore,
) -> Option<voice_translator::gesture::GestureListener> {
    use std::time::Duration;

    use voice_translator::gesture::GestureListener;
    use voice_translator::selection::{PrimarySelection, SelectionCapture};

    if !config.selection.enabled {
        return None;
    }

    let (gesture_tx, gesture_rx) = tokio::sync::mpsc::channel(32);
    let listener = match GestureListener::start(
        Duration::from_millis(config.selection.double_click_ms),
        gesture_tx,
    ) {
        Ok(l) => l,
        Err(e) => {
            log::warn!("Selection capture unavailable: {e}");
            return None;
        }
    };

    let capture = SelectionCapture::new(
        Arc::new(PrimarySelection::new()),
        store,
        Duration::from_millis(config.selection.settle_delay_ms),
    );
    rt.spawn(capture.run(gesture_rx));
    log::info!("Selection capture started");
    Some(listener)
}

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_decorations(false)
        .with_transparent(true)
        .with_inner_size([380.0, 320.0])
        .with_min_inner_size([300.0, 240.0]);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Voice translator starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Adapters
    let translator = Arc::new(HttpTranslator::from_config(&config.backend, &config.languages));
    log::info!("Translation backend: {}", translator.endpoint());
    let synthesizer = Arc::new(CommandSynthesizer::from_config(&config.synthesis));
    let recognizer = recognizer_from_config(&config);

    // 5. State + orchestrator
    let state = new_shared_state(&config);
    let orchestrator = Arc::new(VoiceOrchestrator::new(
        state,
        &config.languages,
        recognizer,
        translator,
        synthesizer,
    ));
    if !orchestrator.synthesis_available() {
        log::warn!(
            "Speech synthesis command '{}' not found; Speak is disabled",
            config.synthesis.command
        );
    }

    // 6. Selection capture
    let store = SelectionStore::new();
    #[cfg(feature = "desktop")]
    let _gestures = start_selection_capture(&rt, &config, store.clone());

    // 7. UI (blocks until the window is closed)
    let app = TranslatorApp::new(
        orchestrator,
        SelectionSync::new(&store),
        rt.handle().clone(),
        config.clone(),
    );
    eframe::run_native(
        "Voice Translator",
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))?;

    log::info!("Voice translator closing");
    Ok(())
}
