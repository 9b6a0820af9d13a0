//! Translator popup: egui/eframe application.
//!
//! # Architecture
//!
//! [`TranslatorApp`] is the top-level [`eframe::App`].  It holds no pipeline
//! state of its own: every frame it
//!
//! 1. pulls any new text selection into the input field ([`SelectionSync`]),
//! 2. snapshots [`AppState`] under the lock,
//! 3. renders the snapshot, and
//! 4. forwards button presses to the [`VoiceOrchestrator`], spawning the
//!    async triggers on the tokio runtime.
//!
//! # Layout
//!
//! ```text
//! ┌───────────────────────────────────────┐
//! │ ●  English  ⇄  Darija          [-][x] │  title bar (drag to move)
//! ├───────────────────────────────────────┤
//! │ ┌───────────────────────────────────┐ │
//! │ │ input text                        │ │
//! │ └───────────────────────────────────┘ │
//! │ 12/500                        [Clear] │
//! │ [Translate] [Mic] [Voice ⇄ Voice]     │
//! ├───────────────────────────────────────┤
//! │ result / placeholder / error          │
//! │                              [Speak]  │
//! └───────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::runtime::Handle;

use crate::config::AppConfig;
use crate::pipeline::{AppState, PipelineState, ResultView, VoiceOrchestrator};
use crate::selection::SelectionSync;

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// Async actions a button can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Translate,
    Mic,
    VoiceToVoice,
    Speak,
}

// ---------------------------------------------------------------------------
// TranslatorApp
// ---------------------------------------------------------------------------

/// eframe application: the floating translator popup.
pub struct TranslatorApp {
    orchestrator: Arc<VoiceOrchestrator>,
    selection: SelectionSync,
    runtime: Handle,
    config: AppConfig,
    /// Spinner animation phase (advances each frame while busy).
    spinner_phase: f32,
}

impl TranslatorApp {
    /// * `orchestrator`: shared pipeline driver; its state is what we render.
    /// * `selection`: subscriber to the selection store.
    /// * `runtime`: where async triggers are spawned.
    pub fn new(
        orchestrator: Arc<VoiceOrchestrator>,
        selection: SelectionSync,
        runtime: Handle,
        config: AppConfig,
    ) -> Self {
        Self {
            orchestrator,
            selection,
            runtime,
            config,
            spinner_phase: 0.0,
        }
    }

    fn fire(&self, trigger: Trigger, ctx: &egui::Context) {
        let orchestrator = Arc::clone(&self.orchestrator);
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            match trigger {
                Trigger::Translate => {
                    let outcome = orchestrator.translate().await;
                    log::debug!("ui: translate → {outcome:?}");
                }
                Trigger::Mic => {
                    let outcome = orchestrator.mic().await;
                    log::debug!("ui: mic → {outcome:?}");
                }
                Trigger::VoiceToVoice => {
                    let outcome = orchestrator.voice_to_voice().await;
                    log::debug!("ui: voice-to-voice → {outcome:?}");
                }
                Trigger::Speak => {
                    orchestrator.speak_result().await;
                }
            }
            ctx.request_repaint();
        });
        // Show the new phase immediately.
        ctx.request_repaint();
    }

    // ── Sections ──────────────────────────────────────────────────────────

    fn draw_title_bar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, snap: &AppState) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(status_icon(snap)).color(state_color(snap.pipeline)));

            let labels = snap.direction.labels();
            let title = ui.label(
                egui::RichText::new(&labels.source)
                    .color(egui::Color32::from_rgb(200, 200, 200))
                    .size(13.0),
            );
            if title.is_pointer_button_down_on() {
                if let Some(outer_rect) = ctx.input(|i| i.viewport().outer_rect) {
                    let delta = ctx.input(|i| i.pointer.delta());
                    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(
                        outer_rect.min + delta,
                    ));
                }
            }
            if ui
                .add(egui::Button::new(egui::RichText::new("⇄").size(13.0)).frame(false))
                .on_hover_text("Swap languages")
                .clicked()
            {
                self.orchestrator.swap();
            }
            ui.label(
                egui::RichText::new(&labels.target)
                    .color(egui::Color32::from_rgb(200, 200, 200))
                    .size(13.0),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(
                        egui::Button::new(
                            egui::RichText::new("x").color(egui::Color32::from_rgb(200, 100, 100)),
                        )
                        .frame(false),
                    )
                    .clicked()
                {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                if ui
                    .add(
                        egui::Button::new(
                            egui::RichText::new("-").color(egui::Color32::from_rgb(150, 150, 150)),
                        )
                        .frame(false),
                    )
                    .clicked()
                {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(true));
                }
            });
        });
    }

    fn draw_input(&mut self, ui: &mut egui::Ui, snap: &AppState) {
        let mut draft = snap.input.text().to_string();
        let response = ui.add(
            egui::TextEdit::multiline(&mut draft)
                .char_limit(snap.input.max_chars())
                .desired_rows(4)
                .desired_width(f32::INFINITY)
                .hint_text("Type or select text to translate"),
        );
        if response.changed() {
            self.orchestrator.set_input(&draft);
        }

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(snap.input.char_count_label())
                    .color(egui::Color32::from_rgb(140, 140, 140))
                    .size(11.0),
            );
            if snap.input.show_clear() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Clear").clicked() {
                        self.orchestrator.clear();
                    }
                });
            }
        });
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, snap: &AppState) {
        let idle = !snap.pipeline.is_busy();
        let can_record = idle && self.orchestrator.recognition_available();

        ui.horizontal(|ui| {
            if ui.add_enabled(idle, egui::Button::new("Translate")).clicked() {
                self.fire(Trigger::Translate, ctx);
            }
            let mic = ui
                .add_enabled(can_record, egui::Button::new("Mic"))
                .on_disabled_hover_text("Speech recognition is not available");
            if mic.clicked() {
                self.fire(Trigger::Mic, ctx);
            }
            if ui
                .add_enabled(can_record, egui::Button::new("Voice ⇄ Voice"))
                .clicked()
            {
                self.fire(Trigger::VoiceToVoice, ctx);
            }
            if !idle {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Cancel").clicked() {
                        self.orchestrator.reset();
                    }
                });
            }
        });
    }

    fn draw_result(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, snap: &AppState) {
        if snap.recording {
            ui.label(
                egui::RichText::new("● Listening...").color(egui::Color32::from_rgb(255, 80, 80)),
            );
        }
        if snap.loading {
            ui.label(
                egui::RichText::new(format!("{} Translating...", self.spinner_char()))
                    .color(egui::Color32::from_rgb(68, 136, 255)),
            );
        }

        let color = match &snap.result {
            ResultView::Placeholder | ResultView::Pending => egui::Color32::from_rgb(120, 120, 120),
            ResultView::Translation(_) => egui::Color32::from_rgb(80, 200, 120),
            ResultView::Error(_) => egui::Color32::from_rgb(255, 136, 68),
        };
        egui::ScrollArea::vertical().max_height(90.0).show(ui, |ui| {
            ui.label(egui::RichText::new(snap.result.text()).color(color).size(14.0));
        });

        if let Some(text) = snap.result.translation() {
            ui.horizontal(|ui| {
                if ui.small_button("Copy").clicked() {
                    ctx.copy_text(text.to_string());
                }
                let speak = ui
                    .add_enabled(
                        self.orchestrator.synthesis_available(),
                        egui::Button::new(egui::RichText::new("Speak").size(11.0)),
                    )
                    .on_disabled_hover_text("Speech synthesis is not available");
                if speak.clicked() {
                    self.fire(Trigger::Speak, ctx);
                }
            });
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn spinner_char(&self) -> char {
        let chars = ['|', '/', '-', '\\'];
        chars[(self.spinner_phase as usize) % chars.len()]
    }
}

fn status_icon(snap: &AppState) -> &'static str {
    match snap.pipeline {
        PipelineState::Idle if snap.result.is_error() => "! ",
        PipelineState::Idle => "  ",
        PipelineState::Recording => "* ",
        PipelineState::Transcribed | PipelineState::Translating => ". ",
        PipelineState::Spoken => "~ ",
        PipelineState::Error => "! ",
    }
}

fn state_color(state: PipelineState) -> egui::Color32 {
    match state {
        PipelineState::Idle => egui::Color32::from_rgb(100, 100, 100),
        PipelineState::Recording => egui::Color32::from_rgb(255, 68, 68),
        PipelineState::Transcribed | PipelineState::Translating => {
            egui::Color32::from_rgb(68, 136, 255)
        }
        PipelineState::Spoken => egui::Color32::from_rgb(80, 200, 120),
        PipelineState::Error => egui::Color32::from_rgb(255, 136, 68),
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for TranslatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.config.selection.enabled {
            self.selection.sync_into(self.orchestrator.state());
        }
        let snap = self.orchestrator.state().lock().clone();

        if snap.pipeline.is_busy() {
            self.spinner_phase = (self.spinner_phase + 0.08) % 4.0;
            ctx.request_repaint_after(Duration::from_millis(66));
        } else {
            // Selections arrive from another thread; keep polling slowly.
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        let frame = egui::Frame::new()
            .fill(egui::Color32::from_rgba_premultiplied(30, 30, 30, 230))
            .corner_radius(egui::CornerRadius::same(8))
            .inner_margin(egui::Margin::same(8));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            self.draw_title_bar(ui, ctx, &snap);
            ui.separator();
            self.draw_input(ui, &snap);
            ui.add_space(4.0);
            self.draw_controls(ui, ctx, &snap);
            ui.separator();
            self.draw_result(ui, ctx, &snap);
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_icon_flags_error_left_on_surface() {
        let mut st = AppState::default();
        assert_eq!(status_icon(&st), "  ");
        st.result = ResultView::Error("Backend connection error".into());
        assert_eq!(status_icon(&st), "! ");
        st.pipeline = PipelineState::Recording;
        assert_eq!(status_icon(&st), "* ");
    }

    #[test]
    fn busy_states_are_coloured() {
        assert_ne!(
            state_color(PipelineState::Recording),
            state_color(PipelineState::Idle)
        );
        assert_eq!(
            state_color(PipelineState::Transcribed),
            state_color(PipelineState::Translating)
        );
    }
}
