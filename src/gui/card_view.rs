use eframe::egui::{
    self,
    RichText,
};
use egui_extras::syntax_highlighting::{
    code_view_ui,
    CodeTheme,
};

use crate::{
    cards::Card,
    gui::theme::Theme,
};

/// Seconds the "Copied" confirmation stays visible.
const COPIED_FEEDBACK_SECS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    Code,
    Output,
}

#[derive(Default)]
pub struct CardView {
    copied: Option<(CopyTarget, f64)>,
}

impl CardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, card: &Card, theme: &Theme) {
        let ctx = ui.ctx().clone();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_max_width(720.0);

            ui.horizontal(|ui| {
                Self::chip(ui, card.category.label(), theme.accent(&ctx));
                Self::chip(ui, card.difficulty.label(), theme.difficulty(&ctx, card.difficulty));
            });

            ui.add_space(6.0);
            ui.label(RichText::new(&card.name).monospace().size(28.0).strong());
            ui.label(RichText::new(&card.signature).monospace().color(theme.muted(&ctx)));

            ui.add_space(12.0);
            ui.label(theme.heading(&ctx, "What is it?"));
            ui.label(RichText::new(&card.description).size(16.0));

            ui.add_space(12.0);
            self.section_header(ui, theme, "Example", CopyTarget::Code, &card.code_example);
            let code_theme = CodeTheme::from_memory(&ctx, ui.style());
            code_view_ui(ui, &code_theme, &card.code_example, "py");

            ui.add_space(8.0);
            self.section_header(ui, theme, "Output", CopyTarget::Output, &card.output);
            egui::Frame::canvas(ui.style()).show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(&card.output).monospace().color(theme.green(&ctx)));
            });
        });
    }

    /// Puts `text` on the clipboard and starts the confirmation timer.
    pub fn copy(&mut self, ctx: &egui::Context, target: CopyTarget, text: &str) {
        ctx.copy_text(text.to_string());
        self.copied = Some((target, ctx.input(|i| i.time)));
        ctx.request_repaint_after_secs(COPIED_FEEDBACK_SECS as f32);
    }

    pub fn is_copied(&self, target: CopyTarget, now: f64) -> bool {
        matches!(self.copied, Some((copied, at)) if copied == target && now - at < COPIED_FEEDBACK_SECS)
    }

    fn section_header(
        &mut self,
        ui: &mut egui::Ui,
        theme: &Theme,
        title: &str,
        target: CopyTarget,
        text: &str,
    ) {
        let ctx = ui.ctx().clone();
        let now = ctx.input(|i| i.time);

        ui.horizontal(|ui| {
            ui.label(theme.heading(&ctx, title));
            if self.is_copied(target, now) {
                ui.label(RichText::new("✔ Copied").small().color(theme.green(&ctx)));
            } else if ui.small_button("📋 Copy").on_hover_text("Copy to clipboard").clicked() {
                self.copy(&ctx, target, text);
            }
        });
    }

    fn chip(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
        ui.label(RichText::new(format!("[{text}]")).small().strong().color(color));
    }
}
