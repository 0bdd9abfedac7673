use eframe::egui::{
    self,
    RichText,
};

use crate::{
    core::QueueError,
    gui::theme::Theme,
};

/// Error, loading and startup states shown in place of a card.
pub struct StatusPanel;

impl StatusPanel {
    /// Returns `true` when the user asked to retry.
    pub fn error(ui: &mut egui::Ui, error: &QueueError, theme: &Theme) -> bool {
        let mut retry = false;

        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.set_max_width(420.0);
                ui.vertical_centered(|ui| {
                    let icon = if error.is_empty_result() { "🔍" } else { "⚠" };
                    ui.label(RichText::new(icon).size(28.0).color(theme.red(ui.ctx())));
                    ui.label(RichText::new(error.title()).size(18.0).strong());
                    ui.add_space(8.0);
                    ui.label(RichText::new(error.to_string()).color(theme.muted(ui.ctx())));
                    ui.add_space(16.0);
                    retry = ui.button("⟳ Retry").clicked();
                });
            });
        });

        retry
    }

    pub fn loading(ui: &mut egui::Ui, message: &str, theme: &Theme) {
        ui.vertical_centered(|ui| {
            ui.add_space(96.0);
            ui.add(egui::Spinner::new().size(40.0).color(theme.accent(ui.ctx())));
            ui.add_space(12.0);
            ui.label(RichText::new(message).color(theme.muted(ui.ctx())));
        });
    }

    pub fn startup(ctx: &egui::Context, source_name: &str, theme: &Theme) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() / 3.0);
                ui.add(egui::Spinner::new().size(48.0).color(theme.accent(ctx)));
                ui.add_space(16.0);
                ui.label(RichText::new("Starting TorchLearn...").size(20.0).strong());
                ui.label(
                    RichText::new(format!("Preparing your first PyTorch cards from {source_name}"))
                        .color(theme.muted(ctx)),
                );
            });
        });
    }
}
