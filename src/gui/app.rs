use std::sync::Arc;

use eframe::egui::{
    self,
    RichText,
};

use super::{
    card_view::CardView,
    status_panel::StatusPanel,
    theme::{
        set_theme,
        Theme,
    },
    top_bar::{
        TopBar,
        TopBarAction,
    },
};
use crate::{
    core::{
        settings::SETTINGS_FILE,
        QueueController,
        Settings,
    },
    persistence::save_json,
    source::CardSource,
};

pub struct TorchLearnApp {
    controller: QueueController,
    settings: Settings,
    theme: Theme,
    card_view: CardView,
}

impl TorchLearnApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        source: Arc<dyn CardSource>,
    ) -> Self {
        let repaint_ctx = cc.egui_ctx.clone();
        let mut controller = QueueController::new(source)
            .with_repaint_hook(Arc::new(move || repaint_ctx.request_repaint()));

        let theme = Theme::torch();
        set_theme(&cc.egui_ctx, &theme);

        cc.egui_ctx.options_mut(|o| {
            o.theme_preference = if settings.dark_mode {
                egui::ThemePreference::Dark
            } else {
                egui::ThemePreference::Light
            };
        });

        controller.initial_load();

        Self { controller, settings, theme, card_view: CardView::new() }
    }

    fn handle_action(&mut self, action: TopBarAction, ctx: &egui::Context) {
        match action {
            TopBarAction::SearchChanged(text) => self.controller.set_search_input(text),
            TopBarAction::SubmitSearch => self.controller.submit_search(),
            TopBarAction::ClearSearch => self.controller.clear_search(),
            TopBarAction::SelectCategory(category) => self.controller.select_category(category),
            TopBarAction::ThemeChanged => {
                self.settings.dark_mode = match ctx.options(|o| o.theme_preference) {
                    egui::ThemePreference::Dark => true,
                    egui::ThemePreference::Light => false,
                    egui::ThemePreference::System => ctx.theme() == egui::Theme::Dark,
                };
                self.save_settings();
            }
        }
    }

    fn save_settings(&self) {
        if let Err(e) = save_json(&self.settings, SETTINGS_FILE) {
            log::error!("Failed to save settings: {}", e);
        }
    }

    fn show_content(&mut self, ui: &mut egui::Ui) {
        let state = self.controller.state();

        if let Some(error) = state.error() {
            if StatusPanel::error(ui, error, &self.theme) {
                self.controller.retry();
            }
            return;
        }

        let Some(card) = state.current_card() else {
            StatusPanel::loading(ui, "Fetching knowledge...", &self.theme);
            return;
        };

        let is_loading = state.is_loading();
        let hint = if state.is_searching() {
            "Marking this card as learned returns to browsing"
        } else {
            "Marking this card as learned brings up the next new function"
        };

        let mut advance = false;
        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                self.card_view.show(ui, card, &self.theme);
                ui.add_space(16.0);

                let label = if is_loading { "Loading..." } else { "✔ Got it  ▶" };
                let button = egui::Button::new(RichText::new(label).size(18.0).strong())
                    .min_size(egui::vec2(200.0, 44.0));
                advance = ui.add_enabled(!is_loading, button).clicked();

                ui.add_space(6.0);
                ui.label(RichText::new(hint).small().color(self.theme.muted(ui.ctx())));
            });
        });

        if advance {
            self.controller.advance();
        }
    }
}

impl eframe::App for TorchLearnApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();

        if self.controller.state().is_initializing() {
            StatusPanel::startup(ctx, self.controller.source_name(), &self.theme);
            return;
        }

        let actions =
            TopBar::show(ctx, self.controller.state(), &self.theme, self.controller.source_name());
        for action in actions {
            self.handle_action(action, ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_content(ui);
        });
    }
}
