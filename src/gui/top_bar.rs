use eframe::egui;

use crate::{
    cards::Category,
    core::QueueState,
    gui::theme::Theme,
};

const DOCS_URL: &str = "https://pytorch.org/docs/stable/index.html";

#[derive(Debug, Clone, PartialEq)]
pub enum TopBarAction {
    SearchChanged(String),
    SubmitSearch,
    ClearSearch,
    SelectCategory(Category),
    ThemeChanged,
}

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        state: &QueueState,
        theme: &Theme,
        source_name: &str,
    ) -> Vec<TopBarAction> {
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.label(theme.heading(ctx, "🔥 TorchLearn"));
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let before = ctx.options(|o| o.theme_preference);
                    egui::widgets::global_theme_preference_switch(ui);
                    if ctx.options(|o| o.theme_preference) != before {
                        actions.push(TopBarAction::ThemeChanged);
                    }

                    ui.hyperlink_to("PyTorch docs", DOCS_URL);
                    ui.label(
                        egui::RichText::new(format!("✔ Learned {}", state.history().len()))
                            .color(theme.green(ctx)),
                    );
                    ui.label(egui::RichText::new(source_name).small().color(theme.muted(ctx)));
                });
            });

            ui.add_space(4.0);
            Self::search_box(ui, state, &mut actions);
            ui.add_space(4.0);
            Self::category_pills(ui, state, &mut actions);
            ui.add_space(4.0);
        });

        actions
    }

    fn search_box(ui: &mut egui::Ui, state: &QueueState, actions: &mut Vec<TopBarAction>) {
        ui.horizontal(|ui| {
            let mut text = state.search_input().to_string();
            let clear_width = if text.is_empty() { 0.0 } else { 28.0 };

            let response = ui.add(
                egui::TextEdit::singleline(&mut text)
                    .hint_text("🔍 Search functions (e.g. torch.matmul, Conv2d)...")
                    .desired_width(ui.available_width() - clear_width),
            );

            if response.changed() {
                actions.push(TopBarAction::SearchChanged(text.clone()));
            }

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                actions.push(TopBarAction::SubmitSearch);
            }

            if !text.is_empty() && ui.small_button("✖").on_hover_text("Clear search").clicked() {
                actions.push(TopBarAction::ClearSearch);
            }
        });
    }

    fn category_pills(ui: &mut egui::Ui, state: &QueueState, actions: &mut Vec<TopBarAction>) {
        ui.horizontal_wrapped(|ui| {
            for category in Category::ALL_CATEGORIES {
                let selected = state.selected_category() == category && !state.is_searching();
                if ui.selectable_label(selected, category.label()).clicked() {
                    actions.push(TopBarAction::SelectCategory(category));
                }
            }
        });
    }
}
