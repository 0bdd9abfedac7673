use eframe::egui::{
    self,
    RichText,
};
use egui::{
    epaint::Shadow,
    style::{
        Selection,
        WidgetVisuals,
        Widgets,
    },
    Color32,
    Stroke,
    Visuals,
};

use crate::cards::Difficulty;

#[derive(Clone)]
pub struct Theme {
    dark: ThemeDetails,
    light: ThemeDetails,
}

impl Default for Theme {
    fn default() -> Self {
        Self::torch()
    }
}

impl Theme {
    pub fn torch() -> Self {
        Theme { dark: ThemeDetails::torch_night(), light: ThemeDetails::torch_day() }
    }

    fn details(&self, ctx: &egui::Context) -> &ThemeDetails {
        match ctx.theme() {
            egui::Theme::Dark => &self.dark,
            egui::Theme::Light => &self.light,
        }
    }

    pub fn accent(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).torch
    }

    pub fn muted(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).comment
    }

    pub fn red(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).red
    }

    pub fn green(&self, ctx: &egui::Context) -> Color32 {
        self.details(ctx).green
    }

    pub fn heading(&self, ctx: &egui::Context, content: &str) -> RichText {
        RichText::new(content).color(self.accent(ctx)).strong()
    }

    pub fn difficulty(&self, ctx: &egui::Context, difficulty: Difficulty) -> Color32 {
        let details = self.details(ctx);
        match difficulty {
            Difficulty::Beginner => details.green,
            Difficulty::Intermediate => details.yellow,
            Difficulty::Advanced => details.red,
        }
    }
}

#[derive(Clone)]
pub struct ThemeDetails {
    background: Color32,
    foreground: Color32,
    selection: Color32,
    comment: Color32,
    red: Color32,
    torch: Color32,
    yellow: Color32,
    green: Color32,
    background_darker: Color32,
    background_dark: Color32,
    background_light: Color32,
    background_lighter: Color32,
}

impl ThemeDetails {
    fn torch_night() -> Self {
        Self {
            background: Color32::from_rgb(24, 24, 32),
            foreground: Color32::from_rgb(226, 226, 230),
            selection: Color32::from_rgb(72, 52, 44),
            comment: Color32::from_rgb(130, 134, 150),
            red: Color32::from_rgb(255, 110, 110),
            torch: Color32::from_rgb(238, 76, 44),
            yellow: Color32::from_rgb(240, 200, 90),
            green: Color32::from_rgb(90, 205, 125),
            background_darker: Color32::from_rgb(17, 17, 23),
            background_dark: Color32::from_rgb(28, 28, 38),
            background_light: Color32::from_rgb(44, 44, 58),
            background_lighter: Color32::from_rgb(58, 58, 74),
        }
    }

    fn torch_day() -> Self {
        Self {
            background: Color32::from_rgb(248, 250, 252),
            foreground: Color32::from_rgb(30, 41, 59),
            selection: Color32::from_rgb(254, 215, 200),
            comment: Color32::from_rgb(100, 116, 139),
            red: Color32::from_rgb(200, 60, 60),
            torch: Color32::from_rgb(222, 60, 30),
            yellow: Color32::from_rgb(180, 130, 20),
            green: Color32::from_rgb(40, 150, 80),
            background_darker: Color32::from_rgb(226, 232, 240),
            background_dark: Color32::from_rgb(241, 245, 249),
            background_light: Color32::from_rgb(255, 255, 255),
            background_lighter: Color32::from_rgb(255, 255, 255),
        }
    }
}

pub fn set_theme(ctx: &egui::Context, theme: &Theme) {
    set_theme_variant(ctx, &theme.dark, true);
    set_theme_variant(ctx, &theme.light, false);
}

fn set_theme_variant(ctx: &egui::Context, theme: &ThemeDetails, is_dark: bool) {
    let (default, variant) = match is_dark {
        true => (Visuals::dark(), egui::Theme::Dark),
        false => (Visuals::light(), egui::Theme::Light),
    };

    let widget = |base: WidgetVisuals, bg_fill: Color32, outline: Color32| WidgetVisuals {
        bg_fill,
        weak_bg_fill: theme.background_lighter,
        bg_stroke: Stroke { color: outline, ..base.bg_stroke },
        fg_stroke: Stroke { color: theme.foreground, ..base.fg_stroke },
        ..base
    };

    ctx.set_visuals_of(
        variant,
        Visuals {
            dark_mode: is_dark,
            widgets: Widgets {
                noninteractive: widget(
                    default.widgets.noninteractive,
                    theme.background,
                    theme.background_dark,
                ),
                inactive: widget(
                    default.widgets.inactive,
                    theme.background_light,
                    theme.background_dark,
                ),
                hovered: widget(default.widgets.hovered, theme.selection, theme.torch),
                active: widget(default.widgets.active, theme.selection, theme.torch),
                open: widget(default.widgets.open, theme.background_dark, theme.torch),
            },
            selection: Selection {
                bg_fill: theme.selection,
                stroke: Stroke { color: theme.foreground, ..default.selection.stroke },
            },
            hyperlink_color: theme.torch,
            faint_bg_color: match is_dark {
                true => theme.background_darker,
                false => theme.background_light,
            },
            extreme_bg_color: theme.background_darker,
            code_bg_color: theme.background_dark,
            error_fg_color: theme.red,
            warn_fg_color: theme.yellow,
            window_shadow: Shadow { color: theme.background_darker, ..default.window_shadow },
            window_fill: theme.background,
            window_stroke: Stroke { color: theme.background_light, ..default.window_stroke },
            panel_fill: theme.background_dark,
            popup_shadow: Shadow { color: theme.background_dark, ..default.popup_shadow },
            ..default
        },
    );
}
