//! Colors, spacing and text styles

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

#[derive(Clone, Debug)]
pub struct Theme {
    /// Accent for primary actions
    pub primary: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    pub user_bubble: Color32,
    pub guide_bubble: Color32,
    /// Mic button while recording
    pub recording: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,
    pub bubble_rounding: Rounding,

    pub spacing: f32,
    pub spacing_lg: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(217, 119, 6),  // Amber
            success: Color32::from_rgb(22, 163, 74),  // Green
            warning: Color32::from_rgb(234, 179, 8),  // Yellow
            error: Color32::from_rgb(220, 38, 38),    // Red

            bg_primary: Color32::from_rgb(28, 25, 23),   // Stone 900
            bg_secondary: Color32::from_rgb(41, 37, 36), // Stone 800
            bg_tertiary: Color32::from_rgb(68, 64, 60),  // Stone 700

            text_primary: Color32::from_rgb(250, 250, 249),
            text_secondary: Color32::from_rgb(214, 211, 209),
            text_muted: Color32::from_rgb(168, 162, 158),

            user_bubble: Color32::from_rgb(180, 83, 9),
            guide_bubble: Color32::from_rgb(41, 37, 36),
            recording: Color32::from_rgb(239, 68, 68),

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),
            bubble_rounding: Rounding::same(14.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_tertiary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_muted);
        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);
        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);
        visuals.hyperlink_color = self.primary;
        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);

        for (text_style, size) in [
            (egui::TextStyle::Heading, 24.0),
            (egui::TextStyle::Body, 15.0),
            (egui::TextStyle::Button, 14.0),
            (egui::TextStyle::Small, 12.0),
        ] {
            style
                .text_styles
                .insert(text_style, FontId::new(size, FontFamily::Proportional));
        }
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            FontId::new(13.0, FontFamily::Monospace),
        );

        ctx.set_style(style);
    }

    pub fn level_color(&self, level: crate::integration::NotificationLevel) -> Color32 {
        use crate::integration::NotificationLevel;
        match level {
            NotificationLevel::Info => self.success,
            NotificationLevel::Warning => self.warning,
            NotificationLevel::Error => self.error,
        }
    }
}
