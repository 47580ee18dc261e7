use crate::integration::Notifications;
use crate::ui::theme::Theme;
use egui::{self, Align2, RichText};

/// Toast stack in the top-right corner
pub struct NotificationStack<'a> {
    notifications: &'a Notifications,
    theme: &'a Theme,
}

impl<'a> NotificationStack<'a> {
    pub fn new(notifications: &'a Notifications, theme: &'a Theme) -> Self {
        Self {
            notifications,
            theme,
        }
    }

    /// Returns the ids the user dismissed this frame
    pub fn show(self, ctx: &egui::Context) -> Vec<u64> {
        let mut dismissed = Vec::new();
        if self.notifications.is_empty() {
            return dismissed;
        }

        egui::Area::new(egui::Id::new("notifications"))
            .anchor(Align2::RIGHT_TOP, [-self.theme.spacing, 64.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_max_width(320.0);
                for note in self.notifications.iter() {
                    egui::Frame::none()
                        .fill(self.theme.bg_secondary)
                        .stroke(egui::Stroke::new(1.0, self.theme.level_color(note.level)))
                        .rounding(self.theme.card_rounding)
                        .inner_margin(self.theme.spacing_sm + 4.0)
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.label(
                                        RichText::new(&note.title)
                                            .strong()
                                            .color(self.theme.level_color(note.level)),
                                    );
                                    ui.label(
                                        RichText::new(&note.message)
                                            .size(12.0)
                                            .color(self.theme.text_secondary),
                                    );
                                });
                                if ui.small_button("✕").on_hover_text("Dismiss").clicked() {
                                    dismissed.push(note.id);
                                }
                            });
                        });
                    ui.add_space(self.theme.spacing_sm);
                }
            });

        dismissed
    }
}
