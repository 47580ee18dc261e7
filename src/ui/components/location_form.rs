//! Location form
//!
//! Place search with suggestions, current location, photo attachment and the
//! narration style. Only one location source is active at a time.

use crate::integration::SessionController;
use crate::narration::InformationStyle;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

pub struct LocationForm<'a> {
    controller: &'a mut SessionController,
    /// Path typed into the photo box
    image_path: &'a mut String,
    theme: &'a Theme,
}

impl<'a> LocationForm<'a> {
    pub fn new(
        controller: &'a mut SessionController,
        image_path: &'a mut String,
        theme: &'a Theme,
    ) -> Self {
        Self {
            controller,
            image_path,
            theme,
        }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(self.theme.spacing_lg);
            ui.label(
                RichText::new("Where are you exploring?")
                    .size(24.0)
                    .color(self.theme.text_primary),
            );
            ui.label(
                RichText::new("Search for a place, use your location, or attach a photo.")
                    .size(14.0)
                    .color(self.theme.text_muted),
            );
        });
        ui.add_space(self.theme.spacing);

        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                self.show_search(ui);
                ui.add_space(self.theme.spacing_sm);
                self.show_current_location(ui);
                ui.add_space(self.theme.spacing_sm);
                self.show_image(ui);
                ui.add_space(self.theme.spacing);
                self.show_style(ui);
                ui.add_space(self.theme.spacing);
                self.show_submit(ui);
            });
    }

    fn show_search(&mut self, ui: &mut egui::Ui) {
        let mut query = self.controller.form().query_text().to_string();

        let response = ui.add(
            egui::TextEdit::singleline(&mut query)
                .hint_text("Search for a place...")
                .desired_width(f32::INFINITY)
                .margin(egui::Margin::symmetric(12.0, 8.0)),
        );
        if response.changed() {
            self.controller.set_query(query);
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            self.controller.submit_form();
        }

        let suggestions = self.controller.suggestions().to_vec();
        if suggestions.is_empty() {
            return;
        }

        egui::Frame::none()
            .fill(self.theme.bg_tertiary)
            .rounding(self.theme.button_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                for suggestion in &suggestions {
                    let label = ui.selectable_label(
                        false,
                        RichText::new(&suggestion.description).color(self.theme.text_secondary),
                    );
                    if label.clicked() {
                        self.controller.select_suggestion(suggestion);
                    }
                }
            });
    }

    fn show_current_location(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .button("📍 Use my location")
                .on_hover_text("Find attractions near you")
                .clicked()
            {
                self.controller.use_current_location();
            }

            if self.controller.form().wants_current_location() {
                ui.label(
                    RichText::new("Using your current location")
                        .size(12.0)
                        .color(self.theme.success),
                );
            }
        });
    }

    fn show_image(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let width = ui.available_width() - 90.0;
            let response = ui.add(
                egui::TextEdit::singleline(&mut *self.image_path)
                    .hint_text("Photo path (or drop an image here)")
                    .desired_width(width),
            );

            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            let can_attach = !self.image_path.trim().is_empty();
            if (ui.add_enabled(can_attach, egui::Button::new("Attach")).clicked() || submitted)
                && can_attach
            {
                let path = self.image_path.trim().to_string();
                self.controller.attach_image_file(path);
            }
        });

        if self.controller.form().has_image() {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("📷 Photo attached")
                        .size(12.0)
                        .color(self.theme.success),
                );
                if ui.small_button("Remove").clicked() {
                    self.controller.clear_location();
                    self.image_path.clear();
                }
            });
        }
    }

    fn show_style(&mut self, ui: &mut egui::Ui) {
        let current = self.controller.form().information_style.clone();

        ui.horizontal(|ui| {
            ui.label(RichText::new("Style").color(self.theme.text_secondary));
            egui::ComboBox::from_id_salt("information_style")
                .selected_text(current.as_str())
                .show_ui(ui, |ui| {
                    for style in InformationStyle::ALL {
                        let selected = current == style.as_str();
                        if ui.selectable_label(selected, style.as_str()).clicked() {
                            self.controller.set_style(style);
                        }
                    }
                });
        });
    }

    fn show_submit(&mut self, ui: &mut egui::Ui) {
        let narrating = self.controller.is_narrating();

        ui.horizontal(|ui| {
            let button = egui::Button::new(
                RichText::new("Tell me about it").color(egui::Color32::WHITE),
            )
            .min_size(Vec2::new(180.0, 40.0))
            .rounding(self.theme.button_rounding)
            .fill(self.theme.primary);

            if ui
                .add_enabled(self.controller.can_submit_form(), button)
                .clicked()
            {
                self.controller.submit_form();
            }

            if narrating {
                ui.spinner();
                ui.label(
                    RichText::new("Your guide is thinking...")
                        .color(self.theme.text_muted),
                );
            }
        });
    }
}
