//! Follow-up question input with send and mic controls

use crate::integration::SessionController;
use crate::NarratorError;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

pub struct QuestionBar<'a> {
    controller: &'a mut SessionController,
    theme: &'a Theme,
}

impl<'a> QuestionBar<'a> {
    pub fn new(controller: &'a mut SessionController, theme: &'a Theme) -> Self {
        Self { controller, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_mic_button(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_text_input(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_send_button(ui);
                });
            });
    }

    fn show_mic_button(&mut self, ui: &mut egui::Ui) {
        let recording = self.controller.capture().is_recording();
        let enabled = self.controller.capture().is_available()
            && self.controller.context().is_some()
            && !self.controller.is_answering();

        let (icon, tooltip, color) = if recording {
            ("⏹", "Stop recording", self.theme.recording)
        } else {
            ("🎤", "Ask with your voice", self.theme.text_secondary)
        };

        let mut button = egui::Button::new(RichText::new(icon).size(20.0).color(color))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding);
        if recording {
            button = button.fill(self.theme.recording.gamma_multiply(0.2));
        }

        let response = ui.add_enabled(enabled, button);
        let rect = response.rect;
        if response.on_hover_text(tooltip).clicked() {
            self.controller.toggle_recording();
        }

        if recording {
            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
            ui.painter().circle_stroke(
                rect.center(),
                rect.width() / 2.0 + 2.0 + pulse * 3.0,
                egui::Stroke::new(
                    2.0 * pulse,
                    self.theme.recording.gamma_multiply(1.0 - pulse * 0.5),
                ),
            );
            ui.ctx().request_repaint();
        }
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        let enabled = self.controller.can_send_question();
        let width = ui.available_width() - 60.0;

        let hint = if self.controller.capture().is_recording() {
            "Listening..."
        } else {
            "Ask your guide a question..."
        };

        let response = ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(&mut self.controller.question_input)
                .hint_text(hint)
                .desired_width(width)
                .margin(egui::Margin::symmetric(12.0, 8.0)),
        );

        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            self.send();
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = self.controller.can_send_question()
            && !self.controller.question_input.trim().is_empty();

        let button = egui::Button::new(RichText::new("➤").size(18.0).color(egui::Color32::WHITE))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding)
            .fill(if can_send {
                self.theme.primary
            } else {
                self.theme.text_muted
            });

        if ui
            .add_enabled(can_send, button)
            .on_hover_text("Send (Enter)")
            .clicked()
        {
            self.send();
        }
    }

    fn send(&mut self) {
        match self.controller.submit_question() {
            Ok(()) | Err(NarratorError::EmptyQuestion) => {}
            Err(e) => {
                self.controller.notifications.error("Error", &e);
            }
        }
    }
}
