//! Play/pause control for one turn's audio

use crate::audio::PlaybackState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct AudioControls<'a> {
    state: PlaybackState,
    label: &'a str,
    theme: &'a Theme,
}

impl<'a> AudioControls<'a> {
    pub fn new(state: PlaybackState, label: &'a str, theme: &'a Theme) -> Self {
        Self {
            state,
            label,
            theme,
        }
    }

    /// Returns true when play/pause was clicked
    pub fn show(self, ui: &mut egui::Ui) -> bool {
        let mut clicked = false;

        egui::Frame::none()
            .fill(self.theme.bg_tertiary)
            .rounding(self.theme.button_rounding)
            .inner_margin(egui::Margin::symmetric(10.0, 6.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let (icon, tooltip) = match self.state {
                        PlaybackState::Playing => ("⏸", "Pause"),
                        PlaybackState::Ended => ("↺", "Replay"),
                        _ => ("▶", "Play"),
                    };

                    let button = ui.add(
                        egui::Button::new(RichText::new(icon).size(18.0))
                            .min_size(Vec2::splat(32.0)),
                    );
                    clicked = button.clicked();
                    button.on_hover_text(tooltip);

                    let status = match self.state {
                        PlaybackState::Playing => "Playing",
                        PlaybackState::Paused => "Paused",
                        PlaybackState::Ended => "Finished",
                        PlaybackState::Stopped => self.label,
                    };
                    ui.label(
                        RichText::new(status)
                            .size(12.0)
                            .color(self.theme.text_secondary),
                    );
                });
            });

        clicked
    }
}
