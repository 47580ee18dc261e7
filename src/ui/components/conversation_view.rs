//! Conversation view
//!
//! Headline player for the initial narrative, then the turn log. The view
//! follows the typewriter only while the reader is near the bottom, and jumps
//! to the bottom when a turn is added or finishes revealing.

use crate::integration::SessionController;
use crate::messages::{ConversationTurn, Sender};
use crate::session::ViewportMetrics;
use crate::ui::components::AudioControls;
use crate::ui::theme::Theme;
use egui::{self, Align, Layout, RichText};
use uuid::Uuid;

pub struct ConversationView<'a> {
    controller: &'a mut SessionController,
    /// Scroll geometry from the previous frame
    viewport: &'a mut Option<ViewportMetrics>,
    theme: &'a Theme,
}

impl<'a> ConversationView<'a> {
    pub fn new(
        controller: &'a mut SessionController,
        viewport: &'a mut Option<ViewportMetrics>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            controller,
            viewport,
            theme,
        }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let mut toggled: Option<Uuid> = None;

        let initial_id = self.controller.session().initial_narrative().map(|t| t.id);

        if let Some((turn_id, _)) = self.controller.session().headline_audio() {
            let state = self.controller.playback().state_for(turn_id);
            if AudioControls::new(state, "Listen to your guide", self.theme).show(ui) {
                toggled = Some(turn_id);
            }
            ui.add_space(self.theme.spacing_sm);
        }

        let turns = self.controller.session().turns();
        let follow = match self.controller.take_scroll_request() {
            Some(request) => self
                .controller
                .scroll_policy()
                .should_scroll(*self.viewport, request),
            None => false,
        };
        let answering = self.controller.is_answering();

        let output = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing_sm);
                for turn in &turns {
                    let show_audio = Some(turn.id) != initial_id && turn.audio_visible();
                    if self.show_turn(ui, turn, show_audio) {
                        toggled = Some(turn.id);
                    }
                    ui.add_space(self.theme.spacing_sm);
                }

                if answering {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(
                            RichText::new("Your guide is thinking...")
                                .italics()
                                .color(self.theme.text_muted),
                        );
                    });
                }

                if follow {
                    ui.scroll_to_cursor(Some(Align::BOTTOM));
                }
            });

        *self.viewport = Some(ViewportMetrics {
            scroll_height: output.content_size.y,
            scroll_top: output.state.offset.y,
            client_height: output.inner_rect.height(),
        });

        if let Some(turn_id) = toggled {
            self.controller.toggle_audio(turn_id);
        }
    }

    /// Returns true when the turn's audio control was clicked
    fn show_turn(&self, ui: &mut egui::Ui, turn: &ConversationTurn, show_audio: bool) -> bool {
        let is_user = turn.sender == Sender::User;
        let (fill, layout) = if is_user {
            (self.theme.user_bubble, Layout::right_to_left(Align::TOP))
        } else {
            (self.theme.guide_bubble, Layout::left_to_right(Align::TOP))
        };

        let mut clicked = false;
        ui.with_layout(layout, |ui| {
            let max_width = ui.available_width() * 0.8;
            egui::Frame::none()
                .fill(fill)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(14.0, 10.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(turn.visible_text()).color(self.theme.text_primary),
                        );
                        if show_audio {
                            ui.add_space(self.theme.spacing_sm);
                            let state = self.controller.playback().state_for(turn.id);
                            clicked = AudioControls::new(state, "Listen", self.theme).show(ui);
                        }
                        ui.label(
                            RichText::new(turn.created_at.format("%H:%M").to_string())
                                .size(10.0)
                                .color(self.theme.text_muted),
                        );
                    });
                });
        });
        clicked
    }
}
