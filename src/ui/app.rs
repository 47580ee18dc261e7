//! Main application struct and eframe integration

use crate::integration::{ScreenMode, SessionController};
use crate::location::image::{encode_data_uri, mime_for_path};
use crate::session::ViewportMetrics;
use crate::ui::components::{ConversationView, LocationForm, NotificationStack, QuestionBar};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, TopBottomPanel};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Output languages offered in the header
pub const LANGUAGES: [(&str, &str); 3] = [("en", "English"), ("es", "Español"), ("fr", "Français")];

pub struct NarratorApp {
    controller: SessionController,
    theme: Theme,
    /// Photo path being typed on the form
    image_path: String,
    /// Conversation scroll geometry from the last frame
    viewport: Option<ViewportMetrics>,
}

impl NarratorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, controller: SessionController) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            controller,
            theme,
            image_path: String::new(),
            viewport: None,
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Only the form accepts photos
        if dropped.is_empty() || self.controller.mode() != ScreenMode::CollectingInput {
            return;
        }

        // One location at a time: the last file wins
        if let Some(file) = dropped.last() {
            if let Some(path) = &file.path {
                debug!("Photo dropped: {}", path.display());
                self.image_path = path.display().to_string();
                self.controller.attach_image_file(path);
            } else if let Some(bytes) = &file.bytes {
                let mime = if file.mime.starts_with("image/") {
                    Some(file.mime.as_str())
                } else {
                    mime_for_path(Path::new(&file.name))
                };
                match mime {
                    Some(mime) => {
                        self.image_path = file.name.clone();
                        self.controller
                            .attach_image_data_uri(encode_data_uri(mime, bytes));
                    }
                    None => debug!("Ignoring dropped file {}", file.name),
                }
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(self.theme.bg_secondary).inner_margin(12.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Aijolot")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new("Travel Narrator")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.controller.mode() == ScreenMode::Conversing
                            && ui.button("🧭 Explore new location").clicked()
                        {
                            self.image_path.clear();
                            self.viewport = None;
                            self.controller.explore_new_location();
                        }

                        let current = self.controller.settings().language.clone();
                        let label = LANGUAGES
                            .iter()
                            .find(|(code, _)| *code == current)
                            .map(|(_, name)| *name)
                            .unwrap_or(current.as_str())
                            .to_string();

                        egui::ComboBox::from_id_salt("language")
                            .selected_text(label)
                            .show_ui(ui, |ui| {
                                for (code, name) in LANGUAGES {
                                    if ui.selectable_label(current == code, name).clicked()
                                        && current != code
                                    {
                                        self.controller.set_language(code);
                                    }
                                }
                            });
                    });
                });
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        if self.controller.mode() == ScreenMode::Conversing {
            TopBottomPanel::bottom("question_bar")
                .frame(
                    egui::Frame::none()
                        .fill(self.theme.bg_primary)
                        .inner_margin(self.theme.spacing),
                )
                .show(ctx, |ui| {
                    QuestionBar::new(&mut self.controller, &self.theme).show(ui);
                });
        }

        CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| match self.controller.mode() {
                ScreenMode::CollectingInput => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        LocationForm::new(&mut self.controller, &mut self.image_path, &self.theme)
                            .show(ui);
                    });
                }
                ScreenMode::Conversing => {
                    ConversationView::new(&mut self.controller, &mut self.viewport, &self.theme)
                        .show(ui);
                }
            });
    }

    fn show_notifications(&mut self, ctx: &egui::Context) {
        let dismissed = NotificationStack::new(&self.controller.notifications, &self.theme).show(ctx);
        for id in dismissed {
            self.controller.notifications.dismiss(id);
        }
    }
}

impl eframe::App for NarratorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll_events();
        self.controller.tick(Instant::now());
        self.handle_dropped_files(ctx);

        self.show_header(ctx);
        self.show_content(ctx);
        self.show_notifications(ctx);

        // Keep the typewriter, playback and pipeline replies moving
        if self.controller.session().is_revealing() {
            ctx.request_repaint();
        } else if self.controller.is_narrating()
            || self.controller.is_answering()
            || self.controller.capture().is_recording()
            || self.controller.playback().active_turn().is_some()
        {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Aijolot shutting down");
    }
}
