//! Desktop front-end with egui/eframe

mod app;
pub mod components;
mod theme;

pub use app::{NarratorApp, LANGUAGES};
pub use theme::Theme;

use crate::integration::SessionController;

/// Run the narrator window until it is closed
pub fn run(controller: SessionController) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 760.0])
            .with_min_inner_size([560.0, 480.0])
            .with_title("Aijolot Travel Narrator")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Aijolot",
        options,
        Box::new(move |cc| Ok(Box::new(NarratorApp::new(cc, controller)))),
    )
}
