pub mod birefringence;
pub mod capture;
pub mod data_processing;
pub mod double_slit;
pub mod michelson;
pub mod panels;
pub mod photoelectric;
pub mod planck;
pub mod plot;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::StatusLine;

/// Chart height inside experiment windows.
pub const CHART_HEIGHT: f32 = 260.0;
/// Width used for intensity images.
pub const IMAGE_WIDTH: f32 = 360.0;

/// Label plus single-line text field, laid out as one row of an
/// `egui::Grid`.
pub fn text_field(ui: &mut Ui, label: &str, value: &mut String, hint: &str) {
    ui.label(label);
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(140.0),
    );
    ui.end_row();
}

/// Buttons shared by every experiment window.
#[derive(Debug, Default, Clone, Copy)]
pub struct Actions {
    pub calculate: bool,
    pub save_image: bool,
    pub save_data: bool,
    pub clear: bool,
}

pub fn action_row(ui: &mut Ui, calculate_label: &str) -> Actions {
    let mut actions = Actions::default();
    ui.horizontal(|ui: &mut Ui| {
        actions.calculate = ui.button(calculate_label).clicked();
        actions.save_image = ui.button("Save image").clicked();
        actions.save_data = ui.button("Save data").clicked();
        actions.clear = ui.button("Clear").clicked();
    });
    actions
}

pub fn status_line(ui: &mut Ui, status: &StatusLine) {
    match status {
        StatusLine::Empty => {}
        StatusLine::Info(msg) => {
            ui.label(msg);
        }
        StatusLine::Error(msg) => {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    }
}

/// Monospace block for result summaries.
pub fn summary(ui: &mut Ui, text: &str) {
    if !text.is_empty() {
        ui.label(RichText::new(text).monospace());
    }
}
