use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use super::data_processing;
use crate::state::{AppState, Experiment, Group, StatusLine};

// ---------------------------------------------------------------------------
// Left side panel – experiment launcher
// ---------------------------------------------------------------------------

/// Render the launcher: one button per experiment, grouped.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Optics Lab");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for group in Group::ALL {
                egui::CollapsingHeader::new(RichText::new(group.title()).strong())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        for exp in Experiment::in_group(group) {
                            let open = state.is_open(exp);
                            if ui.selectable_label(open, exp.title()).clicked() {
                                if open {
                                    ui.ctx().move_to_top(egui::LayerId::new(
                                        egui::Order::Middle,
                                        egui::Id::new(exp.title()),
                                    ));
                                } else {
                                    state.open(exp);
                                }
                            }
                        }
                    });
                ui.add_space(4.0);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Import data…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
        ui.menu_button("Windows", |ui: &mut Ui| {
            if ui.button("Close all").clicked() {
                for exp in Experiment::ALL {
                    *state.open_flag(exp) = false;
                }
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("{} window(s) open", state.open_count()));

        if let Some(ds) = &state.data.dataset {
            ui.separator();
            ui.label(format!("{} rows × {} columns loaded", ds.n_rows(), ds.n_columns()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Welcome text for the central panel.
pub fn welcome(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("Pick an experiment from the list on the left");
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Choose a data file, import it and show the data-processing window.
pub fn open_file_dialog(state: &mut AppState) {
    if let Some(path) = data_processing::pick_file() {
        state.data.path_text = path.display().to_string();
        state.data.import();
        state.open(Experiment::DataProcessing);
        state.status_message = match &state.data.status {
            StatusLine::Error(msg) => Some(msg.clone()),
            _ => None,
        };
    }
}
