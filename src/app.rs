use eframe::egui;

use crate::state::{AppState, Experiment};
use crate::ui::capture::{self, PendingCapture};
use crate::ui::{birefringence, data_processing, double_slit, michelson, panels, photoelectric, planck};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct OpticsLabApp {
    pub state: AppState,
}

/// Show one experiment window if it is open, keeping the open flag in sync
/// with its close button.
fn show_window<L>(
    ctx: &egui::Context,
    state: &mut AppState,
    experiment: Experiment,
    lab: impl FnOnce(&mut AppState) -> (&mut L, &mut Option<PendingCapture>),
    draw: fn(&egui::Context, &mut bool, &mut L, &mut Option<PendingCapture>),
) {
    if !state.is_open(experiment) {
        return;
    }
    let mut open = true;
    let (lab, pending) = lab(state);
    draw(ctx, &mut open, lab, pending);
    if !open {
        log::info!("Closing {}", experiment.title());
        *state.open_flag(experiment) = false;
    }
}

impl eframe::App for OpticsLabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = &mut self.state;

        // ---- Finished chart screenshots ----
        if let Some((experiment, result)) = capture::poll(ctx, &mut state.capture) {
            let status = state.status_of(experiment);
            match result {
                Ok(path) => status.info(format!("Saved {}", path.display())),
                Err(e) => {
                    log::error!("Failed to save image: {e:#}");
                    status.error(format!("{e:#}"));
                }
            }
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, state);
        });

        // ---- Left side panel: launcher ----
        egui::SidePanel::left("launcher")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, state);
            });

        egui::CentralPanel::default().show(ctx, panels::welcome);

        // ---- Experiment windows ----
        show_window(ctx, state, Experiment::Photoelectric, |s| (&mut s.photoelectric, &mut s.capture), photoelectric::window);
        show_window(ctx, state, Experiment::DoubleSlit, |s| (&mut s.double_slit, &mut s.capture), double_slit::window);
        show_window(ctx, state, Experiment::Birefringence, |s| (&mut s.birefringence, &mut s.capture), birefringence::window);
        show_window(ctx, state, Experiment::MichelsonDemo, |s| (&mut s.michelson_demo, &mut s.capture), michelson::demo_window);
        show_window(ctx, state, Experiment::Planck, |s| (&mut s.planck, &mut s.capture), planck::window);
        show_window(ctx, state, Experiment::MichelsonWavelength, |s| (&mut s.wavelength, &mut s.capture), michelson::wavelength_window);
        show_window(ctx, state, Experiment::SpeedOfLight, |s| (&mut s.speed_of_light, &mut s.capture), michelson::speed_window);
        show_window(ctx, state, Experiment::RefractiveIndex, |s| (&mut s.refractive_index, &mut s.capture), michelson::index_window);
        show_window(ctx, state, Experiment::DataProcessing, |s| (&mut s.data, &mut s.capture), data_processing::window);
    }
}
