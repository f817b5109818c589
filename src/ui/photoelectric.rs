use eframe::egui::{self, Context, Rect, Ui};
use egui_plot::Plot;

use super::capture::{self, PendingCapture};
use super::plot::Reveal;
use super::{action_row, plot, status_line, summary, text_field, CHART_HEIGHT};
use crate::color::SeriesColors;
use crate::physics::constants::Metal;
use crate::physics::photoelectric::{simulate, PhotoelectricInput, PhotoelectricResult};
use crate::state::{Experiment, StatusLine};

/// Frequency samples added to the charts per frame.
const REVEAL_STEP: usize = 5;

#[derive(Default)]
pub struct PhotoelectricLab {
    pub metal: Metal,
    pub input: PhotoelectricInput,
    pub result: Option<PhotoelectricResult>,
    pub status: StatusLine,
    reveal: Reveal,
    chart_rect: Option<Rect>,
}

impl PhotoelectricLab {
    pub fn calculate(&mut self) {
        match self.input.parse() {
            Ok((photons, area)) => {
                let r = simulate(self.metal, photons, area);
                log::info!(
                    "Photoelectric: {} with {photons} photons on {area} m², threshold {:.3e} Hz",
                    self.metal.name(),
                    r.threshold_hz
                );
                self.reveal = Reveal::start(r.frequency_hz.len());
                self.result = Some(r);
                self.status.clear();
            }
            Err(e) => self.status.error(e),
        }
    }

    fn summary_text(&self) -> String {
        let Some(r) = &self.result else {
            return String::new();
        };
        format!(
            "Metal: {} (W = {} eV)\nMax kinetic energy: {:.2e} J\nCurrent: {:.2e} A\n\
             Threshold frequency: {:.3e} Hz\nFastest electron: {:.3e} m/s",
            r.metal.name(),
            r.metal.work_function_ev(),
            r.final_kinetic_energy(),
            r.final_current(),
            r.threshold_hz,
            r.final_speed(),
        )
    }
}

pub fn window(ctx: &Context, open: &mut bool, lab: &mut PhotoelectricLab, pending: &mut Option<PendingCapture>) {
    egui::Window::new(Experiment::Photoelectric.title())
        .open(open)
        .default_width(760.0)
        .show(ctx, |ui: &mut Ui| {
            egui::Grid::new("photoelectric_form")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    ui.label("Metal");
                    egui::ComboBox::from_id_salt("photoelectric_metal")
                        .selected_text(lab.metal.name())
                        .show_ui(ui, |ui: &mut Ui| {
                            for m in Metal::ALL {
                                ui.selectable_value(&mut lab.metal, m, m.name());
                            }
                        });
                    ui.end_row();
                    text_field(ui, "Photon count", &mut lab.input.photon_count, "0");
                    text_field(ui, "Illuminated area (m²)", &mut lab.input.area_m2, "0");
                });

            let actions = action_row(ui, "Calculate");
            if actions.calculate {
                lab.calculate();
            }
            if actions.clear {
                lab.result = None;
                lab.chart_rect = None;
                lab.status.clear();
            }
            if actions.save_image {
                capture::request(ctx, pending, Experiment::Photoelectric, lab.chart_rect, &mut lab.status);
            }
            if actions.save_data {
                let records = lab.result.as_ref().map(|r| r.records()).unwrap_or_default();
                capture::save_records("photoelectric.csv", &records, &mut lab.status);
            }
            status_line(ui, &lab.status);
            summary(ui, &lab.summary_text());

            if lab.result.is_some() && lab.reveal.advance(REVEAL_STEP) {
                ctx.request_repaint();
            }
            let reveal = lab.reveal;
            lab.chart_rect = lab.result.as_ref().map(|r| charts(ui, r, reveal));
        });
}

fn charts(ui: &mut Ui, r: &PhotoelectricResult, reveal: Reveal) -> Rect {
    let colors = SeriesColors::new(2);
    let width = (ui.available_width() / 2.0 - 8.0).max(200.0);
    ui.horizontal(|ui: &mut Ui| {
        let energy = Plot::new("photoelectric_energy")
            .width(width)
            .height(CHART_HEIGHT)
            .legend(egui_plot::Legend::default())
            .x_axis_label("Frequency (Hz)")
            .y_axis_label("Max kinetic energy (J)")
            .show(ui, |plot_ui| {
                plot_ui.line(plot::line(
                    "K_max",
                    reveal.visible(&r.frequency_hz),
                    reveal.visible(&r.kinetic_energy_j),
                    colors.get(0),
                ));
            });
        let current = Plot::new("photoelectric_current")
            .width(width)
            .height(CHART_HEIGHT)
            .legend(egui_plot::Legend::default())
            .x_axis_label("Light intensity")
            .y_axis_label("Current (A)")
            .show(ui, |plot_ui| {
                plot_ui.line(plot::line(
                    "Photocurrent",
                    reveal.visible(&r.intensity),
                    reveal.visible(&r.current_a),
                    colors.get(1),
                ));
            });
        energy.response.rect.union(current.response.rect)
    })
    .inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculate_restarts_the_reveal() {
        let mut lab = PhotoelectricLab::default();
        lab.input.photon_count = "1000".into();
        lab.input.area_m2 = "0.01".into();
        lab.calculate();
        assert_eq!(lab.reveal.shown(), 0);
        let total = lab.result.as_ref().map_or(0, |r| r.frequency_hz.len());
        let mut frames = 0;
        while lab.reveal.advance(REVEAL_STEP) {
            frames += 1;
        }
        assert_eq!(lab.reveal.shown(), total);
        assert_eq!(frames, total.div_ceil(REVEAL_STEP) - 1);

        lab.calculate();
        assert_eq!(lab.reveal.shown(), 0);
    }

    #[test]
    fn bad_input_keeps_previous_result() {
        let mut lab = PhotoelectricLab::default();
        lab.calculate();
        assert!(lab.result.is_some());
        lab.input.area_m2 = "-1".into();
        lab.calculate();
        assert!(lab.result.is_some());
        assert!(matches!(lab.status, StatusLine::Error(_)));
    }
}
