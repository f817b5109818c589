use eframe::egui::{self, Context, Rect, TextureHandle, Ui};
use egui_plot::{Plot, VLine};

use super::capture::{self, PendingCapture};
use super::{action_row, plot, status_line, summary, text_field, CHART_HEIGHT};
use crate::color::IntensityMap;
use crate::physics::double_slit::{simulate, DoubleSlitInput, DoubleSlitResult};
use crate::state::{Experiment, StatusLine};

const BAND_HEIGHT: usize = 60;

#[derive(Default)]
pub struct DoubleSlitLab {
    pub input: DoubleSlitInput,
    pub result: Option<DoubleSlitResult>,
    pub status: StatusLine,
    fringes: Option<TextureHandle>,
    chart_rect: Option<Rect>,
}

impl DoubleSlitLab {
    fn calculate(&mut self, ui: &Ui) {
        match self.input.parse() {
            Ok(params) => {
                let r = simulate(params);
                log::info!(
                    "Double slit: d = {} m, L = {} m, λ = {} m, spacing {:.3e} m",
                    params.slit_spacing_m,
                    params.screen_distance_m,
                    params.wavelength_m,
                    r.fringe_spacing_m
                );
                let map = IntensityMap::for_wavelength(params.wavelength_m * 1e9);
                let image = plot::fringe_band(&r.intensity, BAND_HEIGHT, map);
                self.fringes = Some(plot::upload(ui, "double_slit_fringes", image));
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
            "Fringe order {}: x = {:.3} mm\nFringe spacing: {:.3} mm",
            r.params.fringe_order,
            r.fringe_position_m * 1e3,
            r.fringe_spacing_m * 1e3
        )
    }
}

pub fn window(ctx: &Context, open: &mut bool, lab: &mut DoubleSlitLab, pending: &mut Option<PendingCapture>) {
    egui::Window::new(Experiment::DoubleSlit.title())
        .open(open)
        .default_width(640.0)
        .show(ctx, |ui: &mut Ui| {
            egui::Grid::new("double_slit_form")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    text_field(ui, "Slit spacing d (mm)", &mut lab.input.slit_spacing_mm, "0.1");
                    text_field(ui, "Screen distance L (m)", &mut lab.input.screen_distance_m, "1");
                    text_field(ui, "Fringe order n", &mut lab.input.fringe_order, "0");
                    text_field(ui, "Wavelength λ (nm)", &mut lab.input.wavelength_nm, "500");
                });

            let actions = action_row(ui, "Calculate");
            if actions.calculate {
                lab.calculate(ui);
            }
            if actions.clear {
                lab.result = None;
                lab.fringes = None;
                lab.chart_rect = None;
                lab.status.clear();
            }
            if actions.save_image {
                capture::request(ctx, pending, Experiment::DoubleSlit, lab.chart_rect, &mut lab.status);
            }
            if actions.save_data {
                let records = lab.result.as_ref().map(|r| r.samples()).unwrap_or_default();
                capture::save_records("double_slit.csv", &records, &mut lab.status);
            }
            status_line(ui, &lab.status);
            summary(ui, &lab.summary_text());

            let Some(r) = &lab.result else {
                lab.chart_rect = None;
                return;
            };
            let profile = Plot::new("double_slit_profile")
                .height(CHART_HEIGHT)
                .x_axis_label("Screen position (mm)")
                .y_axis_label("Relative intensity")
                .show(ui, |plot_ui| {
                    let mm: Vec<f64> = r.screen_m.iter().map(|y| y * 1e3).collect();
                    let color = IntensityMap::for_wavelength(r.params.wavelength_m * 1e9).color();
                    plot_ui.line(plot::line("I = 4cos²(φ/2)", &mm, &r.intensity, color));
                    plot_ui.vline(VLine::new(r.fringe_position_m * 1e3).name("x = nλL/d"));
                });
            let mut rect = profile.response.rect;
            if let Some(tex) = &lab.fringes {
                rect = rect.union(plot::show_texture(ui, tex, profile.response.rect.width()));
            }
            lab.chart_rect = Some(rect);
        });
}
