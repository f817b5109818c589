use eframe::egui::{self, Context, Rect, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::Plot;

use super::capture::{self, PendingCapture};
use super::{action_row, plot, status_line, summary, text_field, CHART_HEIGHT};
use crate::color::SeriesColors;
use crate::physics::constants::{Metal, ELEMENTARY_CHARGE, PLANCK};
use crate::physics::planck::{measure, PlanckInput, PlanckResult};
use crate::state::{Experiment, StatusLine};

#[derive(Default)]
pub struct PlanckLab {
    pub metal: Metal,
    pub input: PlanckInput,
    pub result: Option<PlanckResult>,
    pub status: StatusLine,
    chart_rect: Option<Rect>,
}

impl PlanckLab {
    pub fn calculate(&mut self) {
        let outcome = self.input.parse().and_then(|p| measure(self.metal, p));
        match outcome {
            Ok(r) => {
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
            "Fit: {}\nh (estimated) = {:.4e} J·s\nh (reference) = {PLANCK:e} J·s\n\
             Relative error: {:.3}%\nWork function (estimated) = {:.3} eV",
            r.fit,
            r.h_estimate,
            r.relative_error() * 100.0,
            r.work_function_estimate_j / ELEMENTARY_CHARGE
        )
    }
}

pub fn window(ctx: &Context, open: &mut bool, lab: &mut PlanckLab, pending: &mut Option<PendingCapture>) {
    egui::Window::new(Experiment::Planck.title())
        .open(open)
        .default_width(720.0)
        .show(ctx, |ui: &mut Ui| {
            egui::Grid::new("planck_form")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    text_field(ui, "Lowest frequency (THz)", &mut lab.input.min_frequency_thz, "1200");
                    text_field(ui, "Highest frequency (THz)", &mut lab.input.max_frequency_thz, "3000");
                    text_field(ui, "Points", &mut lab.input.points, "10");
                    ui.label("Metal");
                    egui::ComboBox::from_id_salt("planck_metal")
                        .selected_text(lab.metal.name())
                        .show_ui(ui, |ui: &mut Ui| {
                            for m in Metal::ALL {
                                ui.selectable_value(&mut lab.metal, m, m.name());
                            }
                        });
                    ui.end_row();
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
                capture::request(ctx, pending, Experiment::Planck, lab.chart_rect, &mut lab.status);
            }
            if actions.save_data {
                let records = lab.result.as_ref().map(|r| r.records()).unwrap_or_default();
                capture::save_records("planck.csv", &records, &mut lab.status);
            }
            status_line(ui, &lab.status);
            summary(ui, &lab.summary_text());

            let Some(r) = &lab.result else {
                lab.chart_rect = None;
                return;
            };
            let rect = ui
                .horizontal(|ui: &mut Ui| {
                    let rect = chart(ui, r);
                    ui.vertical(|ui: &mut Ui| table(ui, r));
                    rect
                })
                .inner;
            lab.chart_rect = Some(rect);
        });
}

fn chart(ui: &mut Ui, r: &PlanckResult) -> Rect {
    let colors = SeriesColors::new(2);
    let (Some(&lo), Some(&hi)) = (r.frequency_thz.first(), r.frequency_thz.last()) else {
        return ui.min_rect();
    };
    let fit_x = [lo, hi];
    let fit_y = [r.fitted_voltage(lo), r.fitted_voltage(hi)];
    Plot::new("planck_chart")
        .width((ui.available_width() - 220.0).max(300.0))
        .height(CHART_HEIGHT)
        .legend(egui_plot::Legend::default())
        .x_axis_label("Frequency (THz)")
        .y_axis_label("Stopping voltage (V)")
        .show(ui, |plot_ui| {
            plot_ui.points(plot::scatter("Measured", &r.frequency_thz, &r.stopping_voltage_v, colors.get(0)));
            plot_ui.line(plot::line("Least-squares line", &fit_x, &fit_y, colors.get(1)));
        })
        .response
        .rect
}

fn table(ui: &mut Ui, r: &PlanckResult) {
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(CHART_HEIGHT)
        .columns(Column::exact(100.0), 2)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("ν (THz)");
            });
            header.col(|ui| {
                ui.strong("U₀ (V)");
            });
        })
        .body(|body| {
            body.rows(18.0, r.frequency_thz.len(), |mut row| {
                let i = row.index();
                row.col(|ui| {
                    ui.label(format!("{:.2}", r.frequency_thz[i]));
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", r.stopping_voltage_v[i]));
                });
            });
        });
}
