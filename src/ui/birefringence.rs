use eframe::egui::{self, Color32, Context, Rect, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use super::capture::{self, PendingCapture};
use super::{action_row, plot, status_line, summary, CHART_HEIGHT};
use crate::physics::birefringence::{refract, Refraction};
use crate::physics::constants::Crystal;
use crate::state::{Experiment, StatusLine};

pub struct BirefringenceLab {
    pub crystal: Crystal,
    pub incidence_deg: f64,
    pub axis_deg: f64,
    pub result: Option<Refraction>,
    pub status: StatusLine,
    chart_rect: Option<Rect>,
}

impl Default for BirefringenceLab {
    fn default() -> Self {
        Self {
            crystal: Crystal::default(),
            incidence_deg: 30.0,
            axis_deg: 0.0,
            result: None,
            status: StatusLine::default(),
            chart_rect: None,
        }
    }
}

impl BirefringenceLab {
    pub fn calculate(&mut self) {
        match refract(self.crystal, self.incidence_deg, self.axis_deg) {
            Ok(r) => {
                log::info!(
                    "Birefringence: {} at {}°, axis {}°: o {:.2}°, e {:.2}°",
                    self.crystal.name(),
                    self.incidence_deg,
                    self.axis_deg,
                    r.ordinary_deg,
                    r.extraordinary_deg
                );
                self.result = Some(r);
                self.status.clear();
            }
            Err(e) => {
                self.result = None;
                self.status.error(e);
            }
        }
    }

    fn summary_text(&self) -> String {
        let Some(r) = &self.result else {
            return String::new();
        };
        let (no, ne) = r.crystal.indices();
        format!(
            "{}: n_o = {no}, n_e = {ne}, effective n_e = {:.4}\n\
             Ordinary ray: {:.2}°\nExtraordinary ray: {:.2}°\nSeparation: {:.2}°",
            r.crystal.name(),
            r.effective_ne,
            r.ordinary_deg,
            r.extraordinary_deg,
            r.walk_off_deg()
        )
    }
}

pub fn window(ctx: &Context, open: &mut bool, lab: &mut BirefringenceLab, pending: &mut Option<PendingCapture>) {
    egui::Window::new(Experiment::Birefringence.title())
        .open(open)
        .default_width(560.0)
        .show(ctx, |ui: &mut Ui| {
            let mut changed = false;
            egui::Grid::new("birefringence_form")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    ui.label("Crystal");
                    egui::ComboBox::from_id_salt("birefringence_crystal")
                        .selected_text(lab.crystal.name())
                        .show_ui(ui, |ui: &mut Ui| {
                            for c in Crystal::ALL {
                                changed |= ui.selectable_value(&mut lab.crystal, c, c.name()).changed();
                            }
                        });
                    ui.end_row();

                    ui.label("Angle of incidence (°)");
                    changed |= ui
                        .add(egui::Slider::new(&mut lab.incidence_deg, 0.0..=90.0))
                        .changed();
                    ui.end_row();

                    ui.label("Optic axis angle (°)");
                    changed |= ui
                        .add(egui::Slider::new(&mut lab.axis_deg, 0.0..=90.0))
                        .changed();
                    ui.end_row();
                });

            let actions = action_row(ui, "Calculate");
            if actions.calculate || (changed && lab.result.is_some()) {
                lab.calculate();
            }
            if actions.clear {
                lab.result = None;
                lab.chart_rect = None;
                lab.status.clear();
            }
            if actions.save_image {
                capture::request(ctx, pending, Experiment::Birefringence, lab.chart_rect, &mut lab.status);
            }
            if actions.save_data {
                let records: Vec<_> = lab.result.iter().map(Refraction::record).collect();
                capture::save_records("birefringence.csv", &records, &mut lab.status);
            }
            status_line(ui, &lab.status);
            summary(ui, &lab.summary_text());

            lab.chart_rect = lab.result.as_ref().map(|r| ray_diagram(ui, r));
        });
}

fn ray_diagram(ui: &mut Ui, r: &Refraction) -> Rect {
    let ordinary = Color32::from_rgb(230, 80, 80);
    let extraordinary = Color32::from_rgb(80, 140, 230);
    Plot::new("birefringence_rays")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .legend(egui_plot::Legend::default())
        .show(ui, |plot_ui| {
            let outline: PlotPoints = Refraction::crystal_outline().to_vec().into();
            plot_ui.line(Line::new(outline).name("Crystal").color(Color32::GRAY));

            let inc = r.incident_ray();
            plot_ui.line(plot::segment("Incident", inc.from, inc.to, Color32::YELLOW));

            let (inside, exit) = r.ordinary_rays();
            plot_ui.line(plot::segment("o ray", inside.from, inside.to, ordinary));
            plot_ui.line(plot::dashed(plot::segment("o ray", exit.from, exit.to, ordinary)));

            let (inside, exit) = r.extraordinary_rays();
            plot_ui.line(plot::segment("e ray", inside.from, inside.to, extraordinary));
            plot_ui.line(plot::dashed(plot::segment("e ray", exit.from, exit.to, extraordinary)));
        })
        .response
        .rect
}
