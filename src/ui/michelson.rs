use eframe::egui::{self, Context, Rect, TextureHandle, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{HLine, Plot};

use super::capture::{self, PendingCapture};
use super::{action_row, plot, status_line, summary, text_field, CHART_HEIGHT, IMAGE_WIDTH};
use crate::color::{IntensityMap, SeriesColors};
use crate::physics::constants::{LASER_LINES_NM, SPEED_OF_LIGHT_EXACT};
use crate::physics::michelson::{
    mirror_position_mm, ring_pattern, simulate_index_readings, summarize_index, DemoInput,
    DemoPattern, DifferenceRow, IndexReading, IndexSummary, SpeedOfLightLog, WavelengthResult, WavelengthTable,
    DEMO_GRID, MIRROR_TRAVEL_M, READINGS, RING_GRID,
};
use crate::physics::{parse_field, positive, PhysicsError};
use crate::state::{Experiment, StatusLine};

// ---------------------------------------------------------------------------
// Equal-inclination rings with a movable mirror
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RingView {
    laser: usize,
    /// Mirror position as a fraction of its travel.
    travel: f64,
    ring_count: u64,
    texture: Option<TextureHandle>,
    /// (laser, travel, medium index) the texture was drawn for.
    drawn: Option<(usize, f64, f64)>,
}

impl RingView {
    fn wavelength_nm(&self) -> f64 {
        LASER_LINES_NM[self.laser]
    }

    fn step_fringes(&mut self, fringes: f64) {
        let per_fringe = self.wavelength_nm() * 1e-9 / 2.0 / MIRROR_TRAVEL_M;
        self.travel = (self.travel + fringes * per_fringe).clamp(0.0, 1.0);
    }

    fn controls(&mut self, ui: &mut Ui, id: &str) {
        egui::Grid::new(format!("{id}_rings_form"))
            .num_columns(2)
            .show(ui, |ui: &mut Ui| {
                ui.label("Laser (nm)");
                egui::ComboBox::from_id_salt(format!("{id}_laser"))
                    .selected_text(format!("{}", self.wavelength_nm()))
                    .show_ui(ui, |ui: &mut Ui| {
                        for (i, nm) in LASER_LINES_NM.iter().enumerate() {
                            ui.selectable_value(&mut self.laser, i, format!("{nm}"));
                        }
                    });
                ui.end_row();

                ui.label("Movable mirror");
                ui.add(egui::Slider::new(&mut self.travel, 0.0..=1.0).show_value(false));
                ui.end_row();
            });
        ui.horizontal(|ui: &mut Ui| {
            if ui.button("−1 fringe").clicked() {
                self.step_fringes(-1.0);
            }
            if ui.button("+1 fringe").clicked() {
                self.step_fringes(1.0);
            }
            if ui.button("+50 fringes").clicked() {
                self.step_fringes(50.0);
            }
        });
    }

    /// Draw the rings, redrawing the texture only when an input changed.
    fn show(&mut self, ui: &mut Ui, id: &str, medium_index: f64) -> Rect {
        let key = (self.laser, self.travel, medium_index);
        if self.drawn != Some(key) || self.texture.is_none() {
            let pattern = ring_pattern(self.wavelength_nm(), self.travel, medium_index);
            let image = plot::intensity_image(
                &pattern.intensity,
                RING_GRID,
                RING_GRID,
                IntensityMap::for_wavelength(self.wavelength_nm()),
            );
            self.texture = Some(plot::upload(ui, &format!("{id}_rings"), image));
            self.ring_count = pattern.ring_count;
            self.drawn = Some(key);
        }

        ui.label(format!(
            "Mirror position: {:.6} mm    Rings: {}",
            mirror_position_mm(self.travel),
            self.ring_count
        ));
        match &self.texture {
            Some(tex) => plot::show_texture(ui, tex, IMAGE_WIDTH * 0.75),
            None => ui.min_rect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Demonstration
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MichelsonDemoLab {
    pub input: DemoInput,
    pattern: Option<DemoPattern>,
    wavelength_nm: f64,
    texture: Option<TextureHandle>,
    pub status: StatusLine,
    chart_rect: Option<Rect>,
}

impl MichelsonDemoLab {
    fn calculate(&mut self, ui: &Ui) {
        match self.input.parse() {
            Ok(p) => {
                let pattern = p.pattern();
                let image = plot::intensity_image(
                    &pattern.intensity,
                    DEMO_GRID,
                    DEMO_GRID,
                    IntensityMap::for_wavelength(p.wavelength_nm),
                );
                log::info!(
                    "Michelson demo: λ = {} nm, d = {} mm, n = {}",
                    p.wavelength_nm,
                    p.gap_mm,
                    p.medium_index
                );
                self.texture = Some(plot::upload(ui, "michelson_demo", image));
                self.wavelength_nm = p.wavelength_nm;
                self.pattern = Some(pattern);
                self.status.clear();
            }
            Err(e) => self.status.error(e),
        }
    }
}

pub fn demo_window(ctx: &Context, open: &mut bool, lab: &mut MichelsonDemoLab, pending: &mut Option<PendingCapture>) {
    egui::Window::new(Experiment::MichelsonDemo.title())
        .open(open)
        .default_width(780.0)
        .show(ctx, |ui: &mut Ui| {
            egui::Grid::new("michelson_demo_form")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    text_field(ui, "Wavelength (nm)", &mut lab.input.wavelength_nm, "632.8");
                    text_field(ui, "Screen half-width (mm)", &mut lab.input.screen_half_width_mm, "15");
                    text_field(ui, "Mirror separation d (mm)", &mut lab.input.gap_mm, "10");
                    text_field(ui, "Refractive index n", &mut lab.input.medium_index, "1.0");
                });

            let actions = action_row(ui, "Calculate");
            if actions.calculate {
                lab.calculate(ui);
            }
            if actions.clear {
                lab.pattern = None;
                lab.texture = None;
                lab.chart_rect = None;
                lab.status.clear();
            }
            if actions.save_image {
                capture::request(ctx, pending, Experiment::MichelsonDemo, lab.chart_rect, &mut lab.status);
            }
            if actions.save_data {
                let records = lab.pattern.as_ref().map(|p| p.profile_records()).unwrap_or_default();
                capture::save_records("michelson_profile.csv", &records, &mut lab.status);
            }
            status_line(ui, &lab.status);

            let (Some(pattern), Some(tex)) = (&lab.pattern, &lab.texture) else {
                lab.chart_rect = None;
                return;
            };
            let color = IntensityMap::for_wavelength(lab.wavelength_nm).color();
            let rect = ui
                .horizontal(|ui: &mut Ui| {
                    let image = plot::show_texture(ui, tex, IMAGE_WIDTH);
                    let mm: Vec<f64> = pattern.axis_m.iter().map(|x| x * 1e3).collect();
                    let profile = Plot::new("michelson_demo_profile")
                        .width(IMAGE_WIDTH)
                        .height(IMAGE_WIDTH)
                        .x_axis_label("Position (mm)")
                        .y_axis_label("Intensity")
                        .show(ui, |plot_ui| {
                            plot_ui.line(plot::line("Centre line", &mm, &pattern.profile, color));
                        });
                    image.union(profile.response.rect)
                })
                .inner;
            lab.chart_rect = Some(rect);
        });
}

// ---------------------------------------------------------------------------
// Wavelength by successive differences
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct WavelengthLab {
    rings: RingView,
    pub table: WavelengthTable,
    pub result: Option<WavelengthResult>,
    pub status: StatusLine,
    chart_rect: Option<Rect>,
}

impl WavelengthLab {
    fn calculate(&mut self) {
        match self.table.result() {
            Ok(r) => {
                log::info!("Measured wavelength {:.2} nm ± {:.2} nm", r.wavelength_nm, r.uncertainty_nm);
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
        let diffs: Vec<String> = r.delta_e_mm.iter().map(|d| format!("{d:.6}")).collect();
        format!(
            "ΔN = {}\nΔe (mm): {}\nλ = 2·mean(Δe)/ΔN = {:.2} ± {:.2} nm (laser {} nm)",
            r.delta_n,
            diffs.join(", "),
            r.wavelength_nm,
            r.uncertainty_nm,
            self.rings.wavelength_nm()
        )
    }
}

fn differences_table(ui: &mut Ui, rows: &[DifferenceRow]) {
    ui.push_id("wavelength_differences", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::exact(80.0), 4)
            .header(20.0, |mut header| {
                for title in ["Pair", "ΔN", "Δe (mm)", "λ (nm)"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let r = &rows[row.index()];
                    row.col(|ui| {
                        ui.label(format!("{}–{}", r.pair + 1, r.pair + 1 + READINGS / 2));
                    });
                    row.col(|ui| {
                        ui.label(r.delta_n.to_string());
                    });
                    row.col(|ui| {
                        ui.label(r.delta_e_mm.map(|d| format!("{d:.6}")).unwrap_or_default());
                    });
                    row.col(|ui| {
                        ui.label(r.wavelength_nm.map(|l| format!("{l:.2}")).unwrap_or_default());
                    });
                });
            });
    });
}

fn readings_table(ui: &mut Ui, id: &str, positions: &[Option<f64>], first_slot: usize) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::exact(90.0), 2)
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("N");
                });
                header.col(|ui| {
                    ui.strong("e (mm)");
                });
            })
            .body(|body| {
                body.rows(18.0, positions.len(), |mut row| {
                    let i = row.index();
                    row.col(|ui| {
                        ui.label(WavelengthTable::fringe_count(first_slot + i).to_string());
                    });
                    row.col(|ui| {
                        ui.label(positions[i].map(|e| format!("{e:.6}")).unwrap_or_default());
                    });
                });
            });
    });
}

pub fn wavelength_window(ctx: &Context, open: &mut bool, lab: &mut WavelengthLab, pending: &mut Option<PendingCapture>) {
    egui::Window::new(Experiment::MichelsonWavelength.title())
        .open(open)
        .default_width(720.0)
        .show(ctx, |ui: &mut Ui| {
            lab.rings.controls(ui, "wavelength");
            ui.horizontal(|ui: &mut Ui| {
                let next = WavelengthTable::fringe_count(lab.table.next_slot());
                if ui.button(format!("Record reading (N = {next})")).clicked() {
                    lab.table.record(mirror_position_mm(lab.rings.travel));
                }
                if ui.button("Fill ideal readings").clicked() {
                    lab.table.fill_ideal(lab.rings.wavelength_nm());
                }
            });

            let actions = action_row(ui, "Calculate λ");
            if actions.calculate {
                lab.calculate();
            }
            if actions.clear {
                lab.table.clear();
                lab.result = None;
                lab.status.clear();
            }
            if actions.save_image {
                capture::request(ctx, pending, Experiment::MichelsonWavelength, lab.chart_rect, &mut lab.status);
            }
            if actions.save_data {
                capture::save_records("michelson_wavelength.csv", &lab.table.rows(), &mut lab.status);
            }
            status_line(ui, &lab.status);
            summary(ui, &lab.summary_text());

            let rect = ui
                .horizontal(|ui: &mut Ui| {
                    let rect = lab.rings.show(ui, "wavelength", 1.0);
                    let half = READINGS / 2;
                    let positions = lab.table.positions();
                    readings_table(ui, "wavelength_first", &positions[..half], 0);
                    readings_table(ui, "wavelength_second", &positions[half..], half);
                    rect
                })
                .inner;
            ui.add_space(6.0);
            differences_table(ui, &lab.table.differences());
            lab.chart_rect = Some(rect);
        });
}

// ---------------------------------------------------------------------------
// Speed of light
// ---------------------------------------------------------------------------

pub struct SpeedLab {
    rings: RingView,
    pub path_difference_mm: String,
    pub mirror_move_um: String,
    pub log: SpeedOfLightLog,
    pub status: StatusLine,
    chart_rect: Option<Rect>,
}

impl Default for SpeedLab {
    fn default() -> Self {
        Self {
            rings: RingView::default(),
            path_difference_mm: "10".into(),
            mirror_move_um: "5".into(),
            log: SpeedOfLightLog::default(),
            status: StatusLine::default(),
            chart_rect: None,
        }
    }
}

impl SpeedLab {
    fn measure(&mut self) -> Result<(), PhysicsError> {
        let path = parse_field("Path difference", &self.path_difference_mm, 10.0)?;
        let moved = parse_field("Mirror displacement", &self.mirror_move_um, 5.0)?;
        let moved = positive("Mirror displacement", moved)?;
        let nm = self.rings.wavelength_nm();

        let mut rng = rand::thread_rng();
        let reading = self.log.measure(&mut rng, path, moved * 1e-6, nm)?;
        log::info!(
            "Speed of light reading: N = {:.2}, c = {:.4e} m/s",
            reading.fringes,
            reading.speed_m_s
        );
        Ok(())
    }

    fn summary_text(&self) -> String {
        match self.log.mean_speed() {
            Ok(mean) => format!(
                "{} readings, mean c = {mean:.4e} m/s (reference {SPEED_OF_LIGHT_EXACT:.4e} m/s)",
                self.log.readings.len()
            ),
            Err(_) => String::new(),
        }
    }
}

pub fn speed_window(ctx: &Context, open: &mut bool, lab: &mut SpeedLab, pending: &mut Option<PendingCapture>) {
    egui::Window::new(Experiment::SpeedOfLight.title())
        .open(open)
        .default_width(700.0)
        .show(ctx, |ui: &mut Ui| {
            egui::Grid::new("speed_form")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    text_field(ui, "Path difference (mm)", &mut lab.path_difference_mm, "10");
                    text_field(ui, "Mirror displacement (µm)", &mut lab.mirror_move_um, "5");
                });
            lab.rings.controls(ui, "speed");

            let actions = action_row(ui, "Measure");
            if actions.calculate {
                match lab.measure() {
                    Ok(()) => lab.status.clear(),
                    Err(e) => lab.status.error(e),
                }
            }
            if actions.clear {
                lab.log.clear();
                lab.chart_rect = None;
                lab.status.clear();
            }
            if actions.save_image {
                capture::request(ctx, pending, Experiment::SpeedOfLight, lab.chart_rect, &mut lab.status);
            }
            if actions.save_data {
                capture::save_records("speed_of_light.csv", &lab.log.readings, &mut lab.status);
            }
            status_line(ui, &lab.status);
            summary(ui, &lab.summary_text());

            let colors = SeriesColors::new(2);
            let index: Vec<f64> = (1..=lab.log.readings.len()).map(|i| i as f64).collect();
            let speeds: Vec<f64> = lab.log.readings.iter().map(|r| r.speed_m_s).collect();
            let rect = ui
                .horizontal(|ui: &mut Ui| {
                    let rings = lab.rings.show(ui, "speed", 1.0);
                    if lab.log.readings.is_empty() {
                        return rings;
                    }
                    let chart = Plot::new("speed_chart")
                        .width((ui.available_width() - 320.0).max(260.0))
                        .height(CHART_HEIGHT)
                        .legend(egui_plot::Legend::default())
                        .x_axis_label("Reading")
                        .y_axis_label("c (m/s)")
                        .show(ui, |plot_ui| {
                            plot_ui.points(plot::scatter("Measured", &index, &speeds, colors.get(0)));
                            plot_ui.hline(HLine::new(SPEED_OF_LIGHT_EXACT).name("c₀").color(colors.get(1)));
                        });
                    speed_table(ui, &lab.log);
                    rings.union(chart.response.rect)
                })
                .inner;
            lab.chart_rect = Some(rect);
        });
}

fn speed_table(ui: &mut Ui, log: &SpeedOfLightLog) {
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(CHART_HEIGHT)
        .columns(Column::exact(100.0), 3)
        .header(20.0, |mut header| {
            for title in ["Path diff. (mm)", "Fringes", "c (m/s)"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, log.readings.len(), |mut row| {
                let r = &log.readings[row.index()];
                row.col(|ui| {
                    ui.label(format!("{:.2}", r.path_difference_mm));
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", r.fringes));
                });
                row.col(|ui| {
                    ui.label(format!("{:.3e}", r.speed_m_s));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// Refractive index
// ---------------------------------------------------------------------------

pub struct IndexLab {
    rings: RingView,
    pub medium_index: String,
    pub readings: Vec<IndexReading>,
    pub summary: Option<IndexSummary>,
    pub status: StatusLine,
    chart_rect: Option<Rect>,
}

impl Default for IndexLab {
    fn default() -> Self {
        Self {
            rings: RingView::default(),
            medium_index: "1.000".into(),
            readings: Vec::new(),
            summary: None,
            status: StatusLine::default(),
            chart_rect: None,
        }
    }
}

impl IndexLab {
    fn parsed_index(&self) -> Result<f64, PhysicsError> {
        let n = parse_field("Refractive index", &self.medium_index, 1.0)?;
        Ok(positive("Refractive index", n)?)
    }

    fn calculate(&mut self) -> Result<(), PhysicsError> {
        let n = self.parsed_index()?;
        let readings = simulate_index_readings(&mut rand::thread_rng(), n)?;
        let s = summarize_index(&readings)?;
        log::info!("Refractive index readings around {n}: mean {:.6}", s.mean);
        self.readings = readings;
        self.summary = Some(s);
        Ok(())
    }

    fn summary_text(&self) -> String {
        let Some(s) = &self.summary else {
            return String::new();
        };
        format!(
            "{} readings\nMean index: {:.6}\nLowest: {:.6}\nHighest: {:.6}\nUncertainty: {:.6}",
            self.readings.len(),
            s.mean,
            s.min,
            s.max,
            s.uncertainty
        )
    }
}

pub fn index_window(ctx: &Context, open: &mut bool, lab: &mut IndexLab, pending: &mut Option<PendingCapture>) {
    egui::Window::new(Experiment::RefractiveIndex.title())
        .open(open)
        .default_width(760.0)
        .show(ctx, |ui: &mut Ui| {
            egui::Grid::new("index_form")
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    text_field(ui, "Medium refractive index", &mut lab.medium_index, "1.000");
                });
            lab.rings.controls(ui, "index");

            let actions = action_row(ui, "Calculate");
            if actions.calculate {
                match lab.calculate() {
                    Ok(()) => lab.status.clear(),
                    Err(e) => lab.status.error(e),
                }
            }
            if actions.clear {
                lab.readings.clear();
                lab.summary = None;
                lab.status.clear();
            }
            if actions.save_image {
                capture::request(ctx, pending, Experiment::RefractiveIndex, lab.chart_rect, &mut lab.status);
            }
            if actions.save_data {
                capture::save_records("refractive_index.csv", &lab.readings, &mut lab.status);
            }
            status_line(ui, &lab.status);
            summary(ui, &lab.summary_text());

            let medium = lab.parsed_index().unwrap_or(1.0);
            let rect = ui
                .horizontal(|ui: &mut Ui| {
                    let rect = lab.rings.show(ui, "index", medium);
                    if !lab.readings.is_empty() {
                        index_table(ui, &lab.readings);
                    }
                    rect
                })
                .inner;
            lab.chart_rect = Some(rect);
        });
}

fn index_table(ui: &mut Ui, readings: &[IndexReading]) {
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(IMAGE_WIDTH * 0.75)
        .columns(Column::exact(100.0), 3)
        .header(20.0, |mut header| {
            for title in ["Distance (mm)", "Fringes", "n"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, readings.len(), |mut row| {
                let r = &readings[row.index()];
                row.col(|ui| {
                    ui.label(format!("{:.1}", r.displacement_mm));
                });
                row.col(|ui| {
                    ui.label(r.fringes.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.6}", r.refractive_index));
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn fringe_steps_move_half_a_wavelength() {
        let mut view = RingView::default();
        view.step_fringes(50.0);
        let moved_mm = mirror_position_mm(view.travel) - mirror_position_mm(0.0);
        assert_approx_eq!(moved_mm, 50.0 * 632.8e-6 / 2.0, 1e-12);
        view.step_fringes(-1e6);
        assert_eq!(view.travel, 0.0);
    }

    #[test]
    fn index_lab_rejects_text() {
        let mut lab = IndexLab {
            medium_index: "glass".into(),
            ..Default::default()
        };
        assert!(lab.calculate().is_err());
        lab.medium_index = "1.5".into();
        lab.calculate().unwrap();
        assert_eq!(lab.readings.len(), 20);
    }

    #[test]
    fn speed_lab_measures_with_the_selected_laser() {
        let mut lab = SpeedLab::default();
        lab.rings.laser = 1;
        lab.mirror_move_um = "1".into();
        lab.measure().unwrap();
        let nm = LASER_LINES_NM[1];
        assert_approx_eq!(lab.log.readings[0].fringes, 2.0 * 1e-6 / (nm * 1e-9), 1e-9);

        lab.mirror_move_um = "-1".into();
        assert!(lab.measure().is_err());
        assert_eq!(lab.log.readings.len(), 1);
    }
}
