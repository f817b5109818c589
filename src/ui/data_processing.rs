use std::path::PathBuf;

use eframe::egui::{self, Context, Rect, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Line, Plot, PlotPoints, Points};

use super::capture::{self, PendingCapture};
use super::{plot, status_line, summary, CHART_HEIGHT};
use crate::analysis::fit::{FitKind, Polynomial};
use crate::analysis::spline::{CubicSpline, SplineBoundary};
use crate::analysis::stats::{describe_dataset, pairwise_correlations, BoxplotStats};
use crate::analysis::{linspace, AnalysisError};
use crate::color::SeriesColors;
use crate::data::export;
use crate::data::loader::{load_file, normalize_path};
use crate::data::model::Dataset;
use crate::state::{Experiment, StatusLine};

/// Samples drawn along a fitted curve.
const CURVE_SAMPLES: usize = 100;
/// Rows shown in the table preview.
const PREVIEW_ROWS: usize = 500;

const FORMULAS: &str = "\
Mean            x̄ = Σxᵢ / n
Variance        σ² = Σ(xᵢ − x̄)² / n
Std deviation   σ = √σ²
Uncertainty     u = σ / 2
Skewness        g₁ = m₃ / σ³
Kurtosis        g₂ = m₄ / σ⁴ − 3
Covariance      cov = Σ(xᵢ − x̄)(yᵢ − ȳ) / (n − 1)
Correlation     r = Σ(xᵢ − x̄)(yᵢ − ȳ) / √(Σ(xᵢ − x̄)² Σ(yᵢ − ȳ)²)
Least squares   minimise Σ(yᵢ − p(xᵢ))² over polynomials p of degree 1–3
Cubic spline    piecewise cubic, C² at the knots, not-a-knot ends";

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Spread,
    Location,
    Uncertainty,
    Shape,
    Correlation,
    Formulas,
}

impl Report {
    pub const ALL: [Report; 6] = [
        Report::Spread,
        Report::Location,
        Report::Uncertainty,
        Report::Shape,
        Report::Correlation,
        Report::Formulas,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Report::Spread => "Variance / std",
            Report::Location => "Mean / extremes",
            Report::Uncertainty => "Uncertainty",
            Report::Shape => "Skewness / kurtosis",
            Report::Correlation => "Correlation",
            Report::Formulas => "Formulas",
        }
    }
}

fn optional(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a (constant column)".to_string(), |v| format!("{v:.6}"))
}

pub fn report(dataset: Option<&Dataset>, which: Report) -> Result<String, AnalysisError> {
    if which == Report::Formulas {
        return Ok(FORMULAS.to_string());
    }
    let ds = dataset.ok_or(AnalysisError::NoData)?;

    if which == Report::Correlation {
        let lines: Vec<String> = pairwise_correlations(ds)?
            .iter()
            .map(|pair| {
                format!(
                    "{} vs {}: r = {}, covariance = {:.6}",
                    pair.x_name,
                    pair.y_name,
                    optional(pair.r),
                    pair.covariance
                )
            })
            .collect();
        return Ok(lines.join("\n"));
    }

    let lines: Vec<String> = describe_dataset(ds)?
        .iter()
        .map(|s| match which {
            Report::Spread => format!("{}: variance = {:.6}, std = {:.6}", s.name, s.variance, s.std_dev),
            Report::Location => format!(
                "{}: mean = {:.6}, min = {:.6}, max = {:.6}",
                s.name, s.mean, s.min, s.max
            ),
            Report::Uncertainty => format!("{}: uncertainty = {:.6}", s.name, s.uncertainty),
            Report::Shape => format!(
                "{}: skewness = {}, kurtosis = {}",
                s.name,
                optional(s.skewness),
                optional(s.kurtosis)
            ),
            Report::Correlation | Report::Formulas => String::new(),
        })
        .collect();
    Ok(lines.join("\n"))
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Scatter,
    Curve,
    Fit(FitKind),
    Spline,
    Boxplot,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::Scatter,
        ChartKind::Curve,
        ChartKind::Fit(FitKind::Linear),
        ChartKind::Fit(FitKind::Quadratic),
        ChartKind::Fit(FitKind::Cubic),
        ChartKind::Spline,
        ChartKind::Boxplot,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter",
            ChartKind::Curve => "Curve",
            ChartKind::Fit(kind) => kind.label(),
            ChartKind::Spline => "Spline",
            ChartKind::Boxplot => "Boxplot",
        }
    }
}

/// Everything needed to draw one chart of the imported data.
#[derive(Debug, Clone, PartialEq)]
pub struct DataChart {
    pub kind: ChartKind,
    pub x_name: String,
    pub y_name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Fitted or interpolated curve.
    pub curve: Option<(Vec<f64>, Vec<f64>)>,
    pub boxplot: Option<BoxplotStats>,
    /// Equation or summary shown under the buttons.
    pub note: String,
}

/// (x, y) pairs ordered by x.
fn sorted_pairs(x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut pairs: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs.into_iter().unzip()
}

fn curve_grid(x: &[f64]) -> Vec<f64> {
    let lo = x.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    linspace(lo, hi, CURVE_SAMPLES)
}

pub fn build_chart(dataset: Option<&Dataset>, kind: ChartKind) -> Result<DataChart, AnalysisError> {
    let ds = dataset.ok_or(AnalysisError::NoData)?;
    let (x, y) = ds.xy()?;
    let mut chart = DataChart {
        kind,
        x_name: ds.column_names[0].clone(),
        y_name: ds.column_names[1].clone(),
        x: x.to_vec(),
        y: y.to_vec(),
        curve: None,
        boxplot: None,
        note: String::new(),
    };

    match kind {
        ChartKind::Scatter | ChartKind::Curve => {}
        ChartKind::Fit(fit) => {
            let poly = Polynomial::fit(x, y, fit.degree())?;
            let r2 = poly.r_squared(x, y)?;
            let grid = curve_grid(x);
            let fitted = poly.eval_many(&grid);
            chart.note = format!("{}: {poly}, R² = {r2:.4}", fit.label());
            chart.curve = Some((grid, fitted));
        }
        ChartKind::Spline => {
            let (sx, sy) = sorted_pairs(x, y);
            let spline = CubicSpline::new(&sx, &sy, SplineBoundary::default())?;
            chart.note = format!("Cubic spline through {} points", sx.len());
            chart.curve = Some(spline.sample(CURVE_SAMPLES));
        }
        ChartKind::Boxplot => {
            let stats = BoxplotStats::from_samples(y)?;
            chart.note = format!(
                "{}: Q1 = {:.4}, median = {:.4}, Q3 = {:.4}, IQR = {:.4}, {} outliers",
                chart.y_name,
                stats.q1,
                stats.median,
                stats.q3,
                stats.iqr(),
                stats.outliers.len()
            );
            chart.boxplot = Some(stats);
        }
    }
    Ok(chart)
}

// ---------------------------------------------------------------------------
// Window state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DataLab {
    pub path_text: String,
    pub dataset: Option<Dataset>,
    pub source: Option<PathBuf>,
    pub output: String,
    pub chart: Option<DataChart>,
    pub status: StatusLine,
    chart_rect: Option<Rect>,
}

impl DataLab {
    pub fn import(&mut self) {
        let path = normalize_path(&self.path_text);
        if path.as_os_str().is_empty() {
            self.status.error("enter a file path or press Browse…");
            return;
        }
        match load_file(&path) {
            Ok(ds) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {}",
                    ds.n_rows(),
                    ds.column_names,
                    path.display()
                );
                self.status.info(format!(
                    "Imported {} rows × {} columns from {}",
                    ds.n_rows(),
                    ds.n_columns(),
                    path.display()
                ));
                self.dataset = Some(ds);
                self.source = Some(path);
                self.chart = None;
                self.output.clear();
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status.error(format!("{e:#}"));
            }
        }
    }

    pub fn run_report(&mut self, which: Report) {
        match report(self.dataset.as_ref(), which) {
            Ok(text) => {
                self.output = text;
                self.status.clear();
            }
            Err(e) => self.status.error(e),
        }
    }

    pub fn run_chart(&mut self, kind: ChartKind) {
        match build_chart(self.dataset.as_ref(), kind) {
            Ok(chart) => {
                log::info!("Data chart: {}", kind.label());
                self.output = chart.note.clone();
                self.chart = Some(chart);
                self.status.clear();
            }
            Err(e) => self.status.error(e),
        }
    }

    fn save_data(&mut self) {
        let Some(ds) = &self.dataset else {
            self.status.error(AnalysisError::NoData);
            return;
        };
        let Some(path) = capture::save_dialog("Save data", "data.csv", "CSV", &["csv", "txt"]) else {
            return;
        };
        let headers: Vec<&str> = ds.column_names.iter().map(String::as_str).collect();
        let columns: Vec<&[f64]> = ds.columns.iter().map(Vec::as_slice).collect();
        let result = export::write_columns(&path, &headers, &columns);
        capture::report_save(&path, result, &mut self.status);
    }
}

pub fn window(ctx: &Context, open: &mut bool, lab: &mut DataLab, pending: &mut Option<PendingCapture>) {
    // A file dropped anywhere on the application fills the path field.
    let dropped = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
    if let Some(path) = dropped {
        lab.path_text = path.display().to_string();
    }

    egui::Window::new(Experiment::DataProcessing.title())
        .open(open)
        .default_width(820.0)
        .vscroll(true)
        .show(ctx, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label("File");
                ui.add(
                    egui::TextEdit::singleline(&mut lab.path_text)
                        .hint_text("path, or drop a file here")
                        .desired_width(420.0),
                );
                if ui.button("Browse…").clicked() {
                    if let Some(path) = pick_file() {
                        lab.path_text = path.display().to_string();
                    }
                }
                if ui.button("Import").clicked() {
                    lab.import();
                }
            });

            ui.horizontal_wrapped(|ui: &mut Ui| {
                for r in Report::ALL {
                    if ui.button(r.label()).clicked() {
                        lab.run_report(r);
                    }
                }
            });
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for k in ChartKind::ALL {
                    if ui.button(k.label()).clicked() {
                        lab.run_chart(k);
                    }
                }
                ui.separator();
                if ui.button("Save image").clicked() {
                    capture::request(ctx, pending, Experiment::DataProcessing, lab.chart_rect, &mut lab.status);
                }
                if ui.button("Save data").clicked() {
                    lab.save_data();
                }
            });

            status_line(ui, &lab.status);
            summary(ui, &lab.output);

            lab.chart_rect = lab.chart.as_ref().map(|c| chart(ui, c));

            if let Some(ds) = &lab.dataset {
                ui.separator();
                preview(ui, ds);
            }
        });
}

pub fn pick_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open data file")
        .add_filter("Supported files", &["csv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

fn chart(ui: &mut Ui, c: &DataChart) -> Rect {
    let colors = SeriesColors::new(2);
    let x_label = if c.kind == ChartKind::Boxplot {
        String::new()
    } else {
        c.x_name.clone()
    };
    Plot::new("data_chart")
        .height(CHART_HEIGHT)
        .legend(egui_plot::Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(c.y_name.clone())
        .show(ui, |plot_ui| match c.kind {
            ChartKind::Curve => {
                plot_ui.line(plot::line(&c.y_name, &c.x, &c.y, colors.get(0)));
            }
            ChartKind::Boxplot => {
                if let Some(b) = &c.boxplot {
                    let elem = BoxElem::new(
                        0.0,
                        BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
                    )
                    .name(&c.y_name)
                    .fill(colors.get(0).gamma_multiply(0.3))
                    .stroke(egui::Stroke::new(1.5, colors.get(0)));
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&c.y_name));
                    let outliers: PlotPoints = b.outliers.iter().map(|&v| [0.0, v]).collect();
                    plot_ui.points(Points::new(outliers).name("Outliers").color(colors.get(1)).radius(3.0));
                }
            }
            _ => {
                plot_ui.points(plot::scatter(&c.y_name, &c.x, &c.y, colors.get(0)));
                if let Some((cx, cy)) = &c.curve {
                    plot_ui.line(Line::new(plot::xy_points(cx, cy)).name(c.kind.label()).color(colors.get(1)).width(2.0));
                }
            }
        })
        .response
        .rect
}

fn preview(ui: &mut Ui, ds: &Dataset) {
    let shown = ds.n_rows().min(PREVIEW_ROWS);
    if shown < ds.n_rows() {
        ui.label(format!("Showing the first {shown} of {} rows", ds.n_rows()));
    }
    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(240.0)
            .column(Column::exact(50.0))
            .columns(Column::auto().at_least(80.0), ds.n_columns())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for name in &ds.column_names {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, shown, |mut row| {
                    let r = row.index();
                    row.col(|ui| {
                        ui.label((r + 1).to_string());
                    });
                    for col in &ds.columns {
                        row.col(|ui| {
                            ui.label(format!("{}", col[r]));
                        });
                    }
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            vec!["x".into(), "y".into()],
            vec![vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![1.0, 3.0, 5.0, 7.0, 9.0]],
        )
        .unwrap()
    }

    #[test]
    fn reports_need_data() {
        assert_eq!(report(None, Report::Spread), Err(AnalysisError::NoData));
        assert!(report(None, Report::Formulas).unwrap().contains("u = σ / 2"));
        assert_eq!(build_chart(None, ChartKind::Scatter), Err(AnalysisError::NoData));
    }

    #[test]
    fn spread_report_lists_every_column() {
        let ds = sample();
        let text = report(Some(&ds), Report::Spread).unwrap();
        assert!(text.contains("x: variance = 2.000000, std = 1.414214"));
        assert!(text.starts_with("x:"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn correlation_of_a_line_is_one() {
        let ds = sample();
        let text = report(Some(&ds), Report::Correlation).unwrap();
        assert!(text.contains("x vs y: r = 1.000000"));
    }

    #[test]
    fn constant_column_is_marked_not_dropped() {
        let ds = Dataset::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0], vec![7.0, 7.0, 7.0]],
        )
        .unwrap();
        let text = report(Some(&ds), Report::Correlation).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("a vs b: r = 1.000000"));
        assert!(text.contains("a vs c: r = n/a (constant column), covariance = 0.000000"));
    }

    #[test]
    fn single_column_cannot_correlate() {
        let ds = Dataset::new(vec!["a".into()], vec![vec![1.0, 2.0]]).unwrap();
        assert_eq!(
            report(Some(&ds), Report::Correlation),
            Err(AnalysisError::TooFewColumns { needed: 2, got: 1 })
        );
    }

    #[test]
    fn linear_chart_carries_equation() {
        let ds = sample();
        let c = build_chart(Some(&ds), ChartKind::Fit(FitKind::Linear)).unwrap();
        assert!(c.note.contains("y = 1.00 + 2.00x"));
        let (cx, cy) = c.curve.unwrap();
        assert_eq!(cx.len(), CURVE_SAMPLES);
        assert_approx_eq!(cy[CURVE_SAMPLES - 1], 9.0, 1e-9);
        assert_approx_eq!(cx[0], 0.0);
    }

    #[test]
    fn spline_sorts_unordered_x() {
        let ds = Dataset::new(
            vec!["x".into(), "y".into()],
            vec![vec![3.0, 1.0, 2.0, 0.0], vec![9.0, 1.0, 4.0, 0.0]],
        )
        .unwrap();
        let c = build_chart(Some(&ds), ChartKind::Spline).unwrap();
        let (cx, _) = c.curve.unwrap();
        assert_approx_eq!(cx[0], 0.0);
        assert_approx_eq!(cx[cx.len() - 1], 3.0);
    }

    #[test]
    fn boxplot_uses_second_column() {
        let ds = sample();
        let c = build_chart(Some(&ds), ChartKind::Boxplot).unwrap();
        let b = c.boxplot.unwrap();
        assert_approx_eq!(b.median, 5.0);
        assert!(b.outliers.is_empty());
    }

    #[test]
    fn missing_file_sets_error() {
        let mut lab = DataLab {
            path_text: "/definitely/not/here.csv".into(),
            ..Default::default()
        };
        lab.import();
        assert!(lab.dataset.is_none());
        assert!(matches!(&lab.status, StatusLine::Error(msg) if msg.contains("File not found")));
    }
}
