use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use eframe::egui::{self, ColorImage, Context, Rect};
use serde::Serialize;

use crate::data::export;
use crate::state::{Experiment, StatusLine};

// ---------------------------------------------------------------------------
// Chart screenshots
// ---------------------------------------------------------------------------

/// A chart waiting for the next frame's screenshot.
#[derive(Debug, Clone)]
pub struct PendingCapture {
    pub experiment: Experiment,
    pub path: PathBuf,
    pub rect: Rect,
}

/// Ask for a file name, then request a viewport screenshot. The image
/// arrives as an input event on a later frame; see [`poll`].
pub fn request(
    ctx: &Context,
    pending: &mut Option<PendingCapture>,
    experiment: Experiment,
    rect: Option<Rect>,
    status: &mut StatusLine,
) {
    let Some(rect) = rect else {
        status.error("nothing to save yet, press Calculate first");
        return;
    };
    let Some(path) = save_dialog("Save image", "chart.png", "PNG image", &["png"]) else {
        return;
    };
    *pending = Some(PendingCapture {
        experiment,
        path,
        rect,
    });
    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
}

/// Pick up a finished screenshot and write the cropped chart to disk.
pub fn poll(ctx: &Context, pending: &mut Option<PendingCapture>) -> Option<(Experiment, Result<PathBuf>)> {
    pending.as_ref()?;
    let image: Arc<ColorImage> = ctx.input(|i| {
        i.raw.events.iter().find_map(|e| match e {
            egui::Event::Screenshot { image, .. } => Some(image.clone()),
            _ => None,
        })
    })?;
    let capture = pending.take()?;

    let region = image.region(&capture.rect, Some(ctx.pixels_per_point()));
    let result = export::save_png(&capture.path, &region).map(|()| capture.path);
    Some((capture.experiment, result))
}

// ---------------------------------------------------------------------------
// Data export
// ---------------------------------------------------------------------------

pub fn save_dialog(title: &str, default_name: &str, filter: &str, extensions: &[&str]) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .set_file_name(default_name)
        .add_filter(filter, extensions)
        .save_file()
}

/// Ask for a CSV path and serialize `records` into it.
pub fn save_records<T: Serialize>(default_name: &str, records: &[T], status: &mut StatusLine) {
    if records.is_empty() {
        status.error("nothing to save yet, press Calculate first");
        return;
    }
    if let Some(path) = save_dialog("Save data", default_name, "CSV", &["csv", "txt"]) {
        report_save(&path, export::write_records(&path, records), status);
    }
}

pub fn report_save(path: &Path, result: Result<()>, status: &mut StatusLine) {
    match result {
        Ok(()) => status.info(format!("Saved {}", path.display())),
        Err(e) => status.error(format!("{e:#}")),
    }
}
