use std::path::Path;

use anyhow::{bail, Context, Result};
use eframe::egui::ColorImage;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Tabular exports
// ---------------------------------------------------------------------------

/// Write equally long columns as CSV with a header row.
pub fn write_columns(path: &Path, headers: &[&str], columns: &[&[f64]]) -> Result<()> {
    if headers.len() != columns.len() {
        bail!("{} headers for {} columns", headers.len(), columns.len());
    }
    let rows = columns.first().map_or(0, |c| c.len());
    if let Some(bad) = columns.iter().position(|c| c.len() != rows) {
        bail!("column '{}' has {} rows, expected {rows}", headers[bad], columns[bad].len());
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(headers).context("writing CSV header")?;
    for r in 0..rows {
        writer
            .write_record(columns.iter().map(|c| c[r].to_string()))
            .with_context(|| format!("writing CSV row {r}"))?;
    }
    writer.flush().context("flushing CSV")?;
    log::info!("Exported {rows} rows to {}", path.display());
    Ok(())
}

/// Serialize records (one struct per row, field names as header).
pub fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for (i, rec) in records.iter().enumerate() {
        writer
            .serialize(rec)
            .with_context(|| format!("writing record {i}"))?;
    }
    writer.flush().context("flushing CSV")?;
    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Image export
// ---------------------------------------------------------------------------

/// Save a captured chart as PNG.
pub fn save_png(path: &Path, image: &ColorImage) -> Result<()> {
    let [w, h] = image.size;
    let rgba: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| c.to_srgba_unmultiplied())
        .collect();
    let buffer = image::RgbaImage::from_raw(w as u32, h as u32, rgba)
        .context("captured image has inconsistent size")?;
    buffer
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("saving {}", path.display()))?;
    log::info!("Saved {w}x{h} image to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Reading {
        frequency_thz: f64,
        stopping_voltage: f64,
    }

    #[test]
    fn columns_round_trip_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_columns(&path, &["x", "y"], &[&[1.0, 2.0], &[0.5, -1.5]]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "x,y\n1,0.5\n2,-1.5\n");
    }

    #[test]
    fn uneven_columns_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let err = write_columns(&path, &["x", "y"], &[&[1.0, 2.0], &[0.5]]).unwrap_err();
        assert!(err.to_string().contains("column 'y'"));
    }

    #[test]
    fn records_use_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planck.csv");
        let rows = vec![Reading {
            frequency_thz: 800.0,
            stopping_voltage: 1.2,
        }];
        write_records(&path, &rows).unwrap();
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let back: Vec<Reading> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(back, rows);
    }

    #[test]
    fn png_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let img = ColorImage::new([4, 3], Color32::from_rgb(10, 20, 30));
        save_png(&path, &img).unwrap();
        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (4, 3));
        assert_eq!(back.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }
}
