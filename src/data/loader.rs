use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Turn what the user typed or dropped into the path field into a path.
///
/// Drag-and-drop from a file manager yields `file:///...` URLs; the scheme is
/// stripped, and on Windows the slash before the drive letter as well.
pub fn normalize_path(input: &str) -> PathBuf {
    let trimmed = input.trim().trim_matches('"');
    let Some(rest) = trimmed.strip_prefix("file://") else {
        return PathBuf::from(trimmed);
    };
    let bytes = rest.as_bytes();
    let has_drive = bytes.len() >= 3
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && bytes[2] == b':';
    if has_drive {
        PathBuf::from(&rest[1..])
    } else {
        PathBuf::from(rest)
    }
}

/// Load a numeric table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one numeric column per variable
/// * `.json`    – `[{ "x": 1.0, "y": 2.0 }, ...]` or `{ "x": [...], "y": [...] }`
/// * `.parquet` – any integer or float columns (others are skipped)
pub fn load_file(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        bail!("CSV has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                cell.parse::<f64>().with_context(|| {
                    let col = headers.get(c).map(String::as_str).unwrap_or("?");
                    format!("Row {row_no}, column '{col}': '{cell}' is not a number")
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Ok(Dataset::from_rows(headers, &rows)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Two layouts are accepted, matching `df.to_json(orient='records')` and
/// `df.to_json(orient='list')`:
///
/// ```json
/// [ { "U": 1.0, "I": 0.12 }, { "U": 2.0, "I": 0.25 } ]
/// { "U": [1.0, 2.0], "I": [0.12, 0.25] }
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    match &root {
        JsonValue::Array(records) => json_records(records),
        JsonValue::Object(obj) => {
            let mut names = Vec::with_capacity(obj.len());
            let mut columns = Vec::with_capacity(obj.len());
            for (key, val) in obj {
                let arr = val
                    .as_array()
                    .with_context(|| format!("Column '{key}' is not an array"))?;
                let col = arr
                    .iter()
                    .enumerate()
                    .map(|(j, v)| {
                        v.as_f64()
                            .with_context(|| format!("{key}[{j}]: not a number"))
                    })
                    .collect::<Result<Vec<f64>>>()?;
                names.push(key.clone());
                columns.push(col);
            }
            Ok(Dataset::new(names, columns)?)
        }
        _ => bail!("Expected a top-level JSON array or object"),
    }
}

fn json_records(records: &[JsonValue]) -> Result<Dataset> {
    let first = records
        .first()
        .and_then(|r| r.as_object())
        .context("Expected a non-empty array of JSON objects")?;
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let row = headers
            .iter()
            .map(|h| {
                obj.get(h)
                    .and_then(JsonValue::as_f64)
                    .with_context(|| format!("Row {i}: missing or non-numeric '{h}'"))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    Ok(Dataset::from_rows(headers, &rows)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load every numeric column of a Parquet file. Works with files written by
/// both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut names: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (batch_no, batch_result) in reader.enumerate() {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let numeric: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| is_numeric(f.data_type()))
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        if batch_no == 0 {
            for f in schema.fields().iter().filter(|f| !is_numeric(f.data_type())) {
                log::warn!("Skipping non-numeric parquet column '{}'", f.name());
            }
            names = numeric.iter().map(|(_, n)| n.clone()).collect();
            columns = vec![Vec::new(); names.len()];
        }

        for (slot, (col_idx, col_name)) in numeric.iter().enumerate() {
            let values = extract_f64_column(batch.column(*col_idx))
                .with_context(|| format!("column '{col_name}'"))?;
            columns
                .get_mut(slot)
                .context("parquet batches disagree on schema")?
                .extend(values);
        }
    }

    if names.is_empty() {
        bail!("Parquet file has no numeric columns");
    }
    Ok(Dataset::new(names, columns)?)
}

// -- Parquet / Arrow helpers --

fn is_numeric(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32
    )
}

/// Extract a whole numeric column as `f64`. Nulls are an error.
fn extract_f64_column(col: &Arc<dyn Array>) -> Result<Vec<f64>> {
    if col.null_count() > 0 {
        bail!("{} null values", col.null_count());
    }
    let any = col.as_any();
    let out = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .values()
            .to_vec(),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .values()
            .iter()
            .map(|&v| v as f64)
            .collect(),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .values()
            .iter()
            .map(|&v| v as f64)
            .collect(),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .values()
            .iter()
            .map(|&v| v as f64)
            .collect(),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::StringArray;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_file(Path::new("/definitely/not/here/data.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("File not found"));
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let f = write_temp(".xyz", "a\n1\n");
        let err = load_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn csv_with_padding() {
        let f = write_temp(".csv", "U (V), I (mA)\n 1.0, 0.5\n2.0 ,1.0\n3,1.5\n");
        let ds = load_file(f.path()).unwrap();
        assert_eq!(ds.column_names, vec!["U (V)", "I (mA)"]);
        assert_eq!(ds.columns[1], vec![0.5, 1.0, 1.5]);
    }

    #[test]
    fn csv_with_text_cell_names_the_column() {
        let f = write_temp(".csv", "x,y\n1,2\n3,abc\n");
        let err = load_file(f.path()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("column 'y'"), "{msg}");
    }

    #[test]
    fn json_records_keep_key_order() {
        let f = write_temp(".json", r#"[{"t": 0, "a": 1.5}, {"t": 1, "a": 2.5}]"#);
        let ds = load_file(f.path()).unwrap();
        assert_eq!(ds.column_names, vec!["t", "a"]);
        assert_eq!(ds.columns[1], vec![1.5, 2.5]);
    }

    #[test]
    fn json_columns_layout() {
        let f = write_temp(".json", r#"{"x": [1, 2, 3], "y": [2.0, 4.0, 6.0]}"#);
        let ds = load_file(f.path()).unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.xy().unwrap().1, &[2.0, 4.0, 6.0]);
    }

    #[test]
    fn parquet_skips_text_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("label", DataType::Utf8, false),
            Field::new("x", DataType::Int64, false),
            Field::new("y", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["a", "b"])),
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(Float64Array::from(vec![0.5, 0.25])),
            ],
        )
        .unwrap();
        let f = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(f.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(f.path()).unwrap();
        assert_eq!(ds.column_names, vec!["x", "y"]);
        assert_eq!(ds.columns[0], vec![1.0, 2.0]);
    }

    #[test]
    fn drop_urls_become_paths() {
        assert_eq!(
            normalize_path("file:///home/lab/data.csv\n"),
            PathBuf::from("/home/lab/data.csv")
        );
        assert_eq!(
            normalize_path("file:///D:/data.csv"),
            PathBuf::from("D:/data.csv")
        );
        assert_eq!(normalize_path(" \"rel/x.csv\" "), PathBuf::from("rel/x.csv"));
    }
}
