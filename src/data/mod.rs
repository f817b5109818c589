/// Data layer: the numeric table, loading it, and exporting results.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  column names + column-major f64
///   └──────────┘
///        │
///        ▼
///     analysis / plots ──► export (CSV, PNG)
/// ```

pub mod export;
pub mod loader;
pub mod model;
