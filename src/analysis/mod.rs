/// Analysis layer: descriptive statistics and curve fitting.
///
/// Architecture:
/// ```text
///   Dataset (column-major f64)
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  stats    │   │   fit     │  polynomial least squares
///   └──────────┘   └──────────┘
///        │              │
///        │         ┌──────────┐
///        │         │  spline   │  cubic spline interpolation
///        │         └──────────┘
///        ▼              ▼
///     ColumnSummary / Polynomial / CubicSpline
/// ```
///
/// Every function here is pure: it takes slices and returns owned results.
pub mod fit;
pub mod spline;
pub mod stats;

use thiserror::Error;

/// Errors raised by the statistics and fitting routines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// No dataset has been imported yet.
    #[error("no data imported, please import a data file first")]
    NoData,

    #[error("analysis needs at least {needed} columns, dataset has {got}")]
    TooFewColumns { needed: usize, got: usize },

    #[error("need at least {needed} points, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("x has {x} values but y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("value {index} is not a finite number")]
    NonFinite { index: usize },

    #[error("x values must be strictly increasing (at index {index})")]
    NotIncreasing { index: usize },

    #[error("data has zero variance")]
    ZeroVariance,

    #[error("least-squares system is rank deficient")]
    Singular,
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// `n` evenly spaced samples over `[start, end]`, both ends included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Reject non-finite samples.
pub(crate) fn ensure_finite(xs: &[f64]) -> Result<()> {
    match xs.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(AnalysisError::NonFinite { index }),
        None => Ok(()),
    }
}

pub(crate) fn ensure_same_len(x: &[f64], y: &[f64]) -> Result<()> {
    if x.len() != y.len() {
        return Err(AnalysisError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn linspace_includes_both_ends() {
        let xs = linspace(1.0, 2.0, 5);
        assert_eq!(xs.len(), 5);
        assert_eq!(xs[0], 1.0);
        assert_eq!(xs[4], 2.0);
        assert_approx_eq!(xs[1], 1.25);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
    }

    #[test]
    fn finite_check_reports_index() {
        assert_eq!(
            ensure_finite(&[1.0, f64::NAN]),
            Err(AnalysisError::NonFinite { index: 1 })
        );
        assert!(ensure_finite(&[1.0, 2.0]).is_ok());
    }
}
