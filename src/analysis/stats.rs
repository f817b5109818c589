use super::{ensure_finite, ensure_same_len, AnalysisError, Result};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Moments
// ---------------------------------------------------------------------------

fn non_empty(xs: &[f64]) -> Result<()> {
    if xs.is_empty() {
        return Err(AnalysisError::TooFewPoints { needed: 1, got: 0 });
    }
    ensure_finite(xs)
}

pub fn mean(xs: &[f64]) -> Result<f64> {
    non_empty(xs)?;
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// k-th central moment, dividing by n.
fn central_moment(xs: &[f64], mu: f64, k: i32) -> f64 {
    xs.iter().map(|&x| (x - mu).powi(k)).sum::<f64>() / xs.len() as f64
}

/// Population variance (divides by n).
pub fn variance(xs: &[f64]) -> Result<f64> {
    let mu = mean(xs)?;
    Ok(central_moment(xs, mu, 2))
}

/// Population standard deviation.
pub fn std_dev(xs: &[f64]) -> Result<f64> {
    variance(xs).map(f64::sqrt)
}

/// Measurement uncertainty as taught in the lab course: half the
/// population standard deviation.
pub fn uncertainty(xs: &[f64]) -> Result<f64> {
    Ok(std_dev(xs)? / 2.0)
}

pub fn min(xs: &[f64]) -> Result<f64> {
    non_empty(xs)?;
    Ok(xs.iter().copied().fold(f64::INFINITY, f64::min))
}

pub fn max(xs: &[f64]) -> Result<f64> {
    non_empty(xs)?;
    Ok(xs.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Third standardized central moment.
pub fn skewness(xs: &[f64]) -> Result<f64> {
    let mu = mean(xs)?;
    let sigma = central_moment(xs, mu, 2).sqrt();
    if sigma == 0.0 {
        return Err(AnalysisError::ZeroVariance);
    }
    Ok(central_moment(xs, mu, 3) / sigma.powi(3))
}

/// Excess kurtosis: fourth standardized central moment minus 3.
pub fn kurtosis(xs: &[f64]) -> Result<f64> {
    let mu = mean(xs)?;
    let var = central_moment(xs, mu, 2);
    if var == 0.0 {
        return Err(AnalysisError::ZeroVariance);
    }
    Ok(central_moment(xs, mu, 4) / (var * var) - 3.0)
}

// ---------------------------------------------------------------------------
// Order statistics
// ---------------------------------------------------------------------------

fn sorted(xs: &[f64]) -> Result<Vec<f64>> {
    non_empty(xs)?;
    let mut v = xs.to_vec();
    v.sort_by(f64::total_cmp);
    Ok(v)
}

/// Percentile on already sorted data, linear interpolation between
/// neighbouring order statistics (rank = p/100 · (n-1)).
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// `p` is in percent, clamped to `[0, 100]`.
pub fn percentile(xs: &[f64], p: f64) -> Result<f64> {
    Ok(percentile_sorted(&sorted(xs)?, p))
}

/// (Q1, median, Q3).
pub fn quartiles(xs: &[f64]) -> Result<(f64, f64, f64)> {
    let s = sorted(xs)?;
    Ok((
        percentile_sorted(&s, 25.0),
        percentile_sorted(&s, 50.0),
        percentile_sorted(&s, 75.0),
    ))
}

/// Five-number summary plus Tukey whiskers for a box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxplotStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Lowest sample within `q1 - 1.5 * iqr`.
    pub lower_whisker: f64,
    /// Highest sample within `q3 + 1.5 * iqr`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxplotStats {
    pub fn from_samples(xs: &[f64]) -> Result<Self> {
        let s = sorted(xs)?;
        let q1 = percentile_sorted(&s, 25.0);
        let median = percentile_sorted(&s, 50.0);
        let q3 = percentile_sorted(&s, 75.0);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let inside = s.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        let outliers = s
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Ok(BoxplotStats {
            min: s[0],
            q1,
            median,
            q3,
            max: s[s.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

// ---------------------------------------------------------------------------
// Column summaries
// ---------------------------------------------------------------------------

/// Every descriptive statistic the data-processing window reports for one
/// column. Skewness and kurtosis are `None` for constant columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub uncertainty: f64,
    pub min: f64,
    pub max: f64,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl ColumnSummary {
    pub fn describe(name: &str, xs: &[f64]) -> Result<Self> {
        let mean = mean(xs)?;
        let variance = central_moment(xs, mean, 2);
        let std_dev = variance.sqrt();
        let (q1, median, q3) = quartiles(xs)?;
        Ok(ColumnSummary {
            name: name.to_string(),
            count: xs.len(),
            mean,
            variance,
            std_dev,
            uncertainty: std_dev / 2.0,
            min: min(xs)?,
            max: max(xs)?,
            skewness: skewness(xs).ok(),
            kurtosis: kurtosis(xs).ok(),
            q1,
            median,
            q3,
        })
    }
}

/// Summaries for all columns, in column order.
pub fn describe_dataset(dataset: &Dataset) -> Result<Vec<ColumnSummary>> {
    dataset
        .column_names
        .iter()
        .zip(&dataset.columns)
        .map(|(name, col)| ColumnSummary::describe(name, col))
        .collect()
}

// ---------------------------------------------------------------------------
// Two-variable statistics
// ---------------------------------------------------------------------------

fn paired(x: &[f64], y: &[f64]) -> Result<()> {
    ensure_same_len(x, y)?;
    if x.len() < 2 {
        return Err(AnalysisError::TooFewPoints {
            needed: 2,
            got: x.len(),
        });
    }
    ensure_finite(x)?;
    ensure_finite(y)
}

/// Sample covariance (divides by n-1).
pub fn covariance(x: &[f64], y: &[f64]) -> Result<f64> {
    paired(x, y)?;
    let mx = mean(x)?;
    let my = mean(y)?;
    let s: f64 = x.iter().zip(y).map(|(&a, &b)| (a - mx) * (b - my)).sum();
    Ok(s / (x.len() - 1) as f64)
}

/// Pearson product-moment correlation, always within `[-1, 1]`.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    paired(x, y)?;
    let mx = mean(x)?;
    let my = mean(y)?;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return Err(AnalysisError::ZeroVariance);
    }
    Ok((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairCorrelation {
    pub x_name: String,
    pub y_name: String,
    /// `None` when either column is constant.
    pub r: Option<f64>,
    pub covariance: f64,
}

/// Correlation and covariance for every unordered pair of columns. A
/// constant column leaves `r` empty for its pairs; the others are still
/// reported.
pub fn pairwise_correlations(dataset: &Dataset) -> Result<Vec<PairCorrelation>> {
    let n = dataset.n_columns();
    if n < 2 {
        return Err(AnalysisError::TooFewColumns { needed: 2, got: n });
    }
    let mut out = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let (x, y) = (&dataset.columns[i], &dataset.columns[j]);
            let r = match pearson(x, y) {
                Ok(r) => Some(r),
                Err(AnalysisError::ZeroVariance) => None,
                Err(e) => return Err(e),
            };
            out.push(PairCorrelation {
                x_name: dataset.column_names[i].clone(),
                y_name: dataset.column_names[j].clone(),
                r,
                covariance: covariance(x, y)?,
            });
        }
    }
    Ok(out)
}
