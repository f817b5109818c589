use std::fmt;

use super::{ensure_finite, ensure_same_len, AnalysisError, Result};

// ---------------------------------------------------------------------------
// Fit kinds offered in the UI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitKind {
    Linear,
    Quadratic,
    Cubic,
}

impl FitKind {
    pub const ALL: [FitKind; 3] = [FitKind::Linear, FitKind::Quadratic, FitKind::Cubic];

    pub fn degree(self) -> usize {
        match self {
            FitKind::Linear => 1,
            FitKind::Quadratic => 2,
            FitKind::Cubic => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FitKind::Linear => "Linear fit",
            FitKind::Quadratic => "Quadratic fit",
            FitKind::Cubic => "Cubic fit",
        }
    }
}

// ---------------------------------------------------------------------------
// Polynomial
// ---------------------------------------------------------------------------

/// Polynomial with coefficients stored in ascending order of power:
/// `coeffs[k]` multiplies `x^k`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

/// Relative threshold on the diagonal of R below which the scaled
/// Vandermonde matrix is treated as rank deficient.
const RANK_TOL: f64 = 1e-10;

impl Polynomial {
    pub fn new(coeffs: Vec<f64>) -> Self {
        Polynomial { coeffs }
    }

    /// Ordinary least-squares fit of the given degree.
    ///
    /// Solves the Vandermonde system with Householder QR after scaling every
    /// column to unit norm, so large abscissae (frequencies in Hz, say) stay
    /// well conditioned.
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self> {
        ensure_same_len(x, y)?;
        ensure_finite(x)?;
        ensure_finite(y)?;
        let n = x.len();
        let m = degree + 1;
        if n < m {
            return Err(AnalysisError::TooFewPoints { needed: m, got: n });
        }

        // Column-major Vandermonde: a[j][i] = x_i^j
        let mut a: Vec<Vec<f64>> = (0..m)
            .map(|j| x.iter().map(|&xi| xi.powi(j as i32)).collect())
            .collect();
        let scales: Vec<f64> = a
            .iter_mut()
            .map(|col| {
                let norm = col.iter().map(|v| v * v).sum::<f64>().sqrt();
                let s = if norm > 0.0 { norm } else { 1.0 };
                col.iter_mut().for_each(|v| *v /= s);
                s
            })
            .collect();
        let mut b = y.to_vec();

        for k in 0..m {
            let norm = a[k][k..].iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm <= RANK_TOL {
                return Err(AnalysisError::Singular);
            }
            let alpha = if a[k][k] > 0.0 { -norm } else { norm };

            let mut v: Vec<f64> = a[k][k..].to_vec();
            v[0] -= alpha;
            let vv: f64 = v.iter().map(|t| t * t).sum();

            // Reflect the remaining columns and the right-hand side.
            for col in a.iter_mut().skip(k) {
                reflect(&mut col[k..], &v, vv);
            }
            reflect(&mut b[k..], &v, vv);
        }

        // Back substitution on the upper triangle R (a[j][i], i <= j).
        let mut c = vec![0.0; m];
        for i in (0..m).rev() {
            let tail: f64 = ((i + 1)..m).map(|j| a[j][i] * c[j]).sum();
            if a[i][i].abs() <= RANK_TOL {
                return Err(AnalysisError::Singular);
            }
            c[i] = (b[i] - tail) / a[i][i];
        }

        let coeffs = c.iter().zip(&scales).map(|(ci, s)| ci / s).collect();
        Ok(Polynomial { coeffs })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// Coefficient of determination of this polynomial against `(x, y)`.
    pub fn r_squared(&self, x: &[f64], y: &[f64]) -> Result<f64> {
        ensure_same_len(x, y)?;
        let my = super::stats::mean(y)?;
        let ss_tot: f64 = y.iter().map(|v| (v - my).powi(2)).sum();
        if ss_tot == 0.0 {
            return Err(AnalysisError::ZeroVariance);
        }
        let ss_res: f64 = x
            .iter()
            .zip(y)
            .map(|(&xi, &yi)| (yi - self.eval(xi)).powi(2))
            .sum();
        Ok(1.0 - ss_res / ss_tot)
    }
}

/// Apply the Householder reflector `I - 2 v vᵀ / (vᵀv)` to `col`.
fn reflect(col: &mut [f64], v: &[f64], vv: f64) {
    if vv == 0.0 {
        return;
    }
    let dot: f64 = col.iter().zip(v).map(|(c, vi)| c * vi).sum();
    let f = 2.0 * dot / vv;
    col.iter_mut().zip(v).for_each(|(c, vi)| *c -= f * vi);
}

/// `y = a + bx + cx^2 + dx^3`, two decimals per coefficient.
impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {:.2}", self.coeffs.first().copied().unwrap_or(0.0))?;
        for (k, &c) in self.coeffs.iter().enumerate().skip(1) {
            let sign = if c < 0.0 { '-' } else { '+' };
            let power = match k {
                1 => "x".to_string(),
                _ => format!("x^{k}"),
            };
            write!(f, " {sign} {:.2}{power}", c.abs())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn linear_fit_recovers_line() {
        let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.5 - 3.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.5 * v - 7.0).collect();
        let p = Polynomial::fit(&x, &y, 1).unwrap();
        assert_approx_eq!(p.coefficients()[0], -7.0, 1e-9);
        assert_approx_eq!(p.coefficients()[1], 2.5, 1e-9);
        assert_approx_eq!(p.r_squared(&x, &y).unwrap(), 1.0, 1e-12);
    }

    #[test]
    fn cubic_fit_recovers_cubic() {
        let x: Vec<f64> = (0..12).map(f64::from).collect();
        let truth = Polynomial::new(vec![1.0, -2.0, 0.5, 0.25]);
        let y = truth.eval_many(&x);
        let p = Polynomial::fit(&x, &y, 3).unwrap();
        for (got, want) in p.coefficients().iter().zip(truth.coefficients()) {
            assert_approx_eq!(got, want, 1e-8);
        }
    }

    #[test]
    fn least_squares_line_through_noisy_points() {
        // Sxy = 4.8, Sxx = 5
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.1, 0.9, 2.1, 2.9];
        let p = Polynomial::fit(&x, &y, 1).unwrap();
        assert_approx_eq!(p.coefficients()[1], 0.96, 1e-9);
        assert_approx_eq!(p.coefficients()[0], 0.06, 1e-9);
    }

    #[test]
    fn large_abscissae_stay_conditioned() {
        let x: Vec<f64> = (0..10).map(|i| 5e14 + i as f64 * 5e13).collect();
        let y: Vec<f64> = x.iter().map(|f| 4.136e-15 * f - 4.7).collect();
        let p = Polynomial::fit(&x, &y, 1).unwrap();
        assert_approx_eq!(p.coefficients()[1] / 4.136e-15, 1.0, 1e-9);
        assert_approx_eq!(p.coefficients()[0], -4.7, 1e-6);
    }

    #[test]
    fn too_few_points() {
        assert_eq!(
            Polynomial::fit(&[1.0, 2.0], &[1.0, 2.0], 2),
            Err(AnalysisError::TooFewPoints { needed: 3, got: 2 })
        );
    }

    #[test]
    fn repeated_x_is_singular() {
        assert_eq!(
            Polynomial::fit(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0], 1),
            Err(AnalysisError::Singular)
        );
    }

    #[test]
    fn non_finite_input_is_rejected() {
        assert_eq!(
            Polynomial::fit(&[1.0, 2.0, 3.0], &[1.0, f64::INFINITY, 3.0], 1),
            Err(AnalysisError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn display_formats_signs() {
        let p = Polynomial::new(vec![1.234, -2.0, 0.5]);
        assert_eq!(p.to_string(), "y = 1.23 - 2.00x + 0.50x^2");
    }

    #[test]
    fn fit_kinds_map_to_degrees() {
        let degrees: Vec<usize> = FitKind::ALL.iter().map(|k| k.degree()).collect();
        assert_eq!(degrees, vec![1, 2, 3]);
    }
}
