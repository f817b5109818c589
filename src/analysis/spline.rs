use super::{ensure_finite, ensure_same_len, linspace, AnalysisError, Result};

/// End condition of the interpolating spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplineBoundary {
    /// Third derivative continuous across the second and penultimate knots.
    #[default]
    NotAKnot,
    /// Zero second derivative at both ends.
    Natural,
}

/// Piecewise cubic interpolant stored as knots plus the second derivative
/// at each knot.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    m: Vec<f64>,
}

impl CubicSpline {
    /// Build the spline through `(x, y)`. `x` must be strictly increasing.
    pub fn new(x: &[f64], y: &[f64], boundary: SplineBoundary) -> Result<Self> {
        ensure_same_len(x, y)?;
        ensure_finite(x)?;
        ensure_finite(y)?;
        let n = x.len();
        if n < 2 {
            return Err(AnalysisError::TooFewPoints { needed: 2, got: n });
        }
        if let Some(i) = x.windows(2).position(|w| w[1] <= w[0]) {
            return Err(AnalysisError::NotIncreasing { index: i + 1 });
        }

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = y.windows(2).zip(&h).map(|(w, hi)| (w[1] - w[0]) / hi).collect();

        let m = match (n, boundary) {
            (2, _) => vec![0.0; 2],
            (3, SplineBoundary::NotAKnot) => {
                // One parabola through all three points.
                let c = 2.0 * (slope[1] - slope[0]) / (h[0] + h[1]);
                vec![c; 3]
            }
            _ => solve_second_derivatives(&h, &slope, boundary),
        };

        Ok(CubicSpline {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    pub fn knots(&self) -> (&[f64], &[f64]) {
        (&self.x, &self.y)
    }

    /// Second derivative at each knot.
    pub fn second_derivatives(&self) -> &[f64] {
        &self.m
    }

    /// Evaluate at `t`; outside the knot range the end pieces are extended.
    pub fn eval(&self, t: f64) -> f64 {
        let last = self.x.len() - 2;
        let i = self.x.partition_point(|&k| k <= t).saturating_sub(1).min(last);
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;
        let a = x1 - t;
        let b = t - x0;
        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }

    /// `n` evenly spaced samples over the knot range.
    pub fn sample(&self, n: usize) -> (Vec<f64>, Vec<f64>) {
        let xs = linspace(self.x[0], self.x[self.x.len() - 1], n);
        let ys = xs.iter().map(|&t| self.eval(t)).collect();
        (xs, ys)
    }
}

/// Solve for the knot second derivatives with at least three knots
/// (four for not-a-knot). The interior equations
///
/// `h[i-1]·M[i-1] + 2(h[i-1]+h[i])·M[i] + h[i]·M[i+1] = 6(s[i] - s[i-1])`
///
/// form a tridiagonal system in `M[1..n-1]`; the end conditions are folded
/// into its first and last rows.
fn solve_second_derivatives(h: &[f64], slope: &[f64], boundary: SplineBoundary) -> Vec<f64> {
    let n = h.len() + 1;
    let k = n - 2;
    let mut sub = vec![0.0; k];
    let mut diag = vec![0.0; k];
    let mut sup = vec![0.0; k];
    let mut rhs = vec![0.0; k];

    for r in 0..k {
        let i = r + 1;
        sub[r] = h[i - 1];
        diag[r] = 2.0 * (h[i - 1] + h[i]);
        sup[r] = h[i];
        rhs[r] = 6.0 * (slope[i] - slope[i - 1]);
    }

    if boundary == SplineBoundary::NotAKnot {
        // M0 = M1·(1 + h0/h1) - M2·h0/h1
        let (h0, h1) = (h[0], h[1]);
        diag[0] = 3.0 * h0 + 2.0 * h1 + h0 * h0 / h1;
        sup[0] = h1 - h0 * h0 / h1;
        // M[n-1] = M[n-2]·(1 + b/a) - M[n-3]·b/a
        let (a, b) = (h[n - 3], h[n - 2]);
        sub[k - 1] = a - b * b / a;
        diag[k - 1] = 2.0 * a + 3.0 * b + b * b / a;
    }

    // Thomas algorithm.
    for r in 1..k {
        let w = sub[r] / diag[r - 1];
        diag[r] -= w * sup[r - 1];
        rhs[r] -= w * rhs[r - 1];
    }
    let mut interior = vec![0.0; k];
    interior[k - 1] = rhs[k - 1] / diag[k - 1];
    for r in (0..k - 1).rev() {
        interior[r] = (rhs[r] - sup[r] * interior[r + 1]) / diag[r];
    }

    let mut m = Vec::with_capacity(n);
    match boundary {
        SplineBoundary::Natural => {
            m.push(0.0);
            m.extend_from_slice(&interior);
            m.push(0.0);
        }
        SplineBoundary::NotAKnot => {
            let (h0, h1) = (h[0], h[1]);
            let (a, b) = (h[n - 3], h[n - 2]);
            let m1 = interior[0];
            let m2 = interior[1];
            let mp = interior[k - 1];
            let mpp = interior[k - 2];
            m.push(m1 * (1.0 + h0 / h1) - m2 * h0 / h1);
            m.extend_from_slice(&interior);
            m.push(mp * (1.0 + b / a) - mpp * b / a);
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn cubic(t: f64) -> f64 {
        0.5 * t.powi(3) - t * t + 2.0 * t - 1.0
    }

    #[test]
    fn interpolates_knots() {
        let x = [0.0, 1.0, 2.5, 3.0, 4.5, 6.0];
        let y = [1.0, -2.0, 0.5, 4.0, 3.0, 0.0];
        for boundary in [SplineBoundary::NotAKnot, SplineBoundary::Natural] {
            let s = CubicSpline::new(&x, &y, boundary).unwrap();
            for (&xi, &yi) in x.iter().zip(&y) {
                assert_approx_eq!(s.eval(xi), yi, 1e-12);
            }
        }
    }

    #[test]
    fn not_a_knot_reproduces_cubics() {
        let x = [-1.0, 0.0, 0.5, 2.0, 3.0, 5.0];
        let y: Vec<f64> = x.iter().map(|&t| cubic(t)).collect();
        let s = CubicSpline::new(&x, &y, SplineBoundary::NotAKnot).unwrap();
        for t in [-0.7, 0.25, 1.3, 2.8, 4.1] {
            assert_approx_eq!(s.eval(t), cubic(t), 1e-9);
        }
    }

    #[test]
    fn natural_has_flat_curvature_at_ends() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 0.0, 1.0];
        let s = CubicSpline::new(&x, &y, SplineBoundary::Natural).unwrap();
        let m = s.second_derivatives();
        assert_eq!(m[0], 0.0);
        assert_eq!(m[3], 0.0);
        // symmetric system: M1 = -M2, 4·M1 + M2 = -12
        assert_approx_eq!(m[1], -4.0);
        assert_approx_eq!(m[2], 4.0);
    }

    #[test]
    fn two_points_are_a_line() {
        let s = CubicSpline::new(&[0.0, 2.0], &[1.0, 5.0], SplineBoundary::NotAKnot).unwrap();
        assert_approx_eq!(s.eval(1.0), 3.0);
        assert_approx_eq!(s.eval(3.0), 7.0);
    }

    #[test]
    fn three_points_not_a_knot_is_parabola() {
        let x = [0.0, 1.0, 3.0];
        let y: Vec<f64> = x.iter().map(|t| t * t).collect();
        let s = CubicSpline::new(&x, &y, SplineBoundary::NotAKnot).unwrap();
        assert_approx_eq!(s.eval(2.0), 4.0, 1e-12);
        assert_approx_eq!(s.eval(0.5), 0.25, 1e-12);
    }

    #[test]
    fn sample_spans_knot_range() {
        let x = [1.0, 2.0, 4.0, 5.0];
        let y = [1.0, 3.0, 2.0, 0.0];
        let s = CubicSpline::new(&x, &y, SplineBoundary::default()).unwrap();
        let (xs, ys) = s.sample(100);
        assert_eq!(xs.len(), 100);
        assert_eq!(xs[0], 1.0);
        assert_eq!(xs[99], 5.0);
        assert_approx_eq!(ys[99], 0.0, 1e-12);
    }

    #[test]
    fn rejects_unsorted_x() {
        assert_eq!(
            CubicSpline::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0], SplineBoundary::Natural),
            Err(AnalysisError::NotIncreasing { index: 2 })
        );
    }

    #[test]
    fn rejects_single_point() {
        assert_eq!(
            CubicSpline::new(&[1.0], &[1.0], SplineBoundary::Natural),
            Err(AnalysisError::TooFewPoints { needed: 2, got: 1 })
        );
    }
}
