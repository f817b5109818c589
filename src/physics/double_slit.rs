use std::f64::consts::PI;

use serde::Serialize;

use super::{parse_count, parse_field, positive, Result};

/// Samples across the screen; the screen spans five fringe spacings either
/// side of the centre.
const SCREEN_SAMPLES: usize = 400;
const SCREEN_FRINGES: f64 = 5.0;

/// Form contents of the double-slit lab.
#[derive(Debug, Clone, Default)]
pub struct DoubleSlitInput {
    /// Slit spacing d (mm), default 0.1.
    pub slit_spacing_mm: String,
    /// Slit-to-screen distance L (m), default 1.
    pub screen_distance_m: String,
    /// Fringe order n, default 0.
    pub fringe_order: String,
    /// Wavelength λ (nm), default 500.
    pub wavelength_nm: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleSlitParams {
    pub slit_spacing_m: f64,
    pub screen_distance_m: f64,
    pub fringe_order: i64,
    pub wavelength_m: f64,
}

impl DoubleSlitInput {
    pub fn parse(&self) -> Result<DoubleSlitParams> {
        let d_mm = parse_field("Slit spacing", &self.slit_spacing_mm, 0.1)?;
        let l = parse_field("Screen distance", &self.screen_distance_m, 1.0)?;
        let n = parse_count("Fringe order", &self.fringe_order, 0)?;
        let nm = parse_field("Wavelength", &self.wavelength_nm, 500.0)?;
        Ok(DoubleSlitParams {
            slit_spacing_m: positive("Slit spacing", d_mm)? * 1e-3,
            screen_distance_m: positive("Screen distance", l)?,
            fringe_order: n,
            wavelength_m: positive("Wavelength", nm)? * 1e-9,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DoubleSlitResult {
    pub params: DoubleSlitParams,
    /// x = nλL/d (m).
    pub fringe_position_m: f64,
    /// λL/d (m).
    pub fringe_spacing_m: f64,
    /// Screen coordinate of each sample (m), from -y_m up to (not including) y_m.
    pub screen_m: Vec<f64>,
    /// Relative intensity 4cos²(φ/2), between 0 and 4.
    pub intensity: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct ScreenSample {
    pub position_m: f64,
    pub intensity: f64,
}

pub fn fringe_position(p: &DoubleSlitParams) -> f64 {
    p.fringe_order as f64 * p.wavelength_m * p.screen_distance_m / p.slit_spacing_m
}

/// Two-source intensity at screen coordinate `y`, from the exact path
/// difference rather than the small-angle approximation.
pub fn intensity_at(p: &DoubleSlitParams, y: f64) -> f64 {
    let half = p.slit_spacing_m / 2.0;
    let l2 = p.screen_distance_m * p.screen_distance_m;
    let r1 = ((y - half).powi(2) + l2).sqrt();
    let r2 = ((y + half).powi(2) + l2).sqrt();
    let phi = 2.0 * PI * (r2 - r1) / p.wavelength_m;
    4.0 * (phi / 2.0).cos().powi(2)
}

pub fn simulate(params: DoubleSlitParams) -> DoubleSlitResult {
    let spacing = params.wavelength_m * params.screen_distance_m / params.slit_spacing_m;
    let y_max = SCREEN_FRINGES * spacing;
    let step = 2.0 * y_max / SCREEN_SAMPLES as f64;
    let screen_m: Vec<f64> = (0..SCREEN_SAMPLES)
        .map(|i| -y_max + step * i as f64)
        .collect();
    let intensity = screen_m.iter().map(|&y| intensity_at(&params, y)).collect();

    DoubleSlitResult {
        params,
        fringe_position_m: fringe_position(&params),
        fringe_spacing_m: spacing,
        screen_m,
        intensity,
    }
}

impl DoubleSlitResult {
    /// Intensities mapped to 0–255 for the fringe image.
    pub fn brightness(&self) -> Vec<u8> {
        self.intensity
            .iter()
            .map(|i| (i / 4.0 * 255.0).round().clamp(0.0, 255.0) as u8)
            .collect()
    }

    pub fn half_width_m(&self) -> f64 {
        SCREEN_FRINGES * self.fringe_spacing_m
    }

    pub fn samples(&self) -> Vec<ScreenSample> {
        self.screen_m
            .iter()
            .zip(&self.intensity)
            .map(|(&position_m, &intensity)| ScreenSample {
                position_m,
                intensity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use more_asserts::assert_lt;

    use super::*;
    use crate::physics::{InputError, PhysicsError};

    fn defaults() -> DoubleSlitParams {
        DoubleSlitInput::default().parse().unwrap()
    }

    #[test]
    fn defaults_are_classroom_values() {
        let p = defaults();
        assert_approx_eq!(p.slit_spacing_m, 1e-4);
        assert_eq!(p.screen_distance_m, 1.0);
        assert_eq!(p.fringe_order, 0);
        assert_approx_eq!(p.wavelength_m, 5e-7);
    }

    #[test]
    fn fringe_position_formula() {
        let p = DoubleSlitParams {
            fringe_order: 3,
            ..defaults()
        };
        // 3 · 500 nm · 1 m / 0.1 mm = 15 mm
        assert_approx_eq!(fringe_position(&p), 15e-3, 1e-12);
    }

    #[test]
    fn bright_centre_dark_first_minimum() {
        let p = defaults();
        assert_approx_eq!(intensity_at(&p, 0.0), 4.0);
        let spacing = p.wavelength_m * p.screen_distance_m / p.slit_spacing_m;
        assert_lt!(intensity_at(&p, spacing / 2.0), 1e-3);
        assert_approx_eq!(intensity_at(&p, spacing), 4.0, 1e-3);
    }

    #[test]
    fn screen_spans_five_fringes() {
        let r = simulate(defaults());
        assert_eq!(r.screen_m.len(), 400);
        assert_approx_eq!(r.screen_m[0], -r.half_width_m());
        assert_approx_eq!(r.screen_m[200], 0.0, 1e-15);
        assert_eq!(r.brightness()[200], 255);
    }

    #[test]
    fn zero_slit_spacing_is_rejected() {
        let input = DoubleSlitInput {
            slit_spacing_mm: "0".into(),
            ..Default::default()
        };
        assert_eq!(
            input.parse(),
            Err(PhysicsError::Input(InputError::OutOfRange {
                field: "Slit spacing",
                requirement: "greater than zero"
            }))
        );
    }
}
