use serde::Serialize;

use super::constants::{Metal, ELEMENTARY_CHARGE, PLANCK};
use super::{parse_field, parse_points, positive, InputError, Result};
use crate::analysis::fit::Polynomial;
use crate::analysis::linspace;

const THZ: f64 = 1e12;

/// Form contents of the Planck lab.
#[derive(Debug, Clone, Default)]
pub struct PlanckInput {
    /// Lowest light frequency (THz), default 1200.
    pub min_frequency_thz: String,
    /// Highest light frequency (THz), default 3000.
    pub max_frequency_thz: String,
    /// Number of frequency points, default 10.
    pub points: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanckParams {
    pub min_frequency_thz: f64,
    pub max_frequency_thz: f64,
    pub points: usize,
}

impl PlanckInput {
    pub fn parse(&self) -> Result<PlanckParams> {
        let lo = parse_field("Lowest frequency", &self.min_frequency_thz, 1200.0)?;
        let hi = parse_field("Highest frequency", &self.max_frequency_thz, 3000.0)?;
        let points = parse_points("Points", &self.points, 10)?;
        positive("Lowest frequency", lo)?;
        if hi <= lo {
            return Err(InputError::OutOfRange {
                field: "Highest frequency",
                requirement: "above the lowest frequency",
            }
            .into());
        }
        Ok(PlanckParams {
            min_frequency_thz: lo,
            max_frequency_thz: hi,
            points,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PlanckResult {
    pub metal: Metal,
    pub frequency_thz: Vec<f64>,
    pub stopping_voltage_v: Vec<f64>,
    /// U₀ against ν in Hz.
    pub fit: Polynomial,
    pub h_estimate: f64,
    /// Work function recovered from the intercept (J).
    pub work_function_estimate_j: f64,
}

#[derive(Debug, Serialize)]
pub struct PlanckRecord {
    pub frequency_thz: f64,
    pub stopping_voltage_v: f64,
}

/// `U₀ = (hν − W)/e`
pub fn stopping_voltage(metal: Metal, frequency_hz: f64) -> f64 {
    (PLANCK * frequency_hz - metal.work_function_j()) / ELEMENTARY_CHARGE
}

pub fn measure(metal: Metal, params: PlanckParams) -> Result<PlanckResult> {
    let frequency_thz = linspace(
        params.min_frequency_thz,
        params.max_frequency_thz,
        params.points,
    );
    let frequency_hz: Vec<f64> = frequency_thz.iter().map(|f| f * THZ).collect();
    let stopping_voltage_v: Vec<f64> = frequency_hz
        .iter()
        .map(|&f| stopping_voltage(metal, f))
        .collect();

    let fit = Polynomial::fit(&frequency_hz, &stopping_voltage_v, 1)?;
    let c = fit.coefficients();
    let (intercept, slope) = (c[0], c[1]);
    log::info!(
        "Planck fit for {}: slope {slope:.4e} V/Hz over {} points",
        metal.name(),
        params.points
    );

    Ok(PlanckResult {
        metal,
        frequency_thz,
        stopping_voltage_v,
        fit,
        h_estimate: ELEMENTARY_CHARGE * slope,
        work_function_estimate_j: -ELEMENTARY_CHARGE * intercept,
    })
}

impl PlanckResult {
    /// |h_est − h| / h
    pub fn relative_error(&self) -> f64 {
        ((self.h_estimate - PLANCK) / PLANCK).abs()
    }

    /// Fitted stopping voltage at a frequency given in THz.
    pub fn fitted_voltage(&self, frequency_thz: f64) -> f64 {
        self.fit.eval(frequency_thz * THZ)
    }

    pub fn records(&self) -> Vec<PlanckRecord> {
        self.frequency_thz
            .iter()
            .zip(&self.stopping_voltage_v)
            .map(|(&frequency_thz, &stopping_voltage_v)| PlanckRecord {
                frequency_thz,
                stopping_voltage_v,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use more_asserts::assert_lt;

    use super::*;
    use crate::physics::PhysicsError;

    #[test]
    fn fit_recovers_planck_constant() {
        let params = PlanckInput::default().parse().unwrap();
        let r = measure(Metal::Copper, params).unwrap();
        assert_eq!(r.frequency_thz.len(), 10);
        assert_lt!(r.relative_error(), 1e-6);
        assert_approx_eq!(
            r.work_function_estimate_j / ELEMENTARY_CHARGE,
            4.7,
            1e-6
        );
    }

    #[test]
    fn voltage_vanishes_at_threshold() {
        let nu0 = Metal::Aluminium.work_function_j() / PLANCK;
        assert_approx_eq!(stopping_voltage(Metal::Aluminium, nu0), 0.0, 1e-12);
    }

    #[test]
    fn fitted_line_passes_through_points() {
        let params = PlanckParams {
            min_frequency_thz: 1500.0,
            max_frequency_thz: 2500.0,
            points: 5,
        };
        let r = measure(Metal::Silver, params).unwrap();
        for (f, u) in r.frequency_thz.iter().zip(&r.stopping_voltage_v) {
            assert_approx_eq!(r.fitted_voltage(*f), *u, 1e-9);
        }
        assert_eq!(r.records().len(), 5);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let input = PlanckInput {
            min_frequency_thz: "2000".into(),
            max_frequency_thz: "1000".into(),
            points: String::new(),
        };
        assert!(matches!(
            input.parse(),
            Err(PhysicsError::Input(InputError::OutOfRange {
                field: "Highest frequency",
                ..
            }))
        ));
    }

    #[test]
    fn single_point_is_rejected() {
        let input = PlanckInput {
            points: "1".into(),
            ..Default::default()
        };
        assert!(input.parse().is_err());
    }

    #[test]
    fn huge_point_count_is_rejected_before_allocating() {
        let input = PlanckInput {
            points: "10000000000".into(),
            ..Default::default()
        };
        assert!(matches!(
            input.parse(),
            Err(PhysicsError::Input(InputError::OutOfRange { field: "Points", .. }))
        ));
    }
}
