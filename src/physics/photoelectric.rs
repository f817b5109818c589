use serde::Serialize;

use super::constants::{Metal, ELECTRON_MASS, ELEMENTARY_CHARGE, PLANCK};
use super::{non_negative, parse_field, Result};
use crate::analysis::linspace;

const FREQ_MIN_HZ: f64 = 1e15;
const FREQ_MAX_HZ: f64 = 10e15;
const FREQ_SAMPLES: usize = 300;
const INTENSITY_MIN: f64 = 1.0;
const INTENSITY_MAX: f64 = 10_000.0;
const INTENSITY_SAMPLES: usize = 50;

/// Form contents of the photoelectric lab. Both fields default to zero.
#[derive(Debug, Clone, Default)]
pub struct PhotoelectricInput {
    pub photon_count: String,
    pub area_m2: String,
}

impl PhotoelectricInput {
    /// (photon count, illuminated area in m²)
    pub fn parse(&self) -> Result<(f64, f64)> {
        let n = parse_field("Photon count", &self.photon_count, 0.0)?;
        let a = parse_field("Area", &self.area_m2, 0.0)?;
        Ok((non_negative("Photon count", n)?, non_negative("Area", a)?))
    }
}

/// `hν = ½mv² + W` over a frequency sweep, and `I = e·n·A·intensity` over an
/// intensity sweep.
#[derive(Debug, Clone)]
pub struct PhotoelectricResult {
    pub metal: Metal,
    pub frequency_hz: Vec<f64>,
    /// Maximum kinetic energy of the emitted electrons (J), zero below threshold.
    pub kinetic_energy_j: Vec<f64>,
    pub intensity: Vec<f64>,
    /// Photocurrent (A).
    pub current_a: Vec<f64>,
    /// ν₀ = W/h.
    pub threshold_hz: f64,
}

/// One row of the exported data; the two sweeps have different lengths so
/// the shorter one leaves its cells empty.
#[derive(Debug, Serialize)]
pub struct PhotoelectricRecord {
    pub frequency_hz: f64,
    pub kinetic_energy_j: f64,
    pub intensity: Option<f64>,
    pub current_a: Option<f64>,
}

pub fn max_kinetic_energy(metal: Metal, frequency_hz: f64) -> f64 {
    (PLANCK * frequency_hz - metal.work_function_j()).max(0.0)
}

pub fn threshold_frequency(metal: Metal) -> f64 {
    metal.work_function_j() / PLANCK
}

/// Electron speed for a given kinetic energy, from K = ½mv².
pub fn electron_speed(kinetic_energy_j: f64) -> f64 {
    (2.0 * kinetic_energy_j.max(0.0) / ELECTRON_MASS).sqrt()
}

pub fn photocurrent(photon_count: f64, area_m2: f64, intensity: f64) -> f64 {
    ELEMENTARY_CHARGE * photon_count * area_m2 * intensity
}

pub fn simulate(metal: Metal, photon_count: f64, area_m2: f64) -> PhotoelectricResult {
    let frequency_hz = linspace(FREQ_MIN_HZ, FREQ_MAX_HZ, FREQ_SAMPLES);
    let kinetic_energy_j = frequency_hz
        .iter()
        .map(|&f| max_kinetic_energy(metal, f))
        .collect();
    let intensity = linspace(INTENSITY_MIN, INTENSITY_MAX, INTENSITY_SAMPLES);
    let current_a = intensity
        .iter()
        .map(|&i| photocurrent(photon_count, area_m2, i))
        .collect();

    PhotoelectricResult {
        metal,
        frequency_hz,
        kinetic_energy_j,
        intensity,
        current_a,
        threshold_hz: threshold_frequency(metal),
    }
}

impl PhotoelectricResult {
    pub fn final_kinetic_energy(&self) -> f64 {
        self.kinetic_energy_j.last().copied().unwrap_or(0.0)
    }

    pub fn final_current(&self) -> f64 {
        self.current_a.last().copied().unwrap_or(0.0)
    }

    /// Speed of the fastest electrons at the top of the sweep.
    pub fn final_speed(&self) -> f64 {
        electron_speed(self.final_kinetic_energy())
    }

    pub fn records(&self) -> Vec<PhotoelectricRecord> {
        self.frequency_hz
            .iter()
            .zip(&self.kinetic_energy_j)
            .enumerate()
            .map(|(i, (&f, &k))| PhotoelectricRecord {
                frequency_hz: f,
                kinetic_energy_j: k,
                intensity: self.intensity.get(i).copied(),
                current_a: self.current_a.get(i).copied(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn no_emission_below_threshold() {
        let nu0 = threshold_frequency(Metal::Copper);
        assert_eq!(max_kinetic_energy(Metal::Copper, 0.9 * nu0), 0.0);
        assert_approx_eq!(nu0, 4.7 * ELEMENTARY_CHARGE / PLANCK);
    }

    #[test]
    fn energy_grows_with_slope_h_above_threshold() {
        let nu0 = threshold_frequency(Metal::Zinc);
        let k1 = max_kinetic_energy(Metal::Zinc, nu0 + 1e14);
        let k2 = max_kinetic_energy(Metal::Zinc, nu0 + 3e14);
        assert_approx_eq!((k2 - k1) / 2e14, PLANCK, 1e-45);
    }

    #[test]
    fn sweep_shapes() {
        let r = simulate(Metal::Gold, 1e10, 1e-4);
        assert_eq!(r.frequency_hz.len(), 300);
        assert_eq!(r.intensity.len(), 50);
        assert_eq!(r.frequency_hz[299], 10e15);
        assert_approx_eq!(r.final_current(), ELEMENTARY_CHARGE * 1e10 * 1e-4 * 10_000.0);
        assert_approx_eq!(
            r.final_kinetic_energy(),
            PLANCK * 10e15 - 5.1 * ELEMENTARY_CHARGE,
            1e-30
        );
    }

    #[test]
    fn zero_inputs_give_zero_current() {
        let r = simulate(Metal::Copper, 0.0, 0.0);
        assert!(r.current_a.iter().all(|&i| i == 0.0));
    }

    #[test]
    fn records_pad_the_short_sweep() {
        let r = simulate(Metal::Silver, 1.0, 1.0);
        let rows = r.records();
        assert_eq!(rows.len(), 300);
        assert!(rows[49].current_a.is_some());
        assert!(rows[50].current_a.is_none());
    }

    #[test]
    fn blank_form_is_zero() {
        assert_eq!(PhotoelectricInput::default().parse(), Ok((0.0, 0.0)));
        let input = PhotoelectricInput {
            photon_count: "-5".into(),
            area_m2: String::new(),
        };
        assert!(input.parse().is_err());
    }

    #[test]
    fn speed_from_energy() {
        let v = electron_speed(0.5 * ELECTRON_MASS * 1e12);
        assert_approx_eq!(v, 1e6, 1e-3);
    }
}
