use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;

use super::constants::SPEED_OF_LIGHT_EXACT;
use super::{parse_field, positive, PhysicsError, Result};
use crate::analysis::{linspace, stats};

// ---------------------------------------------------------------------------
// Equal-inclination ring pattern
// ---------------------------------------------------------------------------

/// Grid size of the ring image.
pub const RING_GRID: usize = 200;
/// Half-width of the observation plane (m).
const RING_HALF_WIDTH_M: f64 = 10e-3;
/// Focal length of the viewing lens (m).
const LENS_FOCAL_M: f64 = 0.1;
/// Full travel of the movable mirror (m).
pub const MIRROR_TRAVEL_M: f64 = 5e-4;
/// Arm-length difference with the mirror at the start of its travel (m).
pub const BASE_GAP_M: f64 = 1e-3 + 0.5 * MIRROR_TRAVEL_M;

/// Intensity image of the rings seen through the lens.
#[derive(Debug, Clone)]
pub struct RingPattern {
    /// Row-major `RING_GRID × RING_GRID`, values in `[0, 1]`.
    pub intensity: Vec<f64>,
    /// Optical path difference δ (m).
    pub path_difference_m: f64,
    /// Rings that have emerged (or collapsed) since the base position.
    pub ring_count: u64,
}

/// Optical path difference for a mirror at `travel_fraction` of its travel
/// (0..=1), with the arm filled by a medium of index `medium_index`.
pub fn path_difference(travel_fraction: f64, medium_index: f64) -> f64 {
    (BASE_GAP_M + travel_fraction.clamp(0.0, 1.0) * MIRROR_TRAVEL_M) * medium_index
}

/// Mirror position reading (mm) at a travel fraction.
pub fn mirror_position_mm(travel_fraction: f64) -> f64 {
    path_difference(travel_fraction, 1.0) * 1e3
}

/// `|⌊2(δ − δ₀)/λ⌋|`
pub fn ring_count(path_difference_m: f64, wavelength_m: f64) -> u64 {
    (2.0 * (path_difference_m - BASE_GAP_M) / wavelength_m)
        .floor()
        .abs() as u64
}

pub fn ring_pattern(wavelength_nm: f64, travel_fraction: f64, medium_index: f64) -> RingPattern {
    let lambda = wavelength_nm * 1e-9;
    let delta = path_difference(travel_fraction, medium_index);
    let axis = linspace(-RING_HALF_WIDTH_M, RING_HALF_WIDTH_M, RING_GRID);

    let mut intensity = Vec::with_capacity(RING_GRID * RING_GRID);
    for &y in &axis {
        for &x in &axis {
            let theta = ((x * x + y * y).sqrt() / LENS_FOCAL_M).atan();
            let phase = 2.0 * PI * delta * theta.cos() / lambda;
            intensity.push(phase.cos().powi(2));
        }
    }

    RingPattern {
        intensity,
        path_difference_m: delta,
        ring_count: ring_count(delta, lambda),
    }
}

// ---------------------------------------------------------------------------
// Demonstration pattern (screen, gap and medium as inputs)
// ---------------------------------------------------------------------------

pub const DEMO_GRID: usize = 500;

/// Form contents of the demonstration window.
#[derive(Debug, Clone, Default)]
pub struct DemoInput {
    /// Default 632.8.
    pub wavelength_nm: String,
    /// Half-width of the screen (mm), default 15.
    pub screen_half_width_mm: String,
    /// Mirror separation d (mm), default 10.
    pub gap_mm: String,
    /// Default 1.0.
    pub medium_index: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoParams {
    pub wavelength_nm: f64,
    pub screen_half_width_mm: f64,
    pub gap_mm: f64,
    pub medium_index: f64,
}

impl DemoInput {
    pub fn parse(&self) -> Result<DemoParams> {
        let nm = parse_field("Wavelength", &self.wavelength_nm, 632.8)?;
        let screen = parse_field("Screen width", &self.screen_half_width_mm, 15.0)?;
        let gap = parse_field("Mirror separation", &self.gap_mm, 10.0)?;
        let n = parse_field("Refractive index", &self.medium_index, 1.0)?;
        Ok(DemoParams {
            wavelength_nm: positive("Wavelength", nm)?,
            screen_half_width_mm: positive("Screen width", screen)?,
            gap_mm: positive("Mirror separation", gap)?,
            medium_index: positive("Refractive index", n)?,
        })
    }
}

impl DemoParams {
    pub fn pattern(&self) -> DemoPattern {
        demo_pattern(
            self.wavelength_nm,
            self.screen_half_width_mm,
            self.gap_mm,
            self.medium_index,
        )
    }
}

#[derive(Debug, Clone)]
pub struct DemoPattern {
    /// Screen coordinate along each axis (m).
    pub axis_m: Vec<f64>,
    /// Row-major `DEMO_GRID × DEMO_GRID`, values in `[0, 1]`.
    pub intensity: Vec<f64>,
    /// Intensity along the vertical centre line.
    pub profile: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct ProfileSample {
    pub position_m: f64,
    pub intensity: f64,
}

impl DemoPattern {
    pub fn profile_records(&self) -> Vec<ProfileSample> {
        self.axis_m
            .iter()
            .zip(&self.profile)
            .map(|(&position_m, &intensity)| ProfileSample {
                position_m,
                intensity,
            })
            .collect()
    }
}

/// `δ = 2·n·d·cos i`, `I = cos²(πδ/λ)` over a square screen.
pub fn demo_pattern(
    wavelength_nm: f64,
    screen_half_width_mm: f64,
    gap_mm: f64,
    medium_index: f64,
) -> DemoPattern {
    let lambda = wavelength_nm * 1e-9;
    let d = gap_mm * 1e-3;
    let half = screen_half_width_mm * 1e-3;
    let axis_m = linspace(-half, half, DEMO_GRID);

    let at = |x: f64, y: f64| {
        let i = (x * x + y * y).sqrt().atan();
        let delta = 2.0 * medium_index * d * i.cos();
        (PI * delta / lambda).cos().powi(2)
    };

    let mut intensity = Vec::with_capacity(DEMO_GRID * DEMO_GRID);
    for &y in &axis_m {
        for &x in &axis_m {
            intensity.push(at(x, y));
        }
    }
    let centre = axis_m[DEMO_GRID / 2];
    let profile = axis_m.iter().map(|&y| at(centre, y)).collect();

    DemoPattern {
        axis_m,
        intensity,
        profile,
    }
}

// ---------------------------------------------------------------------------
// Wavelength by successive differences
// ---------------------------------------------------------------------------

/// Readings are taken every this many fringes.
pub const FRINGE_STEP: u32 = 50;
pub const READINGS: usize = 10;
const HALF: usize = READINGS / 2;

/// Ten mirror-position readings at N = 0, 50, …, 450 fringes.
#[derive(Debug, Clone, Default)]
pub struct WavelengthTable {
    positions_mm: [Option<f64>; READINGS],
    next: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthResult {
    /// e(i+5) − e(i) (mm).
    pub delta_e_mm: [f64; HALF],
    /// N(i+5) − N(i).
    pub delta_n: u32,
    pub wavelength_nm: f64,
    /// Half the standard deviation of the per-pair wavelengths (nm).
    pub uncertainty_nm: f64,
}

/// One row of the successive-difference table: reading `pair` against
/// reading `pair + 5`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferenceRow {
    pub pair: usize,
    pub delta_n: u32,
    /// Empty until both readings are taken.
    pub delta_e_mm: Option<f64>,
    /// 2·Δe/ΔN for this pair (nm).
    pub wavelength_nm: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct WavelengthRow {
    pub fringes: u32,
    pub position_mm: Option<f64>,
}

impl WavelengthTable {
    pub fn fringe_count(slot: usize) -> u32 {
        slot as u32 * FRINGE_STEP
    }

    pub fn positions(&self) -> &[Option<f64>; READINGS] {
        &self.positions_mm
    }

    /// Slot the next reading goes into.
    pub fn next_slot(&self) -> usize {
        self.next
    }

    /// Store a reading in the next slot; after the last slot it wraps to
    /// the first.
    pub fn record(&mut self, position_mm: f64) {
        self.positions_mm[self.next] = Some(position_mm);
        self.next = (self.next + 1) % READINGS;
    }

    pub fn clear(&mut self) {
        *self = WavelengthTable::default();
    }

    /// Ideal readings for a given wavelength: the mirror moves λ/2 per fringe.
    pub fn fill_ideal(&mut self, wavelength_nm: f64) {
        self.clear();
        for slot in 0..READINGS {
            let travel_m = Self::fringe_count(slot) as f64 * wavelength_nm * 1e-9 / 2.0;
            self.record((BASE_GAP_M + travel_m) * 1e3);
        }
    }

    pub fn rows(&self) -> Vec<WavelengthRow> {
        self.positions_mm
            .iter()
            .enumerate()
            .map(|(slot, &position_mm)| WavelengthRow {
                fringes: Self::fringe_count(slot),
                position_mm,
            })
            .collect()
    }

    /// Successive differences, filled for the pairs whose readings are
    /// both present.
    pub fn differences(&self) -> Vec<DifferenceRow> {
        let delta_n = Self::fringe_count(HALF);
        (0..HALF)
            .map(|pair| {
                let delta_e_mm = match (self.positions_mm[pair], self.positions_mm[pair + HALF]) {
                    (Some(first), Some(second)) => Some((second - first).abs()),
                    _ => None,
                };
                DifferenceRow {
                    pair,
                    delta_n,
                    delta_e_mm,
                    wavelength_nm: delta_e_mm.map(|de| 2.0 * de / delta_n as f64 * 1e6),
                }
            })
            .collect()
    }

    /// λ = 2·mean(Δe)/ΔN.
    pub fn result(&self) -> Result<WavelengthResult> {
        if let Some(slot) = self.positions_mm.iter().position(Option::is_none) {
            return Err(PhysicsError::Incomplete(format!(
                "missing reading at N = {}",
                Self::fringe_count(slot)
            )));
        }
        let rows = self.differences();
        let mut delta_e_mm = [0.0; HALF];
        for (d, row) in delta_e_mm.iter_mut().zip(&rows) {
            *d = row.delta_e_mm.unwrap_or_default();
        }
        let delta_n = Self::fringe_count(HALF);
        let per_pair_nm: Vec<f64> = rows.iter().filter_map(|r| r.wavelength_nm).collect();

        Ok(WavelengthResult {
            delta_e_mm,
            delta_n,
            wavelength_nm: stats::mean(&per_pair_nm)?,
            uncertainty_nm: stats::uncertainty(&per_pair_nm)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Simulated measurements
// ---------------------------------------------------------------------------

/// One normally distributed reading around `mean`.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> Result<f64> {
    Ok(Normal::new(mean, std_dev)?.sample(rng))
}

/// Fringes counted for a mirror displacement: `N = 2Δd/λ`.
pub fn fringes_for_displacement(displacement_m: f64, wavelength_m: f64) -> f64 {
    2.0 * displacement_m / wavelength_m
}

const SPEED_NOISE: f64 = 1e5;

#[derive(Debug, Clone, Serialize)]
pub struct SpeedReading {
    pub path_difference_mm: f64,
    pub fringes: f64,
    pub speed_m_s: f64,
}

/// Running table of speed-of-light measurements.
#[derive(Debug, Clone, Default)]
pub struct SpeedOfLightLog {
    pub readings: Vec<SpeedReading>,
}

impl SpeedOfLightLog {
    pub fn measure<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        path_difference_mm: f64,
        mirror_move_m: f64,
        wavelength_nm: f64,
    ) -> Result<&SpeedReading> {
        let reading = SpeedReading {
            path_difference_mm,
            fringes: fringes_for_displacement(mirror_move_m, wavelength_nm * 1e-9),
            speed_m_s: gaussian(rng, SPEED_OF_LIGHT_EXACT, SPEED_NOISE)?,
        };
        self.readings.push(reading);
        Ok(&self.readings[self.readings.len() - 1])
    }

    pub fn mean_speed(&self) -> Result<f64> {
        let speeds: Vec<f64> = self.readings.iter().map(|r| r.speed_m_s).collect();
        Ok(stats::mean(&speeds)?)
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}

pub const INDEX_READINGS: usize = 20;
const INDEX_NOISE: f64 = 0.002;

#[derive(Debug, Clone, Serialize)]
pub struct IndexReading {
    pub displacement_mm: f64,
    pub fringes: u32,
    pub refractive_index: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub uncertainty: f64,
}

/// Twenty readings, 0.1 mm and 10 fringes apart, scattered around the
/// true index.
pub fn simulate_index_readings<R: Rng + ?Sized>(rng: &mut R, true_index: f64) -> Result<Vec<IndexReading>> {
    let noise = Normal::new(true_index, INDEX_NOISE)?;
    Ok((1..=INDEX_READINGS)
        .map(|k| IndexReading {
            displacement_mm: k as f64 * 0.1,
            fringes: k as u32 * 10,
            refractive_index: noise.sample(rng),
        })
        .collect())
}

pub fn summarize_index(readings: &[IndexReading]) -> Result<IndexSummary> {
    let values: Vec<f64> = readings.iter().map(|r| r.refractive_index).collect();
    Ok(IndexSummary {
        mean: stats::mean(&values)?,
        min: stats::min(&values)?,
        max: stats::max(&values)?,
        uncertainty: stats::uncertainty(&values)?,
    })
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use more_asserts::{assert_ge, assert_le};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::analysis::AnalysisError;

    #[test]
    fn base_position_has_no_rings() {
        let p = ring_pattern(632.8, 0.0, 1.0);
        assert_eq!(p.ring_count, 0);
        assert_eq!(p.intensity.len(), RING_GRID * RING_GRID);
        assert!(p.intensity.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn each_half_wavelength_adds_a_ring() {
        let lambda = 632.8e-9;
        let delta = BASE_GAP_M + 10.0 * lambda / 2.0 + 1e-12;
        assert_eq!(ring_count(delta, lambda), 10);
    }

    #[test]
    fn medium_lengthens_the_path() {
        assert_approx_eq!(path_difference(1.0, 1.5), (BASE_GAP_M + MIRROR_TRAVEL_M) * 1.5);
        assert_approx_eq!(mirror_position_mm(0.0), 1.25);
    }

    #[test]
    fn demo_profile_is_centre_column() {
        let p = demo_pattern(632.8, 15.0, 10.0, 1.0);
        assert_eq!(p.profile.len(), DEMO_GRID);
        let col = DEMO_GRID / 2;
        for row in [0, 100, 499] {
            assert_approx_eq!(p.profile[row], p.intensity[row * DEMO_GRID + col]);
        }
        assert_approx_eq!(p.axis_m[0], -15e-3);
    }

    #[test]
    fn demo_form_defaults() {
        let p = DemoInput::default().parse().unwrap();
        assert_eq!(p.wavelength_nm, 632.8);
        assert_eq!(p.screen_half_width_mm, 15.0);
        let bad = DemoInput {
            medium_index: "0".into(),
            ..Default::default()
        };
        assert!(bad.parse().is_err());
    }

    #[test]
    fn ideal_readings_recover_wavelength() {
        let mut table = WavelengthTable::default();
        table.fill_ideal(632.8);
        let r = table.result().unwrap();
        assert_eq!(r.delta_n, 250);
        assert_approx_eq!(r.wavelength_nm, 632.8, 1e-6);
        assert_approx_eq!(r.uncertainty_nm, 0.0, 1e-6);
    }

    #[test]
    fn incomplete_table_reports_missing_slot() {
        let mut table = WavelengthTable::default();
        for _ in 0..4 {
            table.record(1.25);
        }
        let err = table.result().unwrap_err();
        assert_eq!(
            err,
            PhysicsError::Incomplete("missing reading at N = 200".into())
        );
    }

    #[test]
    fn differences_pair_each_reading_with_the_fifth_after() {
        let mut table = WavelengthTable::default();
        for slot in 0..7 {
            table.record(1.0 + slot as f64 * 0.02);
        }
        let rows = table.differences();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.delta_n == 250));
        assert_approx_eq!(rows[0].delta_e_mm.unwrap(), 0.1, 1e-12);
        assert_approx_eq!(rows[1].wavelength_nm.unwrap(), 2.0 * 0.1 / 250.0 * 1e6, 1e-6);
        assert_eq!(rows[2].delta_e_mm, None);
        assert_eq!(rows[4].wavelength_nm, None);
    }

    #[test]
    fn recording_wraps_after_ten() {
        let mut table = WavelengthTable::default();
        for i in 0..11 {
            table.record(i as f64);
        }
        assert_eq!(table.positions()[0], Some(10.0));
        assert_eq!(table.next_slot(), 1);
    }

    #[test]
    fn fringe_count_for_mirror_move() {
        assert_approx_eq!(fringes_for_displacement(632.8e-9 * 50.0, 632.8e-9), 100.0);
    }

    #[test]
    fn speed_log_tracks_mean() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut log = SpeedOfLightLog::default();
        assert_eq!(
            log.mean_speed(),
            Err(PhysicsError::Analysis(AnalysisError::TooFewPoints {
                needed: 1,
                got: 0
            }))
        );
        for _ in 0..50 {
            log.measure(&mut rng, 1.0, 1e-4, 632.8).unwrap();
        }
        let mean = log.mean_speed().unwrap();
        assert_ge!(mean, SPEED_OF_LIGHT_EXACT - 1e5);
        assert_le!(mean, SPEED_OF_LIGHT_EXACT + 1e5);
        assert_approx_eq!(log.readings[0].fringes, 2.0 * 1e-4 / 632.8e-9, 1e-6);
    }

    #[test]
    fn index_readings_scatter_tightly() {
        let mut rng = StdRng::seed_from_u64(42);
        let readings = simulate_index_readings(&mut rng, 1.5).unwrap();
        assert_eq!(readings.len(), 20);
        assert_eq!(readings[19].fringes, 200);
        assert_approx_eq!(readings[19].displacement_mm, 2.0);
        let s = summarize_index(&readings).unwrap();
        assert_le!(s.min, s.mean);
        assert_ge!(s.max, s.mean);
        assert_approx_eq!(s.mean, 1.5, 0.01);
    }

    #[test]
    fn gaussian_has_requested_moments() {
        let mut rng = StdRng::seed_from_u64(1);
        let xs: Vec<f64> = (0..20_000)
            .map(|_| gaussian(&mut rng, 3.0, 2.0).unwrap())
            .collect();
        assert_approx_eq!(stats::mean(&xs).unwrap(), 3.0, 0.1);
        assert_approx_eq!(stats::std_dev(&xs).unwrap(), 2.0, 0.1);
    }

    #[test]
    fn negative_spread_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            gaussian(&mut rng, 0.0, -1.0),
            Err(PhysicsError::Noise(_))
        ));
    }
}
