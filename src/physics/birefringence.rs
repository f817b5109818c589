use serde::Serialize;

use super::constants::Crystal;
use super::{PhysicsError, Result};

/// Refraction of the ordinary and extraordinary rays entering a uniaxial
/// crystal. Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refraction {
    pub crystal: Crystal,
    pub incidence_deg: f64,
    pub axis_deg: f64,
    pub ordinary_deg: f64,
    pub extraordinary_deg: f64,
    /// n_e scaled by the optic-axis orientation.
    pub effective_ne: f64,
}

/// A straight segment of the ray diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySegment {
    pub from: [f64; 2],
    pub to: [f64; 2],
}

#[derive(Debug, Serialize)]
pub struct RefractionRecord {
    pub crystal: &'static str,
    pub incidence_deg: f64,
    pub axis_deg: f64,
    pub ordinary_deg: f64,
    pub extraordinary_deg: f64,
    pub effective_ne: f64,
}

/// Effective extraordinary index, `n_e / √(1 + tan²θ_axis)`.
pub fn effective_extraordinary_index(ne: f64, axis_rad: f64) -> f64 {
    ne / (1.0 + axis_rad.tan().powi(2)).sqrt()
}

/// Snell's law from air into a medium of index `n`.
fn snell(ray: &'static str, incidence_rad: f64, n: f64) -> Result<f64> {
    let ratio = incidence_rad.sin() / n;
    if !(-1.0..=1.0).contains(&ratio) || !ratio.is_finite() {
        return Err(PhysicsError::NoRefraction { ray, ratio });
    }
    Ok(ratio.asin())
}

pub fn refract(crystal: Crystal, incidence_deg: f64, axis_deg: f64) -> Result<Refraction> {
    let (no, ne) = crystal.indices();
    let i = incidence_deg.to_radians();
    let effective_ne = effective_extraordinary_index(ne, axis_deg.to_radians());

    let o = snell("ordinary", i, no)?;
    let e = snell("extraordinary", i, effective_ne)?;

    Ok(Refraction {
        crystal,
        incidence_deg,
        axis_deg,
        ordinary_deg: o.to_degrees(),
        extraordinary_deg: e.to_degrees(),
        effective_ne,
    })
}

impl Refraction {
    /// Angular separation of the two rays.
    pub fn walk_off_deg(&self) -> f64 {
        (self.extraordinary_deg - self.ordinary_deg).abs()
    }

    pub fn record(&self) -> RefractionRecord {
        RefractionRecord {
            crystal: self.crystal.name(),
            incidence_deg: self.incidence_deg,
            axis_deg: self.axis_deg,
            ordinary_deg: self.ordinary_deg,
            extraordinary_deg: self.extraordinary_deg,
            effective_ne: self.effective_ne,
        }
    }

    /// Incident ray from the source to the entry point at the origin.
    pub fn incident_ray(&self) -> RaySegment {
        let i = self.incidence_deg.to_radians();
        RaySegment {
            from: [-2.0 * i.cos(), 2.0 * i.sin()],
            to: [0.0, 0.0],
        }
    }

    /// (inside the crystal, after leaving it) for a refraction angle.
    fn ray_pair(angle_deg: f64) -> (RaySegment, RaySegment) {
        let a = angle_deg.to_radians();
        let (c, s) = (a.cos(), a.sin());
        (
            RaySegment {
                from: [0.0, 0.0],
                to: [c, s],
            },
            RaySegment {
                from: [c, s],
                to: [2.0 * c, 2.0 * s],
            },
        )
    }

    pub fn ordinary_rays(&self) -> (RaySegment, RaySegment) {
        Self::ray_pair(self.ordinary_deg)
    }

    pub fn extraordinary_rays(&self) -> (RaySegment, RaySegment) {
        Self::ray_pair(self.extraordinary_deg)
    }

    /// Crystal outline: the rectangle from (0, -1), 1 wide and 2 tall.
    pub fn crystal_outline() -> [[f64; 2]; 5] {
        [[0.0, -1.0], [1.0, -1.0], [1.0, 1.0], [0.0, 1.0], [0.0, -1.0]]
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn normal_incidence_is_undeviated() {
        let r = refract(Crystal::Calcite, 0.0, 30.0).unwrap();
        assert_approx_eq!(r.ordinary_deg, 0.0);
        assert_approx_eq!(r.extraordinary_deg, 0.0);
    }

    #[test]
    fn quartz_at_thirty_degrees() {
        let r = refract(Crystal::Quartz, 30.0, 0.0).unwrap();
        // asin(0.5 / 1.544)
        assert_approx_eq!(r.ordinary_deg, 18.895, 1e-3);
        assert_approx_eq!(r.effective_ne, 1.553);
        assert!(r.extraordinary_deg < r.ordinary_deg);
    }

    #[test]
    fn calcite_splits_the_rays() {
        let r = refract(Crystal::Calcite, 45.0, 0.0).unwrap();
        // n_o > n_e for calcite, so the e ray bends less
        assert!(r.extraordinary_deg > r.ordinary_deg);
        assert!(r.walk_off_deg() > 1.0);
    }

    #[test]
    fn axis_near_ninety_has_no_e_ray() {
        let err = refract(Crystal::Quartz, 60.0, 89.0).unwrap_err();
        assert!(matches!(
            err,
            PhysicsError::NoRefraction {
                ray: "extraordinary",
                ..
            }
        ));
    }

    #[test]
    fn effective_index_is_cosine_scaled() {
        let axis = 60f64.to_radians();
        assert_approx_eq!(effective_extraordinary_index(1.5, axis), 0.75, 1e-12);
    }

    #[test]
    fn ray_geometry() {
        let r = refract(Crystal::Quartz, 90.0, 0.0).unwrap();
        let inc = r.incident_ray();
        assert_approx_eq!(inc.from[0], 0.0);
        assert_approx_eq!(inc.from[1], 2.0);
        let (inside, outside) = r.ordinary_rays();
        assert_eq!(inside.to, outside.from);
        assert_approx_eq!(outside.to[0], 2.0 * inside.to[0]);
    }
}
