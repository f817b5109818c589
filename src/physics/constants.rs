//! Physical constants and material tables, at the precision used in the
//! lab handouts.

/// Planck constant (J·s).
pub const PLANCK: f64 = 6.626e-34;
/// Elementary charge (C).
pub const ELEMENTARY_CHARGE: f64 = 1.602e-19;
/// Speed of light used in formulas (m/s).
pub const SPEED_OF_LIGHT: f64 = 3.0e8;
/// Exact SI speed of light, the reference value for the measurement lab (m/s).
pub const SPEED_OF_LIGHT_EXACT: f64 = 299_792_458.0;
/// Electron rest mass (kg).
pub const ELECTRON_MASS: f64 = 9.109e-31;

/// Laser lines offered by the interferometer labs (nm).
pub const LASER_LINES_NM: [f64; 3] = [632.8, 532.0, 488.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metal {
    #[default]
    Copper,
    Aluminium,
    Gold,
    Silver,
    Zinc,
}

impl Metal {
    pub const ALL: [Metal; 5] = [
        Metal::Copper,
        Metal::Aluminium,
        Metal::Gold,
        Metal::Silver,
        Metal::Zinc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metal::Copper => "Copper",
            Metal::Aluminium => "Aluminium",
            Metal::Gold => "Gold",
            Metal::Silver => "Silver",
            Metal::Zinc => "Zinc",
        }
    }

    /// Work function in eV.
    pub fn work_function_ev(self) -> f64 {
        match self {
            Metal::Copper => 4.7,
            Metal::Aluminium => 4.2,
            Metal::Gold => 5.1,
            Metal::Silver => 4.26,
            Metal::Zinc => 4.33,
        }
    }

    /// Work function in J.
    pub fn work_function_j(self) -> f64 {
        self.work_function_ev() * ELEMENTARY_CHARGE
    }
}

/// Uniaxial crystals with ordinary and extraordinary indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crystal {
    #[default]
    Quartz,
    Calcite,
}

impl Crystal {
    pub const ALL: [Crystal; 2] = [Crystal::Quartz, Crystal::Calcite];

    pub fn name(self) -> &'static str {
        match self {
            Crystal::Quartz => "Quartz",
            Crystal::Calcite => "Calcite",
        }
    }

    /// (n_o, n_e)
    pub fn indices(self) -> (f64, f64) {
        match self {
            Crystal::Quartz => (1.544, 1.553),
            Crystal::Calcite => (1.658, 1.486),
        }
    }
}
