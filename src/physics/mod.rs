/// Experiment formulas. One module per lab, each a set of pure functions
/// from a parameter set to arrays ready for plotting.
pub mod birefringence;
pub mod constants;
pub mod double_slit;
pub mod michelson;
pub mod photoelectric;
pub mod planck;
pub mod spectrum;

use thiserror::Error;

use crate::analysis::AnalysisError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field}: '{text}' is not a number")]
    NotANumber { field: &'static str, text: String },
    #[error("{field}: '{text}' is not a whole number")]
    NotACount { field: &'static str, text: String },
    #[error("{field} must be {requirement}")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("no refracted {ray} ray: sin θ would be {ratio:.3}")]
    NoRefraction { ray: &'static str, ratio: f64 },
    #[error("{0}")]
    Incomplete(String),
    #[error("noise model: {0}")]
    Noise(#[from] rand_distr::NormalError),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;

/// Parse a form field. Empty input falls back to `default`.
pub fn parse_field(field: &'static str, text: &str, default: f64) -> std::result::Result<f64, InputError> {
    let t = text.trim();
    if t.is_empty() {
        return Ok(default);
    }
    match t.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(InputError::NotANumber {
            field,
            text: t.to_string(),
        }),
    }
}

/// Parse an integer form field. Empty input falls back to `default`.
pub fn parse_count(field: &'static str, text: &str, default: i64) -> std::result::Result<i64, InputError> {
    let t = text.trim();
    if t.is_empty() {
        return Ok(default);
    }
    t.parse::<i64>().map_err(|_| InputError::NotACount {
        field,
        text: t.to_string(),
    })
}

/// Largest sample count a form may ask for.
pub const MAX_POINTS: i64 = 100_000;

/// Parse a sample count, which must lie in `2..=MAX_POINTS`.
pub fn parse_points(field: &'static str, text: &str, default: i64) -> std::result::Result<usize, InputError> {
    let n = parse_count(field, text, default)?;
    if !(2..=MAX_POINTS).contains(&n) {
        return Err(InputError::OutOfRange {
            field,
            requirement: "between 2 and 100000",
        });
    }
    Ok(n as usize)
}

/// Require a strictly positive value.
pub fn positive(field: &'static str, v: f64) -> std::result::Result<f64, InputError> {
    if v > 0.0 {
        Ok(v)
    } else {
        Err(InputError::OutOfRange {
            field,
            requirement: "greater than zero",
        })
    }
}

/// Require a value of zero or more.
pub fn non_negative(field: &'static str, v: f64) -> std::result::Result<f64, InputError> {
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(InputError::OutOfRange {
            field,
            requirement: "zero or more",
        })
    }
}
