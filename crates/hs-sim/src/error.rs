//! Error types for simulation configuration.

use thiserror::Error;

/// Errors raised while configuring a simulation.
///
/// Stepping itself never fails: degenerate physical conditions are
/// clamped, and non-target terminations are reported as outcomes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<hs_thermal::ThermalError> for SimError {
    fn from(e: hs_thermal::ThermalError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<hs_core::CoreError> for SimError {
    fn from(e: hs_core::CoreError) -> Self {
        match e {
            hs_core::CoreError::NonFinite { what, .. } => SimError::NonPhysical { what },
            other => SimError::InvalidArg { what: other.what() },
        }
    }
}
