//! Error types for thermal property providers.

use hs_core::CoreError;
use thiserror::Error;

/// Errors raised while building containers, materials, fluids or sources.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermalError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Not supported: {what}")]
    NotSupported { what: String },
}

pub type ThermalResult<T> = Result<T, ThermalError>;

impl From<CoreError> for ThermalError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. } => ThermalError::NonPhysical { what },
            CoreError::NotPositive { what, .. }
            | CoreError::Negative { what, .. }
            | CoreError::InvalidArg { what } => ThermalError::InvalidArg { what },
        }
    }
}
