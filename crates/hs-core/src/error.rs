use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Value for {what} must be positive, got {value}")]
    NotPositive { what: &'static str, value: f64 },

    #[error("Value for {what} must be non-negative, got {value}")]
    Negative { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl CoreError {
    /// Name of the offending quantity.
    pub fn what(&self) -> &'static str {
        match self {
            CoreError::NonFinite { what, .. }
            | CoreError::NotPositive { what, .. }
            | CoreError::Negative { what, .. }
            | CoreError::InvalidArg { what } => what,
        }
    }
}
