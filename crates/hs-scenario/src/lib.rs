//! hs-scenario: scenario files, parameter sampling and sweeps.

pub mod runtime;
pub mod sampling;
pub mod schema;
pub mod sweep;
pub mod validate;

pub use runtime::{RunOverrides, build_container, build_fluid, build_simulation};
pub use sampling::Sampler;
pub use schema::*;
pub use sweep::{SweepRun, run_sweep, sweep_parameters};
pub use validate::{LATEST_VERSION, ValidationError, validate_scenario};

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Thermal model error: {0}")]
    Thermal(#[from] hs_thermal::ThermalError),

    #[error("Simulation error: {0}")]
    Sim(#[from] hs_sim::SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ScenarioResult<Scenario> {
    let scenario: Scenario = serde_yaml::from_str(content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn load_yaml(path: &std::path::Path) -> ScenarioResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let scenario = from_yaml_str(&content)?;
    tracing::debug!(path = %path.display(), name = %scenario.name, "loaded scenario");
    Ok(scenario)
}

/// Pretty JSON for reports and sweep results.
pub fn to_json_pretty<T: serde::Serialize>(value: &T) -> ScenarioResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
