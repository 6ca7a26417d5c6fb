//! Intrinsic fluid properties.
//!
//! A `Fluid` never carries temperature or volume. Those belong to the
//! state of the simulation that heats it, so two simulations can share a
//! fluid definition without sharing any mutable state.

use crate::error::ThermalResult;
use hs_core::numeric::{ensure_non_negative, ensure_positive};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fluid {
    pub name: String,
    /// Specific heat in J/(kg·K)
    pub specific_heat: f64,
    /// Density in kg/m³
    pub density: f64,
    /// Thermal conductivity in W/(m·K)
    pub thermal_conductivity: f64,
    /// Dynamic viscosity in Pa·s
    pub viscosity: f64,
}

impl Fluid {
    pub fn new(
        name: impl Into<String>,
        specific_heat: f64,
        density: f64,
        thermal_conductivity: f64,
        viscosity: f64,
    ) -> ThermalResult<Self> {
        ensure_positive(specific_heat, "fluid specific heat")?;
        ensure_positive(density, "fluid density")?;
        ensure_non_negative(thermal_conductivity, "fluid thermal conductivity")?;
        ensure_non_negative(viscosity, "fluid viscosity")?;
        Ok(Self {
            name: name.into(),
            specific_heat,
            density,
            thermal_conductivity,
            viscosity,
        })
    }

    pub fn water() -> Self {
        Self {
            name: "Water".to_string(),
            specific_heat: 4186.0,
            density: 997.0,
            thermal_conductivity: 0.6,
            viscosity: 0.001,
        }
    }

    /// Volumetric heat capacity in J/(m³·K).
    pub fn heat_capacity_per_volume(&self) -> f64 {
        self.specific_heat * self.density
    }

    /// Mass in kg of the given volume (m³).
    pub fn mass_of(&self, volume_m3: f64) -> f64 {
        self.density * volume_m3
    }
}
