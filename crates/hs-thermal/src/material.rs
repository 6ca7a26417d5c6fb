//! Wall materials.

use crate::error::ThermalResult;
use hs_core::numeric::ensure_positive;
use hs_core::units::Length;
use serde::{Deserialize, Serialize};

/// Solid material a container wall is made of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Thermal conductivity in W/(m·K)
    pub thermal_conductivity: f64,
    /// Specific heat in J/(kg·K)
    pub specific_heat: f64,
    /// Density in kg/m³
    pub density: f64,
}

impl Material {
    /// Create a new material; all properties must be positive and finite.
    pub fn new(
        name: impl Into<String>,
        thermal_conductivity: f64,
        specific_heat: f64,
        density: f64,
    ) -> ThermalResult<Self> {
        ensure_positive(thermal_conductivity, "material thermal conductivity")?;
        ensure_positive(specific_heat, "material specific heat")?;
        ensure_positive(density, "material density")?;
        Ok(Self {
            name: name.into(),
            thermal_conductivity,
            specific_heat,
            density,
        })
    }

    pub fn stainless_steel() -> Self {
        Self {
            name: "Stainless steel".to_string(),
            thermal_conductivity: 15.0,
            specific_heat: 502.0,
            density: 7900.0,
        }
    }

    pub fn aluminum() -> Self {
        Self {
            name: "Aluminum".to_string(),
            thermal_conductivity: 237.0,
            specific_heat: 897.0,
            density: 2700.0,
        }
    }

    pub fn copper() -> Self {
        Self {
            name: "Copper".to_string(),
            thermal_conductivity: 401.0,
            specific_heat: 385.0,
            density: 8960.0,
        }
    }

    pub fn glass() -> Self {
        Self {
            name: "Glass".to_string(),
            thermal_conductivity: 1.05,
            specific_heat: 840.0,
            density: 2500.0,
        }
    }

    /// Conductive resistance of a wall of this material (m²·K/W).
    pub fn thermal_resistance(&self, thickness: Length) -> f64 {
        thickness.value / self.thermal_conductivity
    }

    /// Thermal diffusivity in m²/s.
    pub fn thermal_diffusivity(&self) -> f64 {
        self.thermal_conductivity / (self.density * self.specific_heat)
    }
}
