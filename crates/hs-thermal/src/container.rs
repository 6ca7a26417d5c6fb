//! Container: shape + wall material + wall thickness.

use crate::common::{MIN_RESISTANCE_K_PER_W, clamp};
use crate::error::ThermalResult;
use crate::material::Material;
use crate::shape::Shape;
use hs_core::numeric::ensure_positive;
use hs_core::units::{Area, Length, Volume};

/// Convective coefficient fluid -> wall (W/(m²·K)).
pub const H_FLUID_W_M2K: f64 = 800.0;
/// Convective coefficient wall -> air (W/(m²·K)).
pub const H_AIR_W_M2K: f64 = 15.0;

const MIN_THICKNESS_M: f64 = 1e-4;
const MAX_THICKNESS_M: f64 = 0.1;
const MIN_CONDUCTIVITY_W_MK: f64 = 1.0;
const MAX_CONDUCTIVITY_W_MK: f64 = 500.0;
const MIN_SURFACE_AREA_M2: f64 = 1e-3;
const MIN_COEFFICIENT_W_K: f64 = 0.001;
const MAX_COEFFICIENT_W_K: f64 = 100.0;

/// Fraction of the container volume filled by default.
pub const STANDARD_FILL_FRACTION: f64 = 2.0 / 3.0;

/// Immutable vessel holding the fluid. It never owns a temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    shape: Shape,
    material: Material,
    wall_thickness: Length,
}

/// Terms of the series resistance network behind the heat-loss coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatLossNetwork {
    /// Fluid -> wall convection (K/W)
    pub r_convection_fluid: f64,
    /// Conduction through the wall (K/W)
    pub r_conduction_wall: f64,
    /// Wall -> air convection (K/W)
    pub r_convection_air: f64,
    /// Boost of external convection for thin walls, in [1, 3]
    pub thickness_effect: f64,
    /// Thickness-banded amplification applied to U
    pub amplification: f64,
    /// Resulting coefficient in W/K, clamped to [0.001, 100]
    pub coefficient_w_per_k: f64,
}

impl Container {
    pub fn new(shape: Shape, material: Material, wall_thickness: Length) -> ThermalResult<Self> {
        ensure_positive(wall_thickness.value, "wall thickness")?;
        Ok(Self {
            shape,
            material,
            wall_thickness,
        })
    }

    /// Copy of this container with a different wall thickness.
    pub fn with_thickness(&self, wall_thickness: Length) -> ThermalResult<Self> {
        Self::new(self.shape.clone(), self.material.clone(), wall_thickness)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn wall_thickness(&self) -> Length {
        self.wall_thickness
    }

    pub fn volume(&self) -> Volume {
        self.shape.volume()
    }

    pub fn surface_area(&self) -> Area {
        self.shape.surface_area()
    }

    /// Lateral wall plus base; the container has no lid.
    pub fn open_surface_area(&self) -> Area {
        self.shape.lateral_surface_area() + self.shape.base_area()
    }

    /// Default fill: two thirds of the container volume (m³).
    pub fn standard_fluid_volume(&self) -> f64 {
        STANDARD_FILL_FRACTION * self.volume().value
    }

    /// Fluid volume over wetted area (m) for the given fill volume.
    pub fn volume_to_surface_ratio(&self, fluid_volume_m3: f64) -> f64 {
        match &self.shape {
            Shape::Cylinder { radius, .. } => {
                let r = radius.value;
                let base = std::f64::consts::PI * r * r;
                let fluid_height = fluid_volume_m3 / base;
                let wetted = base + 2.0 * std::f64::consts::PI * r * fluid_height;
                fluid_volume_m3 / wetted
            }
        }
    }

    /// Global heat-transfer coefficient U (W/K) towards ambient air.
    pub fn heat_loss_coefficient(&self, correction_factor: f64) -> f64 {
        self.heat_loss_network(correction_factor).coefficient_w_per_k
    }

    /// Full breakdown of the fluid -> wall -> air resistance network.
    ///
    /// Physical inputs are clamped so U stays finite for any container:
    /// thickness to [0.1 mm, 10 cm], conductivity to [1, 500] W/(m·K),
    /// area to at least 0.001 m², total resistance to at least 1e-6 K/W.
    pub fn heat_loss_network(&self, correction_factor: f64) -> HeatLossNetwork {
        let area = self.surface_area().value.max(MIN_SURFACE_AREA_M2);
        let thickness = clamp(self.wall_thickness.value, MIN_THICKNESS_M, MAX_THICKNESS_M);
        let k_wall = clamp(
            self.material.thermal_conductivity,
            MIN_CONDUCTIVITY_W_MK,
            MAX_CONDUCTIVITY_W_MK,
        );

        let r_convection_fluid = 1.0 / (H_FLUID_W_M2K * area);
        let r_conduction_wall = thickness / (k_wall * area);

        let thickness_effect = clamp(1.0 + (0.002 / thickness) * 0.5, 1.0, 3.0);
        let r_convection_air = 1.0 / (H_AIR_W_M2K * area * thickness_effect);

        let r_total =
            (r_convection_fluid + r_conduction_wall + r_convection_air).max(MIN_RESISTANCE_K_PER_W);
        let u = 1.0 / r_total;

        let amplification = amplification_for(thickness);
        let coefficient_w_per_k = clamp(
            u * correction_factor * amplification,
            MIN_COEFFICIENT_W_K,
            MAX_COEFFICIENT_W_K,
        );

        HeatLossNetwork {
            r_convection_fluid,
            r_conduction_wall,
            r_convection_air,
            thickness_effect,
            amplification,
            coefficient_w_per_k,
        }
    }
}

/// Thinner walls lose heat disproportionately faster.
fn amplification_for(thickness_m: f64) -> f64 {
    let thickness_mm = thickness_m * 1000.0;
    if thickness_mm < 1.0 {
        4.0
    } else if thickness_mm < 2.0 {
        3.0
    } else if thickness_mm < 5.0 {
        2.0
    } else {
        1.5
    }
}
