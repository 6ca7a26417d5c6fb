//! Container shapes.

use crate::error::{ThermalError, ThermalResult};
use hs_core::numeric::ensure_positive;
use hs_core::units::{Area, Length, Volume, m2, m3};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Geometric form of a container.
///
/// Only the cylinder is implemented; other kind names are rejected by
/// [`Shape::from_kind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Cylinder { radius: Length, height: Length },
}

impl Shape {
    /// Create a cylinder, validating both dimensions.
    pub fn cylinder(radius: Length, height: Length) -> ThermalResult<Self> {
        ensure_positive(radius.value, "cylinder radius")?;
        ensure_positive(height.value, "cylinder height")?;
        Ok(Shape::Cylinder { radius, height })
    }

    /// Build a shape from a kind name and named dimensions in meters.
    pub fn from_kind(kind: &str, dimensions: &HashMap<String, f64>) -> ThermalResult<Self> {
        match kind.to_ascii_lowercase().as_str() {
            "cylindrical" | "cylinder" => {
                let radius = dimensions
                    .get("radius")
                    .copied()
                    .ok_or(ThermalError::InvalidArg {
                        what: "cylinder requires a radius dimension",
                    })?;
                let height = dimensions
                    .get("height")
                    .copied()
                    .ok_or(ThermalError::InvalidArg {
                        what: "cylinder requires a height dimension",
                    })?;
                Shape::cylinder(hs_core::m(radius), hs_core::m(height))
            }
            other => Err(ThermalError::NotSupported {
                what: format!("shape kind '{other}'"),
            }),
        }
    }

    /// Kind name as used in scenario files.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Cylinder { .. } => "cylindrical",
        }
    }

    /// Total closed surface area (both ends plus wall).
    pub fn surface_area(&self) -> Area {
        match self {
            Shape::Cylinder { radius, height } => {
                let (r, h) = (radius.value, height.value);
                m2(2.0 * PI * r * r + 2.0 * PI * r * h)
            }
        }
    }

    pub fn volume(&self) -> Volume {
        match self {
            Shape::Cylinder { radius, height } => {
                let (r, h) = (radius.value, height.value);
                m3(PI * r * r * h)
            }
        }
    }

    pub fn lateral_surface_area(&self) -> Area {
        match self {
            Shape::Cylinder { radius, height } => m2(2.0 * PI * radius.value * height.value),
        }
    }

    pub fn base_area(&self) -> Area {
        match self {
            Shape::Cylinder { radius, .. } => m2(PI * radius.value * radius.value),
        }
    }
}
