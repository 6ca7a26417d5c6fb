//! Scenario file schema.

use hs_sim::{IceConfig, RandomEventConfig, SimConfig};
use hs_thermal::{Fluid, Material};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub container: ContainerDef,
    #[serde(default)]
    pub fluid: FluidDef,
    pub heater: HeaterDef,
    pub initial: InitialDef,
    #[serde(default)]
    pub simulation: SimConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ice: Option<IceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_events: Option<RandomEventConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepDef>,
    /// Base seed; overridden on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerDef {
    pub shape: ShapeDef,
    pub material: MaterialDef,
    pub wall_thickness_m: f64,
}

/// Shape kind plus its dimensions in meters, e.g. `radius` and `height`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShapeDef {
    pub kind: String,
    #[serde(flatten)]
    pub dimensions: HashMap<String, f64>,
}

/// A preset name (`stainless_steel`, `aluminum`, `copper`, `glass`) or
/// explicit properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MaterialDef {
    Preset(String),
    Custom(Material),
}

/// `water` or explicit properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FluidDef {
    Preset(String),
    Custom(Fluid),
}

impl Default for FluidDef {
    fn default() -> Self {
        FluidDef::Preset("water".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeaterDef {
    pub power_w: f64,
    /// Voltage the power rating refers to
    #[serde(default = "default_nominal_voltage")]
    pub nominal_voltage_v: f64,
}

fn default_nominal_voltage() -> f64 {
    220.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialDef {
    pub temperature_c: f64,
    /// Fluid volume; two thirds of the container when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_volume_m3: Option<f64>,
}

/// Family of runs varying one (or every) parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SweepDef {
    WallThicknessUniform {
        min_m: f64,
        max_m: f64,
        count: usize,
    },
    InitialTemperatureNormal {
        mean_c: f64,
        std_c: f64,
        count: usize,
    },
    AmbientTemperatureUniform {
        min_c: f64,
        max_c: f64,
        count: usize,
    },
    SupplyVoltageNormal {
        mean_v: f64,
        std_v: f64,
        count: usize,
    },
    Combined(CombinedSweepDef),
}

impl SweepDef {
    pub fn count(&self) -> usize {
        match self {
            SweepDef::WallThicknessUniform { count, .. }
            | SweepDef::InitialTemperatureNormal { count, .. }
            | SweepDef::AmbientTemperatureUniform { count, .. }
            | SweepDef::SupplyVoltageNormal { count, .. } => *count,
            SweepDef::Combined(c) => c.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CombinedSweepDef {
    pub count: usize,
    pub thickness_min_m: f64,
    pub thickness_max_m: f64,
    pub initial_mean_c: f64,
    pub initial_std_c: f64,
    pub ambient_min_c: f64,
    pub ambient_max_c: f64,
    pub voltage_mean_v: f64,
    pub voltage_std_v: f64,
}

impl Default for CombinedSweepDef {
    fn default() -> Self {
        Self {
            count: 10,
            thickness_min_m: 0.0008,
            thickness_max_m: 0.005,
            initial_mean_c: 10.0,
            initial_std_c: 5.0,
            ambient_min_c: -20.0,
            ambient_max_c: 50.0,
            voltage_mean_v: 220.0,
            voltage_std_v: 40.0,
        }
    }
}
