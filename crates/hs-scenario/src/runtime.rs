//! Turning a validated scenario into a ready-to-run simulation.

use crate::ScenarioResult;
use crate::schema::{ContainerDef, FluidDef, MaterialDef, Scenario};
use hs_core::units::{m, watts};
use hs_sim::Simulation;
use hs_thermal::{Container, Fluid, Material, PowerSource, Shape};
use serde::Serialize;

/// Per-run parameter overrides applied on top of the scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall_thickness_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_temp_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambient_temp_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply_voltage_v: Option<f64>,
}

pub fn material_preset(name: &str) -> Option<Material> {
    match name.to_ascii_lowercase().as_str() {
        "stainless_steel" | "steel" => Some(Material::stainless_steel()),
        "aluminum" | "aluminium" => Some(Material::aluminum()),
        "copper" => Some(Material::copper()),
        "glass" => Some(Material::glass()),
        _ => None,
    }
}

pub fn fluid_preset(name: &str) -> Option<Fluid> {
    match name.to_ascii_lowercase().as_str() {
        "water" => Some(Fluid::water()),
        _ => None,
    }
}

fn unknown_preset(kind: &'static str) -> crate::ScenarioError {
    crate::ScenarioError::InvalidArg { what: kind }
}

pub fn build_container(def: &ContainerDef) -> ScenarioResult<Container> {
    let shape = Shape::from_kind(&def.shape.kind, &def.shape.dimensions)?;
    let material = match &def.material {
        MaterialDef::Preset(name) => {
            material_preset(name).ok_or_else(|| unknown_preset("unknown material preset"))?
        }
        MaterialDef::Custom(custom) => Material::new(
            custom.name.clone(),
            custom.thermal_conductivity,
            custom.specific_heat,
            custom.density,
        )?,
    };
    Ok(Container::new(shape, material, m(def.wall_thickness_m))?)
}

pub fn build_fluid(def: &FluidDef) -> ScenarioResult<Fluid> {
    match def {
        FluidDef::Preset(name) => {
            fluid_preset(name).ok_or_else(|| unknown_preset("unknown fluid preset"))
        }
        FluidDef::Custom(custom) => Ok(Fluid::new(
            custom.name.clone(),
            custom.specific_heat,
            custom.density,
            custom.thermal_conductivity,
            custom.viscosity,
        )?),
    }
}

/// Build an independent simulation for one run of `scenario`.
///
/// Every call constructs its own container, fluid and state, so runs never
/// share mutable data. The fill volume defaults to the container's standard
/// volume, computed after any wall-thickness override.
pub fn build_simulation(scenario: &Scenario, overrides: &RunOverrides) -> ScenarioResult<Simulation> {
    let mut container = build_container(&scenario.container)?;
    if let Some(t) = overrides.wall_thickness_m {
        container = container.with_thickness(m(t))?;
    }
    let fluid = build_fluid(&scenario.fluid)?;

    let mut power = PowerSource::new(watts(scenario.heater.power_w))?;
    if let Some(v) = overrides.supply_voltage_v {
        power = power.scaled_to_voltage(scenario.heater.nominal_voltage_v, v)?;
    }

    let initial_temp_c = overrides
        .initial_temp_c
        .unwrap_or(scenario.initial.temperature_c);
    let volume_m3 = scenario
        .initial
        .fill_volume_m3
        .unwrap_or_else(|| container.standard_fluid_volume());

    let mut config = scenario.simulation.clone();
    if let Some(ambient) = overrides.ambient_temp_c {
        config.ambient_temp_c = ambient;
    }

    let mut sim = Simulation::new(container, fluid, power, initial_temp_c, volume_m3)?;
    sim.configure(config)?
        .configure_ice_addition(scenario.ice.clone())?
        .configure_random_events(scenario.random_events.clone())?;
    Ok(sim)
}
