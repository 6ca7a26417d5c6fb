//! Scenario validation.

use crate::schema::{ContainerDef, FluidDef, MaterialDef, Scenario, SweepDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be non-negative"))
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

fn range(field: &str, min: f64, max: f64) -> Result<(), ValidationError> {
    finite(field, min)?;
    finite(field, max)?;
    if min > max {
        return Err(invalid(field, format!("{min}..{max}"), "min exceeds max"));
    }
    Ok(())
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    if scenario.name.trim().is_empty() {
        return Err(invalid("name", "", "must not be empty"));
    }

    validate_container(&scenario.container)?;
    validate_fluid(&scenario.fluid)?;

    non_negative("heater.power_w", scenario.heater.power_w)?;
    positive("heater.nominal_voltage_v", scenario.heater.nominal_voltage_v)?;

    finite("initial.temperature_c", scenario.initial.temperature_c)?;
    if let Some(fill) = scenario.initial.fill_volume_m3 {
        positive("initial.fill_volume_m3", fill)?;
    }

    let sim = &scenario.simulation;
    finite("simulation.target_temp_c", sim.target_temp_c)?;
    finite("simulation.ambient_temp_c", sim.ambient_temp_c)?;
    positive("simulation.time_step_s", sim.time_step_s)?;
    positive("simulation.correction_factor", sim.correction_factor)?;
    positive("simulation.max_time_s", sim.max_time_s)?;
    positive(
        "simulation.equilibrium_check_interval_s",
        sim.equilibrium_check_interval_s,
    )?;
    positive(
        "simulation.equilibrium_tolerance_c",
        sim.equilibrium_tolerance_c,
    )?;
    if sim.equilibrium_window < 2 {
        return Err(invalid(
            "simulation.equilibrium_window",
            sim.equilibrium_window,
            "needs at least two checks",
        ));
    }

    if let Some(ice) = &scenario.ice {
        non_negative("ice.add_time_s", ice.add_time_s)?;
        positive("ice.mass_kg", ice.mass_kg)?;
        finite("ice.initial_temp_c", ice.initial_temp_c)?;
        if ice.initial_temp_c > 0.0 {
            return Err(invalid(
                "ice.initial_temp_c",
                ice.initial_temp_c,
                "ice cannot be above 0 °C",
            ));
        }
    }

    if let Some(events) = &scenario.random_events {
        finite("random_events.total_drop_mean_c", events.total_drop_mean_c)?;
        positive("random_events.duration_mean_s", events.duration_mean_s)?;
        non_negative("random_events.profile_spread", events.profile_spread)?;
        let (lo, hi) = events.duration_bounds();
        range("random_events.duration_min_s..duration_max_s", lo, hi)?;
    }

    if let Some(sweep) = &scenario.sweep {
        validate_sweep(sweep)?;
    }

    Ok(())
}

fn validate_container(container: &ContainerDef) -> Result<(), ValidationError> {
    match container.shape.kind.to_ascii_lowercase().as_str() {
        "cylinder" | "cylindrical" => {
            for dim in ["radius", "height"] {
                let field = format!("container.shape.{dim}");
                let value = container
                    .shape
                    .dimensions
                    .get(dim)
                    .copied()
                    .ok_or_else(|| invalid(&field, "missing", "required for cylinders"))?;
                positive(&field, value)?;
            }
        }
        other => {
            return Err(ValidationError::Unsupported {
                feature: format!("shape kind '{other}'"),
                reason: "only cylinders are implemented".to_string(),
            });
        }
    }

    match &container.material {
        MaterialDef::Preset(name) => {
            if crate::runtime::material_preset(name).is_none() {
                return Err(invalid(
                    "container.material",
                    name,
                    "unknown preset (stainless_steel, aluminum, copper, glass)",
                ));
            }
        }
        MaterialDef::Custom(m) => {
            positive(
                "container.material.thermal_conductivity",
                m.thermal_conductivity,
            )?;
            positive("container.material.specific_heat", m.specific_heat)?;
            positive("container.material.density", m.density)?;
        }
    }

    positive("container.wall_thickness_m", container.wall_thickness_m)
}

fn validate_fluid(fluid: &FluidDef) -> Result<(), ValidationError> {
    match fluid {
        FluidDef::Preset(name) => {
            if crate::runtime::fluid_preset(name).is_none() {
                return Err(invalid("fluid", name, "unknown preset (water)"));
            }
        }
        FluidDef::Custom(f) => {
            positive("fluid.specific_heat", f.specific_heat)?;
            positive("fluid.density", f.density)?;
            non_negative("fluid.thermal_conductivity", f.thermal_conductivity)?;
            non_negative("fluid.viscosity", f.viscosity)?;
        }
    }
    Ok(())
}

fn validate_sweep(sweep: &SweepDef) -> Result<(), ValidationError> {
    if sweep.count() == 0 {
        return Err(invalid("sweep.count", 0, "must be at least 1"));
    }
    match sweep {
        SweepDef::WallThicknessUniform { min_m, max_m, .. } => {
            positive("sweep.min_m", *min_m)?;
            range("sweep.min_m..max_m", *min_m, *max_m)
        }
        SweepDef::InitialTemperatureNormal { mean_c, std_c, .. } => {
            finite("sweep.mean_c", *mean_c)?;
            non_negative("sweep.std_c", *std_c)
        }
        SweepDef::AmbientTemperatureUniform { min_c, max_c, .. } => {
            range("sweep.min_c..max_c", *min_c, *max_c)
        }
        SweepDef::SupplyVoltageNormal { mean_v, std_v, .. } => {
            finite("sweep.mean_v", *mean_v)?;
            non_negative("sweep.std_v", *std_v)
        }
        SweepDef::Combined(c) => {
            positive("sweep.thickness_min_m", c.thickness_min_m)?;
            range(
                "sweep.thickness_min_m..thickness_max_m",
                c.thickness_min_m,
                c.thickness_max_m,
            )?;
            finite("sweep.initial_mean_c", c.initial_mean_c)?;
            non_negative("sweep.initial_std_c", c.initial_std_c)?;
            range(
                "sweep.ambient_min_c..ambient_max_c",
                c.ambient_min_c,
                c.ambient_max_c,
            )?;
            finite("sweep.voltage_mean_v", c.voltage_mean_v)?;
            non_negative("sweep.voltage_std_v", c.voltage_std_v)
        }
    }
}
