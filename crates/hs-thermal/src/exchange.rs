//! Per-step heat exchange: heater input and Newton cooling.

use crate::common::temperature_change;

/// Heat delivered by the source during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatingStep {
    /// Energy added (J)
    pub energy_j: f64,
    /// Resulting fluid temperature rise (°C)
    pub delta_c: f64,
}

/// Heat lost to ambient during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingStep {
    /// Energy lost (J), never negative
    pub heat_loss_j: f64,
    /// Resulting fluid temperature drop (°C), never negative
    pub delta_c: f64,
}

/// Temperature rise `P·dt / (m·c)` for one step.
///
/// The caller is responsible for a positive fluid mass; a zero mass is
/// guarded by a minimum heat capacity rather than producing infinity.
pub fn heating_step(
    power_w: f64,
    time_step_s: f64,
    fluid_mass_kg: f64,
    specific_heat: f64,
) -> HeatingStep {
    let energy_j = power_w * time_step_s;
    HeatingStep {
        energy_j,
        delta_c: temperature_change(energy_j, fluid_mass_kg, specific_heat),
    }
}

/// Newton cooling `Q = U·(T - T_amb)·dt`, converted to a temperature drop.
///
/// Ambient heating is not modeled: a fluid colder than ambient loses nothing.
pub fn cooling_step(
    coefficient_w_per_k: f64,
    current_c: f64,
    ambient_c: f64,
    time_step_s: f64,
    fluid_mass_kg: f64,
    specific_heat: f64,
) -> CoolingStep {
    let heat_loss_j = (coefficient_w_per_k * (current_c - ambient_c) * time_step_s).max(0.0);
    CoolingStep {
        heat_loss_j,
        delta_c: temperature_change(heat_loss_j, fluid_mass_kg, specific_heat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn heating_one_kilogram_of_water() {
        let step = heating_step(1100.0, 1.0, 1.0, 4186.0);
        assert_relative_eq!(step.energy_j, 1100.0);
        assert_relative_eq!(step.delta_c, 1100.0 / 4186.0);
    }

    #[test]
    fn heating_zero_power_is_zero() {
        assert_eq!(heating_step(0.0, 1.0, 1.0, 4186.0).delta_c, 0.0);
    }

    #[test]
    fn cooling_follows_newton() {
        let step = cooling_step(5.0, 60.0, 20.0, 1.0, 1.0, 4186.0);
        assert_relative_eq!(step.heat_loss_j, 200.0);
        assert_relative_eq!(step.delta_c, 200.0 / 4186.0);
    }

    #[test]
    fn cooling_below_ambient_is_zero() {
        let step = cooling_step(5.0, 10.0, 20.0, 1.0, 1.0, 4186.0);
        assert_eq!(step.heat_loss_j, 0.0);
        assert_eq!(step.delta_c, 0.0);
    }
}
