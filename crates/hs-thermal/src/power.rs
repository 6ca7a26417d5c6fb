//! Constant power heat source.

use crate::error::{ThermalError, ThermalResult};
use hs_core::numeric::{ensure_non_negative, ensure_positive};
use hs_core::units::{Energy, Power, Time, joules, watts};

/// Heater delivering a fixed power for the whole simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerSource {
    power: Power,
}

impl PowerSource {
    /// Create a source; zero power is allowed (cooling-only runs).
    pub fn new(power: Power) -> ThermalResult<Self> {
        ensure_non_negative(power.value, "heater power")?;
        Ok(Self { power })
    }

    pub fn power(&self) -> Power {
        self.power
    }

    /// Power in watts.
    pub fn watts(&self) -> f64 {
        self.power.value
    }

    /// Energy delivered over `dt`.
    pub fn energy_over(&self, dt: Time) -> Energy {
        joules(self.power.value * dt.value)
    }

    /// Same resistive heater fed at a different voltage.
    ///
    /// Power scales with the square of the supply voltage relative to the
    /// nominal voltage this source is rated at.
    pub fn scaled_to_voltage(&self, nominal_voltage: f64, voltage: f64) -> ThermalResult<Self> {
        ensure_positive(nominal_voltage, "nominal voltage")?;
        if !voltage.is_finite() {
            return Err(ThermalError::NonPhysical {
                what: "supply voltage",
            });
        }
        let factor = (voltage / nominal_voltage).powi(2);
        Self::new(watts(self.power.value * factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hs_core::s;

    #[test]
    fn energy_over_time() {
        let src = PowerSource::new(watts(1100.0)).unwrap();
        assert!((src.energy_over(s(2.0)).value - 2200.0).abs() < 1e-9);
    }

    #[test]
    fn negative_power_rejected() {
        assert!(PowerSource::new(watts(-1.0)).is_err());
        assert!(PowerSource::new(watts(0.0)).is_ok());
    }

    #[test]
    fn power_scales_with_voltage_squared() {
        let src = PowerSource::new(watts(1100.0)).unwrap();
        let half = src.scaled_to_voltage(220.0, 110.0).unwrap();
        assert!((half.watts() - 275.0).abs() < 1e-9);
        let same = src.scaled_to_voltage(220.0, 220.0).unwrap();
        assert!((same.watts() - 1100.0).abs() < 1e-9);
        assert!(src.scaled_to_voltage(0.0, 110.0).is_err());
    }
}
