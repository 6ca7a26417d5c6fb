//! Ice addition: warming to the melting point, then melting.
//!
//! The ice absorbs heat from the fluid in two phases. While below 0 °C it
//! takes sensible heat; at 0 °C it takes latent heat, and each melted
//! kilogram adds meltwater at 0 °C to the fluid. During both phases the
//! fluid is held at or above 0 °C.

use crate::error::{SimError, SimResult};
use crate::record::{Sample, SimEvent};
use hs_core::lerp;
use hs_core::units::constants::{
    ICE_LATENT_HEAT_J_KG, ICE_MELTING_POINT_C, ICE_SPECIFIC_HEAT_J_KGK, WATER_DENSITY_KG_M3,
};
use hs_thermal::Fluid;
use hs_thermal::common::temperature_change;
use serde::{Deserialize, Serialize};

/// Fraction of the fluid's sensible heat offered to cold ice per second.
pub const WARMING_TRANSFER_PER_S: f64 = 0.005;
/// Fraction of the fluid's sensible heat offered to melting ice per second.
pub const MELTING_TRANSFER_PER_S: f64 = 0.003;
/// Largest ice temperature rise in one step (°C).
pub const MAX_ICE_WARMING_PER_STEP_C: f64 = 0.5;
/// Largest fraction of the added ice mass that melts per second.
pub const MAX_MELT_FRACTION_PER_S: f64 = 0.02;
/// Remaining mass below which the ice counts as fully melted (kg).
pub const MELT_COMPLETE_KG: f64 = 0.001;
/// Interpolated samples emitted per ice step.
pub const INTERMEDIATE_POINTS: usize = 5;

const SIGNIFICANT_CHANGE_C: f64 = 0.01;
const MELTING_POINT_SNAP_C: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IceConfig {
    /// Simulated time at which the ice is dropped in (s)
    pub add_time_s: f64,
    /// Ice mass (kg)
    pub mass_kg: f64,
    /// Ice temperature when added (°C), at or below the melting point
    pub initial_temp_c: f64,
}

impl Default for IceConfig {
    fn default() -> Self {
        Self {
            add_time_s: 50.0,
            mass_kg: 0.1,
            initial_temp_c: -5.0,
        }
    }
}

impl IceConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !self.add_time_s.is_finite() || self.add_time_s < 0.0 {
            return Err(SimError::InvalidArg {
                what: "ice add time must be non-negative",
            });
        }
        if !self.mass_kg.is_finite() || self.mass_kg <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "ice mass must be positive",
            });
        }
        if !self.initial_temp_c.is_finite() || self.initial_temp_c > ICE_MELTING_POINT_C {
            return Err(SimError::NonPhysical {
                what: "ice temperature must be at or below 0 °C",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum IcePhase {
    /// Not added yet.
    Pending,
    /// Ice below 0 °C absorbing sensible heat.
    Warming { remaining_kg: f64, ice_temp_c: f64 },
    /// Ice at 0 °C absorbing latent heat.
    Melting { remaining_kg: f64 },
    /// All ice turned into meltwater.
    Melted,
}

/// Result of one ice step.
#[derive(Debug, Clone, PartialEq)]
pub struct IceStep {
    pub temperature_c: f64,
    /// Interpolated samples strictly inside the step, oldest first
    pub intermediate: Vec<Sample>,
    pub events: Vec<SimEvent>,
}

/// Cumulative effect of the ice on the fluid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IceSummary {
    pub phase: IcePhase,
    /// Fluid volume just before the ice was added (m³)
    pub initial_fluid_volume_m3: Option<f64>,
    pub added_water_volume_m3: f64,
    pub melted_kg: f64,
}

#[derive(Debug, Clone)]
pub struct IceProcessor {
    config: IceConfig,
    phase: IcePhase,
    initial_fluid_volume_m3: Option<f64>,
    added_water_volume_m3: f64,
    melted_kg: f64,
}

impl IceProcessor {
    pub fn new(config: IceConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            phase: IcePhase::Pending,
            initial_fluid_volume_m3: None,
            added_water_volume_m3: 0.0,
            melted_kg: 0.0,
        })
    }

    pub fn config(&self) -> &IceConfig {
        &self.config
    }

    pub fn phase(&self) -> IcePhase {
        self.phase
    }

    /// True while ice is present in the fluid.
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            IcePhase::Warming { .. } | IcePhase::Melting { .. }
        )
    }

    /// True when the ice has not been added but its time has come.
    pub fn is_due(&self, time_s: f64) -> bool {
        self.phase == IcePhase::Pending && time_s >= self.config.add_time_s
    }

    pub fn remaining_kg(&self) -> f64 {
        match self.phase {
            IcePhase::Pending => self.config.mass_kg,
            IcePhase::Warming { remaining_kg, .. } | IcePhase::Melting { remaining_kg } => {
                remaining_kg
            }
            IcePhase::Melted => 0.0,
        }
    }

    pub fn summary(&self) -> IceSummary {
        IceSummary {
            phase: self.phase,
            initial_fluid_volume_m3: self.initial_fluid_volume_m3,
            added_water_volume_m3: self.added_water_volume_m3,
            melted_kg: self.melted_kg,
        }
    }

    /// Advance the ice by one step ending at `time_s`.
    ///
    /// `temperature_c` is the fluid temperature after heating, losses and
    /// random events. Meltwater is added to `volume_m3` in place.
    pub fn step(
        &mut self,
        time_s: f64,
        time_step_s: f64,
        temperature_c: f64,
        volume_m3: &mut f64,
        fluid: &Fluid,
    ) -> IceStep {
        match self.phase {
            IcePhase::Pending if time_s >= self.config.add_time_s => {
                self.add(temperature_c, *volume_m3)
            }
            IcePhase::Warming {
                remaining_kg,
                ice_temp_c,
            } => self.warm(
                time_s,
                time_step_s,
                temperature_c,
                *volume_m3,
                fluid,
                remaining_kg,
                ice_temp_c,
            ),
            IcePhase::Melting { remaining_kg } => self.melt(
                time_s,
                time_step_s,
                temperature_c,
                volume_m3,
                fluid,
                remaining_kg,
            ),
            IcePhase::Pending | IcePhase::Melted => IceStep {
                temperature_c,
                intermediate: Vec::new(),
                events: Vec::new(),
            },
        }
    }

    fn add(&mut self, temperature_c: f64, volume_m3: f64) -> IceStep {
        let temperature_c = temperature_c.max(ICE_MELTING_POINT_C);
        self.initial_fluid_volume_m3 = Some(volume_m3);
        self.phase = if self.config.initial_temp_c < ICE_MELTING_POINT_C {
            IcePhase::Warming {
                remaining_kg: self.config.mass_kg,
                ice_temp_c: self.config.initial_temp_c,
            }
        } else {
            IcePhase::Melting {
                remaining_kg: self.config.mass_kg,
            }
        };
        let mut events = vec![SimEvent::IceAdded {
            mass_kg: self.config.mass_kg,
            ice_temp_c: self.config.initial_temp_c,
            fluid_temp_c: temperature_c,
        }];
        if matches!(self.phase, IcePhase::Melting { .. }) {
            events.push(SimEvent::IceAtMeltingPoint {
                fluid_temp_c: temperature_c,
            });
        }
        IceStep {
            temperature_c,
            intermediate: Vec::new(),
            events,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn warm(
        &mut self,
        time_s: f64,
        time_step_s: f64,
        temperature_c: f64,
        volume_m3: f64,
        fluid: &Fluid,
        remaining_kg: f64,
        ice_temp_c: f64,
    ) -> IceStep {
        let start_c = temperature_c.max(ICE_MELTING_POINT_C);
        let fluid_mass = fluid.mass_of(volume_m3);
        let ice_capacity = remaining_kg * ICE_SPECIFIC_HEAT_J_KGK;

        let needed_j = ice_capacity * (ICE_MELTING_POINT_C - ice_temp_c);
        let available_j = fluid_mass
            * fluid.specific_heat
            * (start_c - ICE_MELTING_POINT_C)
            * WARMING_TRANSFER_PER_S
            * time_step_s;
        let cap_j = ice_capacity * MAX_ICE_WARMING_PER_STEP_C;
        let transferred_j = available_j.min(cap_j).min(needed_j).max(0.0);

        let mut new_ice_temp = ice_temp_c + transferred_j / ice_capacity;
        let end_c = (start_c - temperature_change(transferred_j, fluid_mass, fluid.specific_heat))
            .max(ICE_MELTING_POINT_C);

        let mut events = Vec::new();
        if new_ice_temp >= ICE_MELTING_POINT_C - MELTING_POINT_SNAP_C {
            new_ice_temp = ICE_MELTING_POINT_C;
            self.phase = IcePhase::Melting { remaining_kg };
            events.push(SimEvent::IceAtMeltingPoint { fluid_temp_c: end_c });
        } else {
            self.phase = IcePhase::Warming {
                remaining_kg,
                ice_temp_c: new_ice_temp,
            };
        }
        tracing::trace!(time_s, transferred_j, ice_temp_c = new_ice_temp, "ice warming");

        IceStep {
            temperature_c: end_c,
            intermediate: intermediate_points(time_s, time_step_s, start_c, end_c),
            events,
        }
    }

    fn melt(
        &mut self,
        time_s: f64,
        time_step_s: f64,
        temperature_c: f64,
        volume_m3: &mut f64,
        fluid: &Fluid,
        remaining_kg: f64,
    ) -> IceStep {
        let start_c = temperature_c.max(ICE_MELTING_POINT_C);
        let fluid_mass = fluid.mass_of(*volume_m3);

        let available_j = fluid_mass
            * fluid.specific_heat
            * (start_c - ICE_MELTING_POINT_C)
            * MELTING_TRANSFER_PER_S
            * time_step_s;
        let rate_cap_kg = self.config.mass_kg * MAX_MELT_FRACTION_PER_S * time_step_s;
        let mut melted_kg = (available_j / ICE_LATENT_HEAT_J_KG)
            .min(rate_cap_kg)
            .min(remaining_kg)
            .max(0.0);
        let mut left_kg = remaining_kg - melted_kg;
        if left_kg <= MELT_COMPLETE_KG {
            melted_kg += left_kg;
            left_kg = 0.0;
        }

        let energy_j = melted_kg * ICE_LATENT_HEAT_J_KG;
        let cooled_c = (start_c - temperature_change(energy_j, fluid_mass, fluid.specific_heat))
            .max(ICE_MELTING_POINT_C);
        // meltwater enters at 0 °C
        let end_c = if melted_kg > 0.0 && fluid_mass > 0.0 {
            (cooled_c * fluid_mass / (fluid_mass + melted_kg)).max(ICE_MELTING_POINT_C)
        } else {
            cooled_c
        };

        let water_m3 = melted_kg / WATER_DENSITY_KG_M3;
        *volume_m3 += water_m3;
        self.added_water_volume_m3 += water_m3;
        self.melted_kg += melted_kg;

        let mut events = Vec::new();
        if left_kg == 0.0 {
            self.phase = IcePhase::Melted;
            let initial = self.initial_fluid_volume_m3.unwrap_or(*volume_m3);
            events.push(SimEvent::IceMelted {
                initial_volume_m3: initial,
                final_volume_m3: *volume_m3,
                added_volume_m3: self.added_water_volume_m3,
                fluid_temp_c: end_c,
            });
        } else {
            self.phase = IcePhase::Melting {
                remaining_kg: left_kg,
            };
        }
        tracing::trace!(time_s, melted_kg, remaining_kg = left_kg, "ice melting");

        IceStep {
            temperature_c: end_c,
            intermediate: intermediate_points(time_s, time_step_s, start_c, end_c),
            events,
        }
    }
}

/// Five evenly spaced samples inside the step when the change is visible.
fn intermediate_points(time_s: f64, time_step_s: f64, start_c: f64, end_c: f64) -> Vec<Sample> {
    if (end_c - start_c).abs() <= SIGNIFICANT_CHANGE_C {
        return Vec::new();
    }
    let parts = (INTERMEDIATE_POINTS + 1) as f64;
    (1..=INTERMEDIATE_POINTS)
        .map(|i| {
            let fraction = i as f64 / parts;
            Sample {
                time_s: time_s - time_step_s * (1.0 - fraction),
                temperature_c: lerp(start_c, end_c, fraction),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LITRE: f64 = 1e-3;

    fn processor(mass_kg: f64, initial_temp_c: f64) -> IceProcessor {
        IceProcessor::new(IceConfig {
            add_time_s: 10.0,
            mass_kg,
            initial_temp_c,
        })
        .unwrap()
    }

    #[test]
    fn config_validation() {
        assert!(IceConfig::default().validate().is_ok());
        let warm = IceConfig {
            initial_temp_c: 2.0,
            ..Default::default()
        };
        assert!(warm.validate().is_err());
        let empty = IceConfig {
            mass_kg: 0.0,
            ..Default::default()
        };
        assert!(empty.validate().is_err());
        let early = IceConfig {
            add_time_s: -1.0,
            ..Default::default()
        };
        assert!(early.validate().is_err());
    }

    #[test]
    fn nothing_happens_before_add_time() {
        let mut ice = processor(0.1, -5.0);
        let mut volume = LITRE;
        let step = ice.step(5.0, 1.0, 40.0, &mut volume, &Fluid::water());
        assert_eq!(step.temperature_c, 40.0);
        assert!(step.events.is_empty());
        assert_eq!(ice.phase(), IcePhase::Pending);
        assert!(!ice.is_due(5.0));
        assert!(ice.is_due(10.0));
    }

    #[test]
    fn adding_records_volume_and_event() {
        let mut ice = processor(0.1, -5.0);
        let mut volume = LITRE;
        let step = ice.step(10.0, 1.0, 40.0, &mut volume, &Fluid::water());
        assert!(matches!(step.events[0], SimEvent::IceAdded { .. }));
        assert!(ice.is_active());
        assert_eq!(ice.summary().initial_fluid_volume_m3, Some(LITRE));
        assert_relative_eq!(ice.remaining_kg(), 0.1);
    }

    #[test]
    fn ice_at_zero_starts_melting_immediately() {
        let mut ice = processor(0.1, 0.0);
        let mut volume = LITRE;
        let step = ice.step(10.0, 1.0, 40.0, &mut volume, &Fluid::water());
        assert!(matches!(ice.phase(), IcePhase::Melting { .. }));
        assert!(
            step.events
                .iter()
                .any(|e| matches!(e, SimEvent::IceAtMeltingPoint { .. }))
        );
    }

    #[test]
    fn adding_to_subzero_fluid_reports_the_melting_point() {
        let mut ice = processor(0.1, -5.0);
        let mut volume = LITRE;
        let step = ice.step(10.0, 1.0, -3.0, &mut volume, &Fluid::water());
        assert!(matches!(ice.phase(), IcePhase::Warming { .. }));
        assert_eq!(step.temperature_c, ICE_MELTING_POINT_C);
        match step.events.first() {
            Some(SimEvent::IceAdded { fluid_temp_c, .. }) => {
                assert_eq!(*fluid_temp_c, ICE_MELTING_POINT_C);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn warming_cools_fluid_and_is_rate_limited() {
        let mut ice = processor(0.1, -20.0);
        let mut volume = LITRE;
        let fluid = Fluid::water();
        ice.step(10.0, 1.0, 50.0, &mut volume, &fluid);
        let step = ice.step(11.0, 1.0, 50.0, &mut volume, &fluid);
        assert!(step.temperature_c < 50.0);
        match ice.phase() {
            IcePhase::Warming { ice_temp_c, .. } => {
                assert_relative_eq!(ice_temp_c, -20.0 + MAX_ICE_WARMING_PER_STEP_C);
            }
            other => panic!("unexpected phase {other:?}"),
        }
        assert_relative_eq!(volume, LITRE);
    }

    #[test]
    fn melting_conserves_mass() {
        let mut ice = processor(0.1, -5.0);
        let mut volume = LITRE;
        let fluid = Fluid::water();
        let mut t = 10.0;
        let mut temp: f64 = 60.0;
        while ice.phase() != IcePhase::Melted {
            let step = ice.step(t, 1.0, temp, &mut volume, &fluid);
            // a steady heater keeps the fluid warm enough to melt
            temp = step.temperature_c + 0.3;
            t += 1.0;
            assert!(t < 10_000.0, "ice never melted");
        }
        let summary = ice.summary();
        assert_relative_eq!(summary.melted_kg, 0.1, epsilon = 1e-12);
        assert_relative_eq!(summary.added_water_volume_m3, 0.1 / 1000.0, epsilon = 1e-15);
        assert_relative_eq!(volume, LITRE + 1e-4, epsilon = 1e-15);
    }

    #[test]
    fn fluid_never_goes_below_zero() {
        let mut ice = processor(5.0, -30.0);
        let mut volume = 0.2 * LITRE;
        let fluid = Fluid::water();
        let mut temp = 5.0;
        for i in 0..500 {
            let step = ice.step(10.0 + i as f64, 1.0, temp, &mut volume, &fluid);
            assert!(step.temperature_c >= 0.0);
            for s in &step.intermediate {
                assert!(s.temperature_c >= 0.0);
            }
            temp = step.temperature_c;
        }
    }

    #[test]
    fn intermediate_points_are_inside_step() {
        let points = intermediate_points(100.0, 1.0, 50.0, 44.0);
        assert_eq!(points.len(), INTERMEDIATE_POINTS);
        assert_relative_eq!(points[0].time_s, 100.0 - 5.0 / 6.0);
        assert_relative_eq!(points[0].temperature_c, 49.0);
        assert_relative_eq!(points[4].temperature_c, 45.0);
        for pair in points.windows(2) {
            assert!(pair[0].time_s < pair[1].time_s);
        }
        assert!(points.iter().all(|p| p.time_s > 99.0 && p.time_s < 100.0));
    }

    #[test]
    fn small_changes_have_no_intermediate_points() {
        assert!(intermediate_points(10.0, 1.0, 20.0, 19.995).is_empty());
    }
}
