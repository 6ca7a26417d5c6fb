//! Trajectory samples, outcomes and the structured event log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One point of the temperature trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time_s: f64,
    pub temperature_c: f64,
}

/// Why a simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimOutcome {
    /// Fluid reached the target temperature.
    TargetReached,
    /// Temperature stopped changing: heat loss balances heat input.
    EquilibriumReached,
    /// Hit the simulated-time cap before either of the above.
    TimeLimitExceeded,
}

/// Something noteworthy that happened during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    IceAdded {
        mass_kg: f64,
        ice_temp_c: f64,
        fluid_temp_c: f64,
    },
    IceAtMeltingPoint {
        fluid_temp_c: f64,
    },
    IceMelted {
        initial_volume_m3: f64,
        final_volume_m3: f64,
        added_volume_m3: f64,
        fluid_temp_c: f64,
    },
    RandomEventStarted {
        total_drop_c: f64,
        duration_s: f64,
        fluid_temp_c: f64,
    },
    RandomEventFinished {
        fluid_temp_c: f64,
    },
    TargetReached {
        temperature_c: f64,
    },
    EquilibriumReached {
        temperature_c: f64,
    },
    TimeLimitReached {
        temperature_c: f64,
    },
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::IceAdded {
                mass_kg,
                ice_temp_c,
                fluid_temp_c,
            } => write!(
                f,
                "ice added: {:.0} g at {:.1} °C into fluid at {:.2} °C",
                mass_kg * 1000.0,
                ice_temp_c,
                fluid_temp_c
            ),
            SimEvent::IceAtMeltingPoint { fluid_temp_c } => write!(
                f,
                "ice reached its melting point, fluid at {:.2} °C",
                fluid_temp_c
            ),
            SimEvent::IceMelted {
                initial_volume_m3,
                final_volume_m3,
                added_volume_m3,
                fluid_temp_c,
            } => write!(
                f,
                "ice fully melted at {:.2} °C: volume {:.1} -> {:.1} cm³ (+{:.1} cm³)",
                fluid_temp_c,
                initial_volume_m3 * 1e6,
                final_volume_m3 * 1e6,
                added_volume_m3 * 1e6
            ),
            SimEvent::RandomEventStarted {
                total_drop_c,
                duration_s,
                fluid_temp_c,
            } => write!(
                f,
                "random event started at {:.2} °C: -{:.2} °C over {:.1} s",
                fluid_temp_c, total_drop_c, duration_s
            ),
            SimEvent::RandomEventFinished { fluid_temp_c } => {
                write!(f, "random event finished at {:.2} °C", fluid_temp_c)
            }
            SimEvent::TargetReached { temperature_c } => {
                write!(f, "target reached at {:.2} °C", temperature_c)
            }
            SimEvent::EquilibriumReached { temperature_c } => write!(
                f,
                "thermal equilibrium at {:.2} °C, target unreachable",
                temperature_c
            ),
            SimEvent::TimeLimitReached { temperature_c } => {
                write!(f, "time limit reached at {:.2} °C", temperature_c)
            }
        }
    }
}

/// Timestamped entry of the event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub time_s: f64,
    pub event: SimEvent,
}
