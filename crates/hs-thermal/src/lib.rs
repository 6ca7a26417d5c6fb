//! Thermal property providers and per-step heat exchange.
//!
//! Provides:
//! - Container geometry (cylinder) and wall materials
//! - Intrinsic fluid properties (no mutable temperature or volume)
//! - Constant power sources
//! - Series thermal-resistance heat-loss coefficient
//! - Heating and Newton cooling deltas per time step

pub mod common;
pub mod container;
pub mod error;
pub mod exchange;
pub mod fluid;
pub mod material;
pub mod power;
pub mod shape;

pub use container::Container;
pub use error::{ThermalError, ThermalResult};
pub use exchange::{CoolingStep, HeatingStep, cooling_step, heating_step};
pub use fluid::Fluid;
pub use material::Material;
pub use power::PowerSource;
pub use shape::Shape;
