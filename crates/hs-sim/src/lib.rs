//! Heating simulation driver.
//!
//! Provides:
//! - Fixed-step heating with Newton losses toward ambient
//! - Ice addition with warming and melting phases
//! - Seeded random cooling events
//! - Lazy trajectories and a structured event log with pluggable observers

pub mod error;
pub mod events;
pub mod ice;
pub mod observer;
pub mod record;
pub mod rng;
pub mod simulation;

pub use error::{SimError, SimResult};
pub use events::{ActiveEventState, EventRecord, RandomEventConfig, RandomEventGenerator};
pub use ice::{IceConfig, IcePhase, IceProcessor, IceStep, IceSummary};
pub use observer::{NullObserver, RecordingObserver, SimObserver, TracingObserver};
pub use record::{LogEntry, Sample, SimEvent, SimOutcome};
pub use rng::{DEFAULT_SEED, SimRng, derive_seed};
pub use simulation::{SimConfig, SimReport, Simulation, ThermalState, Trajectory};
