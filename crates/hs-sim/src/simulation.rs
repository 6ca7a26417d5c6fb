//! Fixed-step heating driver.
//!
//! A `Simulation` holds the physical setup, the run configuration, its own
//! RNG and an observer. Each call to [`Simulation::trajectory`] starts a
//! fresh run from the initial state and yields samples lazily;
//! [`Simulation::run`] drains one into a [`SimReport`].

use crate::error::{SimError, SimResult};
use crate::events::{EventRecord, RandomEventConfig, RandomEventGenerator};
use crate::ice::{IceConfig, IceProcessor, IceSummary};
use crate::observer::{SimObserver, TracingObserver};
use crate::record::{LogEntry, Sample, SimEvent, SimOutcome};
use crate::rng::SimRng;
use hs_core::numeric::{ensure_finite, ensure_positive};
use hs_thermal::{Container, Fluid, PowerSource, cooling_step, heating_step};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Stop once the fluid reaches this temperature (°C)
    pub target_temp_c: f64,
    /// Surrounding air temperature (°C)
    pub ambient_temp_c: f64,
    /// Fixed step (s)
    pub time_step_s: f64,
    pub include_heat_loss: bool,
    /// Multiplier on the container's loss coefficient
    pub correction_factor: f64,
    /// Simulated-time cap (s)
    pub max_time_s: f64,
    /// Spacing of equilibrium checks (s)
    pub equilibrium_check_interval_s: f64,
    /// Number of checks compared for equilibrium
    pub equilibrium_window: usize,
    /// Max temperature range across the window at equilibrium (°C)
    pub equilibrium_tolerance_c: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            target_temp_c: 60.0,
            ambient_temp_c: 25.0,
            time_step_s: 1.0,
            include_heat_loss: true,
            correction_factor: 1.0,
            max_time_s: 300_000.0,
            equilibrium_check_interval_s: 1000.0,
            equilibrium_window: 5,
            equilibrium_tolerance_c: 0.001,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.target_temp_c, "target temperature")?;
        ensure_finite(self.ambient_temp_c, "ambient temperature")?;
        ensure_positive(self.time_step_s, "time step")?;
        ensure_positive(self.correction_factor, "correction factor")?;
        ensure_positive(self.max_time_s, "maximum simulated time")?;
        ensure_positive(
            self.equilibrium_check_interval_s,
            "equilibrium check interval",
        )?;
        ensure_positive(self.equilibrium_tolerance_c, "equilibrium tolerance")?;
        if self.equilibrium_window < 2 {
            return Err(SimError::InvalidArg {
                what: "equilibrium window needs at least two checks",
            });
        }
        Ok(())
    }
}

/// Mutable fluid state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermalState {
    pub time_s: f64,
    pub temperature_c: f64,
    pub volume_m3: f64,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub samples: Vec<Sample>,
    pub outcome: SimOutcome,
    pub log: Vec<LogEntry>,
    pub random_events: Vec<EventRecord>,
    pub final_state: ThermalState,
    pub ice: Option<IceSummary>,
}

impl SimReport {
    pub fn final_temperature_c(&self) -> f64 {
        self.final_state.temperature_c
    }

    pub fn duration_s(&self) -> f64 {
        self.final_state.time_s
    }
}

pub struct Simulation {
    container: Container,
    fluid: Fluid,
    power: PowerSource,
    initial: ThermalState,
    config: SimConfig,
    ice: Option<IceConfig>,
    random_events: Option<RandomEventConfig>,
    rng: SimRng,
    observer: Box<dyn SimObserver>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("container", &self.container)
            .field("fluid", &self.fluid)
            .field("power", &self.power)
            .field("initial", &self.initial)
            .field("config", &self.config)
            .field("ice", &self.ice)
            .field("random_events", &self.random_events)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Build a simulation with default configuration, no ice, no random
    /// events, the default seed and a tracing observer.
    pub fn new(
        container: Container,
        fluid: Fluid,
        power: PowerSource,
        initial_temp_c: f64,
        initial_volume_m3: f64,
    ) -> SimResult<Self> {
        ensure_finite(initial_temp_c, "initial temperature")?;
        ensure_positive(initial_volume_m3, "initial fluid volume")?;
        Ok(Self {
            container,
            fluid,
            power,
            initial: ThermalState {
                time_s: 0.0,
                temperature_c: initial_temp_c,
                volume_m3: initial_volume_m3,
            },
            config: SimConfig::default(),
            ice: None,
            random_events: None,
            rng: SimRng::default(),
            observer: Box::new(TracingObserver),
        })
    }

    pub fn configure(&mut self, config: SimConfig) -> SimResult<&mut Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Schedule (or clear) an ice addition.
    pub fn configure_ice_addition(&mut self, ice: Option<IceConfig>) -> SimResult<&mut Self> {
        if let Some(ice) = &ice {
            ice.validate()?;
        }
        self.ice = ice;
        Ok(self)
    }

    /// Enable (or disable) random cooling events.
    pub fn configure_random_events(
        &mut self,
        events: Option<RandomEventConfig>,
    ) -> SimResult<&mut Self> {
        if let Some(events) = &events {
            events.validate()?;
        }
        self.random_events = events;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SimRng::from_seed_u64(seed);
        self
    }

    pub fn with_rng(mut self, rng: SimRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_observer(mut self, observer: impl SimObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }

    pub fn power(&self) -> PowerSource {
        self.power
    }

    pub fn initial_state(&self) -> ThermalState {
        self.initial
    }

    /// Start a run. Samples are produced as the iterator is pulled.
    pub fn trajectory(&mut self) -> SimResult<Trajectory<'_>> {
        let ice = self.ice.clone().map(IceProcessor::new).transpose()?;
        let events = self
            .random_events
            .clone()
            .map(RandomEventGenerator::new)
            .transpose()?;
        let coefficient_w_per_k = self
            .container
            .heat_loss_coefficient(self.config.correction_factor);
        tracing::debug!(
            coefficient_w_per_k,
            initial_temp_c = self.initial.temperature_c,
            target_temp_c = self.config.target_temp_c,
            "starting heating run"
        );
        Ok(Trajectory {
            state: self.initial,
            coefficient_w_per_k,
            ice,
            events,
            pending: VecDeque::new(),
            history: Vec::new(),
            log: Vec::new(),
            outcome: None,
            started: false,
            equilibrium_window: VecDeque::new(),
            last_equilibrium_check_s: 0.0,
            last_trigger_second: 0,
            sim: self,
        })
    }

    /// Run to completion.
    pub fn run(&mut self) -> SimResult<SimReport> {
        Ok(self.trajectory()?.finish())
    }
}

/// One run in progress. Not restartable: call
/// [`Simulation::trajectory`] again for a new run.
pub struct Trajectory<'a> {
    sim: &'a mut Simulation,
    state: ThermalState,
    coefficient_w_per_k: f64,
    ice: Option<IceProcessor>,
    events: Option<RandomEventGenerator>,
    pending: VecDeque<Sample>,
    history: Vec<Sample>,
    log: Vec<LogEntry>,
    outcome: Option<SimOutcome>,
    started: bool,
    equilibrium_window: VecDeque<f64>,
    last_equilibrium_check_s: f64,
    last_trigger_second: i64,
}

impl Trajectory<'_> {
    pub fn state(&self) -> ThermalState {
        self.state
    }

    /// Set once the run has terminated.
    pub fn outcome(&self) -> Option<SimOutcome> {
        self.outcome
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Drain the remaining samples and assemble the report.
    pub fn finish(mut self) -> SimReport {
        while self.next().is_some() {}
        SimReport {
            samples: self.history,
            outcome: self.outcome.unwrap_or(SimOutcome::TimeLimitExceeded),
            log: self.log,
            random_events: self
                .events
                .as_ref()
                .map(|g| g.history().to_vec())
                .unwrap_or_default(),
            final_state: self.state,
            ice: self.ice.as_ref().map(IceProcessor::summary),
        }
    }

    fn record(&mut self, time_s: f64, event: SimEvent) {
        let entry = LogEntry { time_s, event };
        self.sim.observer.on_event(&entry);
        self.log.push(entry);
    }

    fn emit(&mut self, sample: Sample) {
        self.sim.observer.on_sample(&sample);
        self.pending.push_back(sample);
    }

    fn terminate(&mut self, outcome: SimOutcome) {
        let temperature_c = self.state.temperature_c;
        let event = match outcome {
            SimOutcome::TargetReached => SimEvent::TargetReached { temperature_c },
            SimOutcome::EquilibriumReached => SimEvent::EquilibriumReached { temperature_c },
            SimOutcome::TimeLimitExceeded => SimEvent::TimeLimitReached { temperature_c },
        };
        self.record(self.state.time_s, event);
        self.outcome = Some(outcome);
    }

    /// Advance one fixed step, queueing its samples.
    fn step(&mut self) {
        let config = &self.sim.config;
        let dt = config.time_step_s;
        let include_heat_loss = config.include_heat_loss;
        let ambient_c = config.ambient_temp_c;

        self.state.time_s += dt;
        let time_s = self.state.time_s;
        let current_c = self.state.temperature_c;
        let fluid_mass = self.sim.fluid.mass_of(self.state.volume_m3);
        let cp = self.sim.fluid.specific_heat;

        let heating = heating_step(self.sim.power.watts(), dt, fluid_mass, cp);
        let cooling_c = if include_heat_loss {
            cooling_step(
                self.coefficient_w_per_k,
                current_c,
                ambient_c,
                dt,
                fluid_mass,
                cp,
            )
            .delta_c
        } else {
            0.0
        };
        let mut temperature_c = current_c + heating.delta_c - cooling_c;
        tracing::trace!(
            time_s,
            heating_c = heating.delta_c,
            cooling_c,
            "step"
        );

        let mut new_events = Vec::new();
        if let Some(generator) = self.events.as_mut() {
            let second = time_s.floor() as i64;
            if second > self.last_trigger_second {
                self.last_trigger_second = second;
                if generator.try_trigger(time_s, &mut self.sim.rng.0) {
                    let (total_drop_c, duration_s) =
                        generator.start_event(time_s, temperature_c, &mut self.sim.rng.0);
                    new_events.push(SimEvent::RandomEventStarted {
                        total_drop_c,
                        duration_s,
                        fluid_temp_c: temperature_c,
                    });
                }
            }
            if generator.is_active() {
                temperature_c -= generator.process_event(time_s, dt);
                if !generator.is_active() {
                    new_events.push(SimEvent::RandomEventFinished {
                        fluid_temp_c: temperature_c,
                    });
                }
            }
        }
        self.state.temperature_c = temperature_c;
        for event in new_events {
            self.record(time_s, event);
        }

        let mut intermediate = Vec::new();
        if let Some(ice) = self
            .ice
            .as_mut()
            .filter(|ice| ice.is_active() || ice.is_due(time_s))
        {
            let step = ice.step(
                time_s,
                dt,
                self.state.temperature_c,
                &mut self.state.volume_m3,
                &self.sim.fluid,
            );
            self.state.temperature_c = step.temperature_c;
            intermediate = step.intermediate;
            for event in step.events {
                self.record(time_s, event);
            }
        }

        let covered = intermediate
            .iter()
            .any(|s| (s.time_s - time_s).abs() < 0.01);
        for sample in intermediate {
            self.emit(sample);
        }
        if !covered {
            self.emit(Sample {
                time_s,
                temperature_c: self.state.temperature_c,
            });
        }

        if self.equilibrium_reached() {
            self.terminate(SimOutcome::EquilibriumReached);
        } else if self.state.temperature_c >= self.sim.config.target_temp_c {
            self.terminate(SimOutcome::TargetReached);
        } else if self.state.time_s >= self.sim.config.max_time_s {
            self.terminate(SimOutcome::TimeLimitExceeded);
        }
    }

    /// Sample the temperature every check interval and compare the window.
    fn equilibrium_reached(&mut self) -> bool {
        let config = &self.sim.config;
        if self.state.time_s - self.last_equilibrium_check_s < config.equilibrium_check_interval_s
        {
            return false;
        }
        self.last_equilibrium_check_s = self.state.time_s;
        self.equilibrium_window.push_back(self.state.temperature_c);
        while self.equilibrium_window.len() > config.equilibrium_window {
            self.equilibrium_window.pop_front();
        }
        if self.equilibrium_window.len() < config.equilibrium_window {
            return false;
        }
        let (lo, hi) = self
            .equilibrium_window
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
                (lo.min(*t), hi.max(*t))
            });
        hi - lo < config.equilibrium_tolerance_c
    }
}

impl Iterator for Trajectory<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        loop {
            if let Some(sample) = self.pending.pop_front() {
                self.history.push(sample);
                return Some(sample);
            }
            if !self.started {
                self.started = true;
                self.emit(Sample {
                    time_s: self.state.time_s,
                    temperature_c: self.state.temperature_c,
                });
                if self.state.temperature_c >= self.sim.config.target_temp_c {
                    self.terminate(SimOutcome::TargetReached);
                }
                continue;
            }
            if self.outcome.is_some() {
                return None;
            }
            self.step();
        }
    }
}
