//! Families of runs with sampled parameters, executed in parallel.

use crate::runtime::{RunOverrides, build_simulation};
use crate::sampling::Sampler;
use crate::schema::{Scenario, SweepDef};
use crate::{ScenarioError, ScenarioResult};
use hs_sim::{NullObserver, SimReport, derive_seed};
use rayon::prelude::*;
use serde::Serialize;

/// One finished run of a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepRun {
    pub index: usize,
    pub seed: u64,
    pub parameters: RunOverrides,
    pub report: SimReport,
}

/// Draw the per-run overrides for `sweep`.
pub fn sweep_parameters(sweep: &SweepDef, seed: u64) -> ScenarioResult<Vec<RunOverrides>> {
    let mut sampler = Sampler::new(seed);
    let n = sweep.count();
    let runs: Vec<RunOverrides> = match sweep {
        SweepDef::WallThicknessUniform { min_m, max_m, .. } => sampler
            .uniform(*min_m, *max_m, n)?
            .into_iter()
            .map(|t| RunOverrides {
                wall_thickness_m: Some(t),
                ..Default::default()
            })
            .collect(),
        SweepDef::InitialTemperatureNormal { mean_c, std_c, .. } => sampler
            .normal(*mean_c, *std_c, n)?
            .into_iter()
            .map(|t| RunOverrides {
                initial_temp_c: Some(t),
                ..Default::default()
            })
            .collect(),
        SweepDef::AmbientTemperatureUniform { min_c, max_c, .. } => sampler
            .uniform(*min_c, *max_c, n)?
            .into_iter()
            .map(|t| RunOverrides {
                ambient_temp_c: Some(t),
                ..Default::default()
            })
            .collect(),
        SweepDef::SupplyVoltageNormal { mean_v, std_v, .. } => sampler
            .normal(*mean_v, *std_v, n)?
            .into_iter()
            .map(|v| RunOverrides {
                supply_voltage_v: Some(v),
                ..Default::default()
            })
            .collect(),
        SweepDef::Combined(c) => {
            let thickness = sampler.uniform(c.thickness_min_m, c.thickness_max_m, n)?;
            let initial = sampler.normal(c.initial_mean_c, c.initial_std_c, n)?;
            let ambient = sampler.uniform(c.ambient_min_c, c.ambient_max_c, n)?;
            let voltage = sampler.normal(c.voltage_mean_v, c.voltage_std_v, n)?;
            (0..n)
                .map(|i| RunOverrides {
                    wall_thickness_m: Some(thickness[i]),
                    initial_temp_c: Some(initial[i]),
                    ambient_temp_c: Some(ambient[i]),
                    supply_voltage_v: Some(voltage[i]),
                })
                .collect()
        }
    };
    Ok(runs)
}

/// Run every member of the scenario's sweep.
///
/// Each run owns its simulation and RNG, seeded from `seed` and the run
/// index, so results do not depend on thread scheduling. Results come back
/// in index order.
pub fn run_sweep(scenario: &Scenario, seed: u64) -> ScenarioResult<Vec<SweepRun>> {
    let sweep = scenario.sweep.as_ref().ok_or(ScenarioError::InvalidArg {
        what: "scenario has no sweep section",
    })?;
    let parameters = sweep_parameters(sweep, seed)?;
    tracing::info!(runs = parameters.len(), seed, "starting sweep");

    parameters
        .into_par_iter()
        .enumerate()
        .map(|(index, parameters)| -> ScenarioResult<SweepRun> {
            let run_seed = derive_seed(seed, index as u64);
            let mut sim = build_simulation(scenario, &parameters)?
                .with_seed(run_seed)
                .with_observer(NullObserver);
            let report = sim.run()?;
            tracing::debug!(
                index,
                outcome = ?report.outcome,
                final_temp_c = report.final_temperature_c(),
                "sweep run finished"
            );
            Ok(SweepRun {
                index,
                seed: run_seed,
                parameters,
                report,
            })
        })
        .collect()
}
