use approx::assert_relative_eq;
use hs_scenario::{CombinedSweepDef, SweepDef, from_yaml_str, run_sweep, sweep_parameters};
use hs_sim::SimOutcome;

const BASE: &str = r#"
version: 1
name: Sweep base
container:
  shape:
    kind: cylinder
    radius: 0.09
    height: 0.15
  material: stainless_steel
  wall_thickness_m: 0.0025
heater:
  power_w: 1100
initial:
  temperature_c: 20
simulation:
  target_temp_c: 60
  ambient_temp_c: 20
"#;

fn with_sweep(sweep: &str) -> hs_scenario::Scenario {
    from_yaml_str(&format!("{BASE}sweep:\n{sweep}")).unwrap()
}

#[test]
fn thickness_sweep_runs_in_index_order() {
    let scenario = with_sweep(
        "  kind: wall_thickness_uniform\n  min_m: 0.0008\n  max_m: 0.005\n  count: 6\n",
    );
    let runs = run_sweep(&scenario, 11).unwrap();
    assert_eq!(runs.len(), 6);
    for (i, run) in runs.iter().enumerate() {
        assert_eq!(run.index, i);
        let t = run.parameters.wall_thickness_m.unwrap();
        assert!((0.0008..=0.005).contains(&t));
        assert_eq!(run.report.outcome, SimOutcome::TargetReached);
    }
}

#[test]
fn thinner_walls_take_longer() {
    let scenario = with_sweep(
        "  kind: wall_thickness_uniform\n  min_m: 0.0008\n  max_m: 0.005\n  count: 10\n",
    );
    let runs = run_sweep(&scenario, 5).unwrap();
    let thinnest = runs
        .iter()
        .min_by(|a, b| {
            a.parameters
                .wall_thickness_m
                .partial_cmp(&b.parameters.wall_thickness_m)
                .unwrap()
        })
        .unwrap();
    let thickest = runs
        .iter()
        .max_by(|a, b| {
            a.parameters
                .wall_thickness_m
                .partial_cmp(&b.parameters.wall_thickness_m)
                .unwrap()
        })
        .unwrap();
    assert!(thinnest.report.duration_s() >= thickest.report.duration_s());
}

#[test]
fn sweeps_are_reproducible() {
    let scenario = with_sweep("  kind: combined\n  count: 4\n");
    let a = run_sweep(&scenario, 3).unwrap();
    let b = run_sweep(&scenario, 3).unwrap();
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.seed, y.seed);
        assert_eq!(x.parameters, y.parameters);
        assert_eq!(x.report.samples, y.report.samples);
    }
}

#[test]
fn voltage_sweep_scales_power() {
    let params = sweep_parameters(
        &SweepDef::SupplyVoltageNormal {
            mean_v: 220.0,
            std_v: 0.0,
            count: 3,
        },
        1,
    )
    .unwrap();
    for p in params {
        assert_relative_eq!(p.supply_voltage_v.unwrap(), 220.0);
        assert!(p.wall_thickness_m.is_none());
    }
}

#[test]
fn combined_defaults_cover_every_parameter() {
    let params = sweep_parameters(&SweepDef::Combined(CombinedSweepDef::default()), 9).unwrap();
    assert_eq!(params.len(), 10);
    for p in params {
        assert!(p.wall_thickness_m.is_some());
        assert!(p.initial_temp_c.is_some());
        let ambient = p.ambient_temp_c.unwrap();
        assert!((-20.0..=50.0).contains(&ambient));
        assert!(p.supply_voltage_v.is_some());
    }
}

#[test]
fn scenario_without_sweep_is_rejected() {
    let scenario = from_yaml_str(BASE).unwrap();
    assert!(run_sweep(&scenario, 1).is_err());
}

#[test]
fn zero_count_fails_validation() {
    let yaml = format!(
        "{BASE}sweep:\n  kind: ambient_temperature_uniform\n  min_c: 0\n  max_c: 10\n  count: 0\n"
    );
    assert!(from_yaml_str(&yaml).is_err());
}
