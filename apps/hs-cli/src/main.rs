use clap::{Parser, Subcommand};
use hs_scenario::{RunOverrides, Scenario, ScenarioResult, build_simulation};
use hs_sim::{DEFAULT_SEED, SimReport};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hs-cli")]
#[command(about = "HeatSim CLI - fluid heating with ice and random disturbances", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and values
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Run a single simulation
    Run {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// RNG seed (overrides the scenario's seed)
        #[arg(long)]
        seed: Option<u64>,
        /// Print the trajectory as time_s,temperature_c CSV
        #[arg(long)]
        series: bool,
        /// Print the full report as JSON
        #[arg(long, conflicts_with = "series")]
        json: bool,
    },
    /// Run the scenario's parameter sweep
    Sweep {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Base RNG seed (overrides the scenario's seed)
        #[arg(long)]
        seed: Option<u64>,
        /// Print every run as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ScenarioResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            seed,
            series,
            json,
        } => cmd_run(&scenario_path, seed, series, json),
        Commands::Sweep {
            scenario_path,
            seed,
            json,
        } => cmd_sweep(&scenario_path, seed, json),
    }
}

fn resolve_seed(scenario: &Scenario, cli_seed: Option<u64>) -> u64 {
    cli_seed.or(scenario.seed).unwrap_or(DEFAULT_SEED)
}

fn cmd_validate(scenario_path: &Path) -> ScenarioResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = hs_scenario::load_yaml(scenario_path)?;
    // construction applies the thermal model's own checks
    build_simulation(&scenario, &RunOverrides::default())?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    if let Some(sweep) = &scenario.sweep {
        println!("  Sweep: {} runs", sweep.count());
    }
    Ok(())
}

fn cmd_run(scenario_path: &Path, seed: Option<u64>, series: bool, json: bool) -> ScenarioResult<()> {
    let scenario = hs_scenario::load_yaml(scenario_path)?;
    let seed = resolve_seed(&scenario, seed);
    let mut sim = build_simulation(&scenario, &RunOverrides::default())?.with_seed(seed);

    let coefficient = sim
        .container()
        .heat_loss_coefficient(sim.config().correction_factor);
    let report = sim.run()?;

    if json {
        println!("{}", hs_scenario::to_json_pretty(&report)?);
        return Ok(());
    }
    if series {
        println!("time_s,temperature_c");
        for s in &report.samples {
            println!("{:.4},{:.6}", s.time_s, s.temperature_c);
        }
        return Ok(());
    }

    println!("Scenario: {} (seed {})", scenario.name, seed);
    println!(
        "  Container volume: {:.3} L, heat loss coefficient: {:.3} W/K",
        sim.container().volume().value * 1000.0,
        coefficient
    );
    print_report(&report);
    Ok(())
}

fn print_report(report: &SimReport) {
    println!("\nOutcome: {:?}", report.outcome);
    println!("  Simulated time:    {:.1} s", report.duration_s());
    println!("  Final temperature: {:.2} °C", report.final_temperature_c());
    println!(
        "  Final volume:      {:.1} cm³",
        report.final_state.volume_m3 * 1e6
    );
    println!("  Samples:           {}", report.samples.len());
    println!("  Random events:     {}", report.random_events.len());
    if let Some(ice) = &report.ice {
        println!(
            "  Ice melted:        {:.1} g (+{:.1} cm³ water)",
            ice.melted_kg * 1000.0,
            ice.added_water_volume_m3 * 1e6
        );
    }

    if !report.log.is_empty() {
        println!("\nEvent log:");
        for entry in &report.log {
            println!("  [{:>9.1} s] {}", entry.time_s, entry.event);
        }
    }
}

fn cmd_sweep(scenario_path: &Path, seed: Option<u64>, json: bool) -> ScenarioResult<()> {
    let scenario = hs_scenario::load_yaml(scenario_path)?;
    let seed = resolve_seed(&scenario, seed);
    let runs = hs_scenario::run_sweep(&scenario, seed)?;

    if json {
        println!("{}", hs_scenario::to_json_pretty(&runs)?);
        return Ok(());
    }

    println!("Sweep of '{}' ({} runs, seed {})", scenario.name, runs.len(), seed);
    println!(
        "{:>4}  {:>10}  {:>9}  {:>9}  {:>9}  {:>20}  {:>10}  {:>9}",
        "run", "wall (mm)", "T0 (°C)", "Tamb (°C)", "supply V", "outcome", "time (s)", "Tend (°C)"
    );
    for run in &runs {
        let p = &run.parameters;
        println!(
            "{:>4}  {:>10}  {:>9}  {:>9}  {:>9}  {:>20}  {:>10.1}  {:>9.2}",
            run.index,
            fmt_opt(p.wall_thickness_m.map(|t| t * 1000.0), 2),
            fmt_opt(p.initial_temp_c, 1),
            fmt_opt(p.ambient_temp_c, 1),
            fmt_opt(p.supply_voltage_v, 0),
            format!("{:?}", run.report.outcome),
            run.report.duration_s(),
            run.report.final_temperature_c()
        );
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "-".to_string())
}
