use clumpsim::{ScenarioConfig, Scenario, SnapshotWriter, Control};
use clumpsim::{bench_gravity, bench_leapfrog};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Two colliding SPH clumps under self-gravity")]
struct Args {
    /// Scenario YAML, looked up under `scenarios/` if not found as given
    #[arg(short, default_value = "colliding_planets.yaml")]
    file_name: String,

    /// Stop at this time instead of the scenario's `t_end`
    #[arg(long)]
    t_end: Option<f64>,

    /// Snapshot file, overrides the scenario's output path
    #[arg(long)]
    output: Option<String>,

    /// Sampling seed, overrides the scenario's seed
    #[arg(long)]
    seed: Option<u64>,

    /// Run the timing benchmarks and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let given = PathBuf::from(file_name);
    let config_path = if given.exists() {
        given
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    };

    let scenario_cfg = ScenarioConfig::from_path(&config_path)
        .with_context(|| format!("failed to load scenario {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_gravity();
        bench_leapfrog();
        return Ok(());
    }

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if let Some(seed) = args.seed {
        scenario_cfg.parameters.seed = seed;
    }
    if let Some(t_end) = args.t_end {
        scenario_cfg.parameters.t_end = Some(t_end);
    }
    if let Some(path) = args.output {
        match scenario_cfg.output.as_mut() {
            Some(out) => out.path = path,
            None => warn!("scenario has no output section, ignoring --output"),
        }
    }

    let mut scenario = Scenario::build_scenario(scenario_cfg).context("failed to build scenario")?;
    let t_max = scenario.parameters.t_end.unwrap_or(f64::INFINITY);

    let mut writer = scenario.output.as_ref().map(|o| SnapshotWriter::from_config(o, t_max));
    scenario.integrate(t_max, |s| match writer.as_mut() {
        Some(w) => w.heartbeat(s),
        None => Ok(Control::Continue),
    })?;

    if let Some(w) = &writer {
        info!("wrote {} snapshot(s) to {}", w.written(), w.path.display());
    }
    Ok(())
}
