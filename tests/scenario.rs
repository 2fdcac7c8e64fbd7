use std::fs;

use clumpsim::simulation::boundary::{apply_boundary, SimBox};
use clumpsim::simulation::engine::Engine;
use clumpsim::simulation::params::Parameters;
use clumpsim::simulation::states::{NVec3, Particle, ParticleSystem};
use clumpsim::{
    output_check, output_check_phase, write_ascii, BoundaryConfig, Control, GravityConfig,
    Scenario, ScenarioConfig, SimError, SnapshotWriter,
};

use approx::assert_relative_eq;

/// The default scenario shrunk so tests stay fast
fn small_config(n: usize) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::colliding_planets();
    for c in cfg.clumps.iter_mut() {
        c.n = n;
        c.nbin = 20;
    }
    cfg.engine.gravity = GravityConfig::Direct;
    cfg
}

fn point_scenario(dt: f64) -> Scenario {
    let engine = Engine {
        gravity: GravityConfig::None,
        ..Default::default()
    };
    let params = Parameters { t_end: None, dt, G: 1.0, softening: 0.0, seed: 0 };
    let mut scenario = Scenario::new(engine, params);
    scenario.add(Particle {
        v: NVec3::new(1.0, 0.0, 0.0),
        m: 1.0,
        ..Default::default()
    });
    scenario
}

// ==================================================================================
// Scenario building
// ==================================================================================

#[test]
fn default_scenario_matches_setup() {
    let cfg = ScenarioConfig::colliding_planets();
    assert_eq!(cfg.clumps.len(), 2);
    assert_relative_eq!(cfg.engine.theta.unwrap(), 0.01, max_relative = 1e-12);
    assert_relative_eq!(cfg.output.as_ref().unwrap().interval, 20.0 * std::f64::consts::PI);
    assert_eq!(cfg.clumps[0].offset, vec![-1.5 * 7.9e9, -0.5 * 7.9e9, 0.0]);
    assert_eq!(cfg.clumps[1].offset, vec![1.5 * 7.9e9, 0.5 * 7.9e9, 0.0]);
    assert_eq!(cfg.clumps[0].approach_x, Some(1.0));
    assert_eq!(cfg.clumps[1].approach_x, Some(-1.0));
    cfg.validate().unwrap();
}

#[test]
fn build_scenario_samples_both_clumps_in_com_frame() {
    let scenario = Scenario::build_scenario(small_config(300)).unwrap();
    let n = scenario.system.len();
    assert!(n <= 600 && n > 500, "unexpected particle count {n}");

    let (x, v) = scenario.system.center_of_mass();
    assert!(x.norm() < 1e-6 * 7.9e9);
    assert!(v.norm() < 1e-9 * 1e6);
    assert!(scenario.system.momentum().norm() < 1e-9 * scenario.system.total_mass() * 1e6);

    // one term for gravity, one for SPH pressure
    assert_eq!(scenario.forces.len(), 2);
    assert!(scenario.sim_box.is_some());
}

#[test]
fn move_to_com_zeroes_momentum() {
    let mut scenario = point_scenario(1.0);
    scenario.add(Particle {
        x: NVec3::new(4.0, 2.0, 0.0),
        v: NVec3::new(0.0, 3.0, 0.0),
        m: 3.0,
        ..Default::default()
    });
    scenario.move_to_com();

    let (x, v) = scenario.system.center_of_mass();
    assert!(x.norm() < 1e-12);
    assert!(v.norm() < 1e-12);
    assert!(scenario.system.momentum().norm() < 1e-12);
}

#[test]
fn yaml_scenario_files_parse() {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios");
    let planets = ScenarioConfig::from_path(format!("{dir}/colliding_planets.yaml")).unwrap();
    assert_eq!(planets.clumps.len(), 2);
    assert_eq!(planets.clumps[0].n, 5000);
    assert_eq!(planets.parameters.t_end, None);
    assert_eq!(planets.engine.sph.as_ref().unwrap().gamma, 2.0);

    let small = ScenarioConfig::from_path(format!("{dir}/small_collision.yaml")).unwrap();
    assert_eq!(small.engine.boundary, BoundaryConfig::Open);
    assert_eq!(small.parameters.t_end, Some(2000.0));
}

#[test]
fn invalid_yaml_is_rejected() {
    let yaml = r#"
parameters:
  dt: 0.0
  G: 1.0
clumps: []
"#;
    let err = ScenarioConfig::from_reader(yaml.as_bytes()).unwrap_err();
    assert!(matches!(err, SimError::Config(_)));

    let err = ScenarioConfig::from_reader("parameters: [".as_bytes()).unwrap_err();
    assert!(matches!(err, SimError::Yaml(_)));

    let mut cfg = small_config(10);
    cfg.clumps[1].offset = vec![1.0, 2.0];
    assert!(Scenario::build_scenario(cfg).is_err());
}

// ==================================================================================
// Integration loop and boundaries
// ==================================================================================

#[test]
fn integrate_finishes_exactly_on_t_max() {
    let mut scenario = point_scenario(0.3);
    let mut beats = 0;
    scenario
        .integrate(1.0, |_| {
            beats += 1;
            Ok(Control::Continue)
        })
        .unwrap();

    assert_relative_eq!(scenario.system.t, 1.0, max_relative = 1e-12);
    // one before the first step, then one per step (0.3, 0.6, 0.9, 1.0)
    assert_eq!(beats, 5);
    assert_relative_eq!(scenario.system.particles[0].x.x, 1.0, max_relative = 1e-12);
}

#[test]
fn heartbeat_can_stop_the_run() {
    let mut scenario = point_scenario(1.0);
    scenario
        .integrate(f64::INFINITY, |s| {
            Ok(if s.system.t >= 3.0 { Control::Exit } else { Control::Continue })
        })
        .unwrap();
    assert_eq!(scenario.system.t, 3.0);
}

#[test]
fn open_boundary_removes_escapees() {
    let mut sys = ParticleSystem::new(vec![
        Particle { x: NVec3::new(0.4, 0.0, 0.0), m: 1.0, ..Default::default() },
        Particle { x: NVec3::new(0.6, 0.0, 0.0), m: 1.0, ..Default::default() },
    ]);
    let sim_box = SimBox::new(1.0, 1, 1, 1);

    assert_eq!(apply_boundary(&mut sys, &sim_box, BoundaryConfig::None), 0);
    assert_eq!(sys.len(), 2);
    assert_eq!(apply_boundary(&mut sys, &sim_box, BoundaryConfig::Open), 1);
    assert_eq!(sys.len(), 1);

    let wide = SimBox::new(1.0, 2, 1, 1);
    assert_eq!(wide.size(), NVec3::new(2.0, 1.0, 1.0));
    assert!(wide.contains(&NVec3::new(0.9, 0.0, 0.0)));
}

#[test]
fn run_stops_when_everything_left_the_box() {
    let mut scenario = point_scenario(1.0);
    scenario.engine.boundary = BoundaryConfig::Open;
    scenario.configure_box(4.0, 1, 1, 1);

    scenario.integrate(100.0, |_| Ok(Control::Continue)).unwrap();
    assert!(scenario.system.is_empty());
    assert_eq!(scenario.system.t, 3.0);
}

// ==================================================================================
// Output
// ==================================================================================

#[test]
fn output_check_fires_on_interval_crossings() {
    let mut sys = ParticleSystem::default();
    assert!(output_check(&sys, 2.5));

    let mut fired = Vec::new();
    for _ in 0..6 {
        sys.t += 1.0;
        sys.dt_last_done = 1.0;
        if output_check(&sys, 2.5) {
            fired.push(sys.t);
        }
    }
    assert_eq!(fired, vec![3.0, 5.0]);

    // shifted by half an interval the crossings move to 1.25, 3.75
    sys.t = 2.0;
    assert!(output_check_phase(&sys, 2.5, 0.5));
    sys.t = 3.0;
    assert!(!output_check_phase(&sys, 2.5, 0.5));
}

#[test]
fn write_ascii_appends_one_line_per_particle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sph.txt");
    let sys = ParticleSystem::new(vec![
        Particle { x: NVec3::new(1.5e11, -2.0, 0.0), v: NVec3::new(1.0, 2.0, 3.0), m: 1.0, ..Default::default() },
        Particle { x: NVec3::new(0.0, 0.0, 1.0), m: 1.0, ..Default::default() },
    ]);

    write_ascii(&sys, &path).unwrap();
    write_ascii(&sys, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);

    let fields: Vec<f64> = lines[0].split('\t').map(|f| f.parse().unwrap()).collect();
    assert_eq!(fields.len(), 6);
    assert_relative_eq!(fields[0], 1.5e11, max_relative = 1e-6);
    assert_relative_eq!(fields[5], 3.0, max_relative = 1e-6);
}

#[test]
fn snapshot_writer_dumps_every_interval() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snap.txt");
    let mut scenario = point_scenario(1.0);

    let mut writer = SnapshotWriter::new(&path, 5.0, 10.0);
    scenario.integrate(10.0, |s| writer.heartbeat(s)).unwrap();

    // t = 0, 5 and 10
    assert_eq!(writer.written(), 3);
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);
}
