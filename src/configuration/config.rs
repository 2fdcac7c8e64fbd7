//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – gravity method, integrator, boundary, SPH coupling
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`BoxConfig`]        – computational domain
//! - [`OutputConfig`]     – snapshot file and output cadence
//! - [`ClumpConfig`]      – one polytropic clump of SPH particles
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! A cut-down version of `scenarios/colliding_planets.yaml`:
//!
//! ```yaml
//! engine:
//!   gravity: "tree"         # "tree", "direct" or "none"
//!   integrator: "leapfrog"  # or "verlet"
//!   boundary: "none"        # or "open"
//!   theta: 0.01
//!   sph:
//!     k: 2.6e12
//!
//! parameters:
//!   dt: 1.0
//!   G: 6.674e-8
//!   softening: 0.02
//!   seed: 42
//!
//! sim_box:
//!   boxsize: 1.0e11
//!
//! output:
//!   path: "sph.txt"
//!   interval: 62.83185307179586
//!
//! clumps:
//!   - n: 5000
//!     nbin: 50
//!     total_mass: 1.898e30
//!     k: 2.6e12
//!     radius: 7.9e9
//!     rho_c: 5.0
//!     offset: [ -1.185e10, -3.95e9, 0.0 ]
//!     approach_x: 1.0
//! ```
//!
//! The engine then maps this configuration into its runtime `Scenario`.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SimError};

/// Which integrator method used by the engine
/// `integrator: "leapfrog"` or `integrator: "verlet"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorConfig {
    #[default]
    #[serde(rename = "leapfrog")] // Drift-kick-drift, one force evaluation per step
    Leapfrog,

    #[serde(rename = "verlet")] // Kick-drift-kick velocity Verlet, two force evaluations per step
    Verlet,
}

/// How self-gravity is evaluated
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityConfig {
    #[default]
    #[serde(rename = "tree")] // Barnes–Hut octree
    Tree,

    #[serde(rename = "direct")] // Direct n^2 summation
    Direct,

    #[serde(rename = "none")] // No self-gravity
    None,
}

/// What happens to particles that leave the box
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryConfig {
    #[default]
    #[serde(rename = "none")] // Nothing, particles may leave the box
    None,

    #[serde(rename = "open")] // Particles outside the box are removed
    Open,
}

/// SPH pressure coupling, `P = k * rho^gamma`
#[derive(Deserialize, Debug, Clone)]
pub struct SphConfig {
    pub k: f64, // polytropic constant
    #[serde(default = "default_gamma")]
    pub gamma: f64, // adiabatic index, 2 for an n = 1 polytrope
}

fn default_gamma() -> f64 {
    2.0
}

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub gravity: GravityConfig,
    #[serde(default)]
    pub integrator: IntegratorConfig,
    #[serde(default)]
    pub boundary: BoundaryConfig,
    pub theta: Option<f64>, // Barnes–Hut opening angle
    pub sph: Option<SphConfig>, // `None` - gravity only
}

/// Global numerical and physical parameters for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: Option<f64>, // time end, omitted - run without bound
    pub dt: f64,            // time step size
    pub G: f64,             // gravitational constant
    #[serde(default)]
    pub softening: f64,     // gravitational softening length
    #[serde(default)]
    pub seed: u64,          // deterministic seed to make runs reproducable
}

/// Computational domain: `root_n*` boxes of side `boxsize` along each axis,
/// centred on the origin
#[derive(Deserialize, Debug, Clone)]
pub struct BoxConfig {
    pub boxsize: f64,
    #[serde(default = "default_root")]
    pub root_nx: usize,
    #[serde(default = "default_root")]
    pub root_ny: usize,
    #[serde(default = "default_root")]
    pub root_nz: usize,
}

fn default_root() -> usize {
    1
}

/// Snapshot output settings
#[derive(Deserialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String, // ascii snapshot file, appended to
    pub interval: f64, // simulation time between snapshots
    #[serde(default)]
    pub phase: f64, // output phase, fraction of `interval`
    #[serde(default = "default_timing")]
    pub timing: bool, // log progress with every snapshot
}

fn default_output_path() -> String {
    "sph.txt".to_string()
}

fn default_timing() -> bool {
    true
}

/// One polytropic clump sampled by inverse binning
#[derive(Deserialize, Debug, Clone)]
pub struct ClumpConfig {
    pub n: usize,           // particle cap for this clump
    pub nbin: usize,        // number of radial bins over xi in [0, pi]
    pub total_mass: f64,    // clump mass, shared equally between `n` particles
    pub k: f64,             // polytropic constant, sets the radius scale alpha
    pub radius: f64,        // nominal clump radius R
    pub rho_c: f64,         // central density
    pub smoothing_length: Option<f64>, // defaults to radius / 5
    #[serde(default = "zero_vec")]
    pub offset: Vec<f64>,   // translation of the clump centre
    pub velocity: Option<Vec<f64>>, // explicit bulk velocity
    pub approach_x: Option<f64>, // bulk velocity along x in units of the collision speed
}

fn zero_vec() -> Vec<f64> {
    vec![0.0, 0.0, 0.0]
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub sim_box: Option<BoxConfig>,
    pub output: Option<OutputConfig>,
    pub clumps: Vec<ClumpConfig>,
}

impl ScenarioConfig {
    /// Parse a scenario from any YAML reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a scenario from a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Two Jupiter-mass n = 1 polytropes on a grazing collision course
    pub fn colliding_planets() -> Self {
        let radius = 7.9e9;
        let k = 2.6e12;
        let clump = |sign: f64| ClumpConfig {
            n: 5000,
            nbin: 50,
            total_mass: 1.898e30,
            k,
            radius,
            rho_c: 5.0,
            smoothing_length: Some(radius / 5.0),
            offset: vec![sign * 1.5 * radius, sign * 0.5 * radius, 0.0],
            velocity: None,
            approach_x: Some(-sign),
        };

        ScenarioConfig {
            engine: EngineConfig {
                gravity: GravityConfig::Tree,
                integrator: IntegratorConfig::Leapfrog,
                boundary: BoundaryConfig::None,
                theta: Some(1.0e-4_f64.sqrt()),
                sph: Some(SphConfig { k, gamma: 2.0 }),
            },
            parameters: ParametersConfig {
                t_end: None,
                dt: 1.0,
                G: 6.674e-8,
                softening: 0.02,
                seed: 42,
            },
            sim_box: Some(BoxConfig {
                boxsize: 1.0e11,
                root_nx: 1,
                root_ny: 1,
                root_nz: 1,
            }),
            output: Some(OutputConfig {
                path: default_output_path(),
                interval: 20.0 * PI,
                phase: 0.0,
                timing: true,
            }),
            clumps: vec![clump(-1.0), clump(1.0)],
        }
    }

    /// Reject values the engine can't run with
    pub fn validate(&self) -> Result<()> {
        let p = &self.parameters;
        if !(p.dt > 0.0) {
            return Err(invalid(format!("dt must be positive, got {}", p.dt)));
        }
        if !(p.G > 0.0) {
            return Err(invalid(format!("G must be positive, got {}", p.G)));
        }
        if p.softening < 0.0 {
            return Err(invalid(format!("softening must be non-negative, got {}", p.softening)));
        }
        if let Some(t_end) = p.t_end {
            if t_end.is_nan() || t_end < 0.0 {
                return Err(invalid(format!("t_end must be non-negative, got {t_end}")));
            }
        }

        if let Some(theta) = self.engine.theta {
            if !(theta >= 0.0) {
                return Err(invalid(format!("theta must be non-negative, got {theta}")));
            }
        }
        if let Some(sph) = &self.engine.sph {
            if !(sph.k > 0.0) || !(sph.gamma > 0.0) {
                return Err(invalid("sph k and gamma must be positive".to_string()));
            }
        }

        if let Some(b) = &self.sim_box {
            if !(b.boxsize > 0.0) || b.root_nx == 0 || b.root_ny == 0 || b.root_nz == 0 {
                return Err(invalid("sim_box needs a positive boxsize and root counts".to_string()));
            }
        }

        if let Some(o) = &self.output {
            if !(o.interval > 0.0) {
                return Err(invalid(format!("output interval must be positive, got {}", o.interval)));
            }
        }

        for (i, c) in self.clumps.iter().enumerate() {
            if c.n == 0 || c.nbin == 0 {
                return Err(invalid(format!("clump {i}: n and nbin must be non-zero")));
            }
            if !(c.total_mass > 0.0) || !(c.k > 0.0) || !(c.radius > 0.0) {
                return Err(invalid(format!("clump {i}: total_mass, k and radius must be positive")));
            }
            if c.rho_c < 0.0 {
                return Err(invalid(format!("clump {i}: rho_c must be non-negative")));
            }
            if let Some(h) = c.smoothing_length {
                if !(h > 0.0) {
                    return Err(invalid(format!("clump {i}: smoothing_length must be positive")));
                }
            }
            if c.offset.len() != 3 {
                return Err(invalid(format!("clump {i}: offset needs 3 components")));
            }
            if let Some(v) = &c.velocity {
                if v.len() != 3 {
                    return Err(invalid(format!("clump {i}: velocity needs 3 components")));
                }
            }
        }
        Ok(())
    }
}

fn invalid(msg: String) -> SimError {
    SimError::Config(msg)
}
