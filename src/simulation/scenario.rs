//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! `Scenario` containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`ParticleSystem` with sampled clumps at t = 0, COM frame)
//! - active force set (`AccelSet`)
//! - the computational box and output settings

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::configuration::config::{GravityConfig, OutputConfig, ScenarioConfig};
use crate::error::Result;
use crate::simulation::boundary::SimBox;
use crate::simulation::engine::{Engine, DEFAULT_THETA};
use crate::simulation::forces::{AccelSet, NewtonianGravity, NewtonianGravityBarnesHut, SphPressure};
use crate::simulation::params::Parameters;
use crate::simulation::sampling::sample_clump;
use crate::simulation::states::{Particle, ParticleSystem};

/// The simulation context: settings, state and force terms in one place
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: ParticleSystem,
    pub forces: AccelSet,
    pub sim_box: Option<SimBox>,
    pub output: Option<OutputConfig>,
}

impl Scenario {
    /// Empty scenario; particles are added with [`Scenario::add`]
    pub fn new(engine: Engine, parameters: Parameters) -> Self {
        let forces = build_forces(&engine, &parameters);
        Self {
            engine,
            parameters,
            system: ParticleSystem::default(),
            forces,
            sim_box: None,
            output: None,
        }
    }

    /// Set the computational domain
    pub fn configure_box(&mut self, boxsize: f64, root_nx: usize, root_ny: usize, root_nz: usize) {
        self.sim_box = Some(SimBox::new(boxsize, root_nx, root_ny, root_nz));
    }

    /// Add one particle to the system
    pub fn add(&mut self, particle: Particle) {
        self.system.particles.push(particle);
    }

    /// Validate `cfg`, sample every clump and shift into the centre-of-momentum frame
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        cfg.validate()?;

        let p_cfg = &cfg.parameters;
        let parameters = Parameters {
            t_end: p_cfg.t_end,
            dt: p_cfg.dt,
            G: p_cfg.G,
            softening: p_cfg.softening,
            seed: p_cfg.seed,
        };

        let e_cfg = &cfg.engine;
        let engine = Engine {
            gravity: e_cfg.gravity,
            integrator: e_cfg.integrator,
            boundary: e_cfg.boundary,
            theta: e_cfg.theta.unwrap_or(DEFAULT_THETA),
            sph: e_cfg.sph.clone(),
        };

        let mut scenario = Scenario::new(engine, parameters);
        if let Some(b) = &cfg.sim_box {
            scenario.configure_box(b.boxsize, b.root_nx, b.root_ny, b.root_nz);
        }
        scenario.output = cfg.output.clone();

        let mut rng = ChaCha8Rng::seed_from_u64(scenario.parameters.seed);
        for (i, clump) in cfg.clumps.iter().enumerate() {
            let particles = sample_clump(clump, scenario.parameters.G, &mut rng);
            debug!("clump {i}: sampled {} of {} particles", particles.len(), clump.n);
            for p in particles {
                scenario.add(p);
            }
        }

        scenario.move_to_com();
        info!(
            "built scenario: {} particles in {} clump(s), gravity {:?}, integrator {:?}, sph {}",
            scenario.system.len(),
            cfg.clumps.len(),
            scenario.engine.gravity,
            scenario.engine.integrator,
            scenario.engine.sph.is_some(),
        );
        Ok(scenario)
    }
}

/// Register the force terms the engine settings ask for
pub fn build_forces(engine: &Engine, parameters: &Parameters) -> AccelSet {
    let mut forces = AccelSet::new();
    match engine.gravity {
        GravityConfig::Tree => {
            forces = forces.with(NewtonianGravityBarnesHut {
                G: parameters.G,
                eps2: parameters.eps2(),
                theta: engine.theta,
            });
        }
        GravityConfig::Direct => {
            forces = forces.with(NewtonianGravity {
                G: parameters.G,
                eps2: parameters.eps2(),
            });
        }
        GravityConfig::None => {}
    }
    if let Some(sph) = &engine.sph {
        forces = forces.with(SphPressure {
            k: sph.k,
            gamma: sph.gamma,
        });
    }
    forces
}
