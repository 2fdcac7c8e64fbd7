pub mod simulation;
pub mod configuration;
pub mod output;
pub mod benchmark;
pub mod error;

pub use simulation::states::{Particle, ParticleSystem, NVec3};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity, NewtonianGravityBarnesHut, SphPressure};
pub use simulation::integrator::{leapfrog, velocity_verlet};
pub use simulation::scenario::Scenario;
pub use simulation::run::Control;
pub use simulation::sampling::{bin_counts, sample_clump, PolytropeProfile};

pub use configuration::config::{
    BoundaryConfig, BoxConfig, ClumpConfig, EngineConfig, GravityConfig, IntegratorConfig,
    OutputConfig, ParametersConfig, ScenarioConfig, SphConfig,
};

pub use output::{ascii::write_ascii, check::{output_check, output_check_phase}, snapshot::SnapshotWriter, timing::OutputTimer};

pub use error::SimError;

pub use benchmark::benchmark::{bench_gravity, bench_leapfrog};
