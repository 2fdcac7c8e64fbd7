pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod scenario;
pub mod barnes_hut;
pub mod sph;
pub mod sampling;
pub mod boundary;
pub mod run;
