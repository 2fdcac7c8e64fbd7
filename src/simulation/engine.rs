//! High-level runtime engine settings
//!
//! Selects gravity method, integrator, boundary handling, Barnes–Hut
//! opening angle and the optional SPH coupling used when building and
//! running a `Scenario`

use crate::configuration::config::{BoundaryConfig, GravityConfig, IntegratorConfig, SphConfig};

/// Opening angle used when a scenario doesn't set one
pub const DEFAULT_THETA: f64 = 0.7;

#[derive(Debug, Clone)]
pub struct Engine {
    pub gravity: GravityConfig, // tree, direct or none
    pub integrator: IntegratorConfig, // leapfrog or verlet
    pub boundary: BoundaryConfig, // none or open
    pub theta: f64, // parameter to determine if use center of mass
    pub sph: Option<SphConfig>, // pressure coupling, `None` for pure gravity
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            gravity: GravityConfig::Tree,
            integrator: IntegratorConfig::Leapfrog,
            boundary: BoundaryConfig::None,
            theta: DEFAULT_THETA,
            sph: None,
        }
    }
}
