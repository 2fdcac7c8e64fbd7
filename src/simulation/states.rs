//! Core state types for the SPH + gravity simulation.
//!
//! Defines the particle and system structs:
//! - `Particle` carries kinematics plus the SPH fields (density, smoothing length, pressure)
//! - `ParticleSystem` holds the list of particles and the current simulation time `t`

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass
    pub rho: f64, // density
    pub h: f64, // smoothing length
    pub p: f64, // pressure
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            x: NVec3::zeros(),
            v: NVec3::zeros(),
            m: 0.0,
            rho: 0.0,
            h: 0.0,
            p: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>, // collection of particles
    pub t: f64, // time
    pub dt_last_done: f64, // length of the last completed step
}

impl ParticleSystem {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self {
            particles,
            t: 0.0,
            dt_last_done: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Total mass of all particles
    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(|p| p.m).sum()
    }

    /// Total linear momentum, sum of m_i v_i
    pub fn momentum(&self) -> NVec3 {
        self.particles
            .iter()
            .fold(NVec3::zeros(), |acc, p| acc + p.v * p.m)
    }

    /// Mass-weighted centre of position and velocity.
    /// Returns zeros for an empty or massless system.
    pub fn center_of_mass(&self) -> (NVec3, NVec3) {
        let mut x = NVec3::zeros();
        let mut v = NVec3::zeros();
        let mut m = 0.0;
        for p in &self.particles {
            x += p.x * p.m;
            v += p.v * p.m;
            m += p.m;
        }
        if m > 0.0 {
            x /= m;
            v /= m;
        }
        (x, v)
    }

    /// Kinetic energy, sum of 1/2 m v^2
    pub fn kinetic_energy(&self) -> f64 {
        self.particles
            .iter()
            .map(|p| 0.5 * p.m * p.v.norm_squared())
            .sum()
    }
}
