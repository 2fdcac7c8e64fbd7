//! Force / acceleration contributors for the engine
//!
//! Defines the acceleration trait plus direct Newtonian gravity, a
//! Barnes–Hut variant and the SPH pressure term

use crate::simulation::barnes_hut::{Octree, TreeWalk};
use crate::simulation::sph;
use crate::simulation::states::{NVec3, ParticleSystem};

/// Collection of acceleration terms (gravity, pressure, ...)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per particle
#[derive(Default)]
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Let every term refresh per-particle state that depends on positions
    /// (density, pressure) before accelerations are evaluated
    pub fn update_state(&self, sys: &mut ParticleSystem) {
        for term in &self.terms {
            term.update_state(sys);
        }
    }

    /// Compute total accelerations at time `t` for all particles in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, t: f64, sys: &ParticleSystem, out: &mut [NVec3]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        for term in &self.terms {
            term.acceleration(t, sys, out);
        }
    }
}

/// Acceleration source operating on a [`ParticleSystem`].
/// Implementations add their contribution into `out[i]` for each particle
pub trait Acceleration {
    fn acceleration(&self, t: f64, sys: &ParticleSystem, out: &mut [NVec3]);

    /// Update particle fields the term depends on. Most terms need nothing.
    fn update_state(&self, _sys: &mut ParticleSystem) {}
}

/// Newtonian gravity with Plummer softening (direct n^2 sum)
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitional constant
    pub eps2: f64, // softening squared
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, _t: f64, sys: &ParticleSystem, out: &mut [NVec3]) {
        let n = sys.particles.len();

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            let pi = &sys.particles[i];
            for j in (i + 1)..n {
                let pj = &sys.particles[j];

                // r points from i to j, i is pulled along +r and j along -r
                let r = pj.x - pi.x;
                let d2 = r.dot(&r) + self.eps2;
                if d2 == 0.0 {
                    continue;
                }

                // coef = G / |r_soft|^3
                let inv_r = d2.sqrt().recip();
                let coef = self.G * inv_r * inv_r * inv_r;

                out[i] += coef * pj.m * r;
                out[j] -= coef * pi.m * r;
            }
        }
    }
}

/// Newtonian gravity evaluated via a Barnes–Hut octree
/// Approximate O(N log N) accelerations controlled by `theta` (opening angle)
/// and `eps2` (softening)
#[allow(non_snake_case)]
pub struct NewtonianGravityBarnesHut {
    pub G: f64,
    pub eps2: f64,
    pub theta: f64,
}

impl Acceleration for NewtonianGravityBarnesHut {
    fn acceleration(&self, _t: f64, sys: &ParticleSystem, out: &mut [NVec3]) {
        if sys.particles.is_empty() {
            return;
        }
        let tree = Octree::build(sys);
        let walk = TreeWalk {
            G: self.G,
            eps2: self.eps2,
            theta: self.theta,
        };
        for (i, a) in out.iter_mut().enumerate().take(sys.particles.len()) {
            *a += tree.acceleration_on(i, sys, &walk);
        }
    }
}

/// SPH pressure force with a polytropic equation of state `P = k rho^gamma`.
/// Density is recomputed by kernel summation in [`Acceleration::update_state`]
pub struct SphPressure {
    pub k: f64,
    pub gamma: f64,
}

impl Acceleration for SphPressure {
    fn acceleration(&self, _t: f64, sys: &ParticleSystem, out: &mut [NVec3]) {
        if let Some(grid) = sph::neighbor_grid(sys) {
            sph::pressure_accelerations(sys, &grid, out);
        }
    }

    fn update_state(&self, sys: &mut ParticleSystem) {
        sph::update_density_and_pressure(sys, self.k, self.gamma);
    }
}
