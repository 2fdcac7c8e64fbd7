//! Monte Carlo sampling of polytropic clumps
//!
//! An n = 1 polytrope has the closed-form Lane–Emden solution
//! `rho(xi) = rho_c * sin(xi) / xi` with `r = alpha * xi`,
//! `alpha = sqrt(K / (2 pi G))` and surface at `xi = pi`.
//! The enclosed mass grows like `sin(xi) - xi cos(xi)`, which lets us
//! split `[0, pi]` into bins and hand each bin its share of particles
//! analytically, then draw positions uniformly inside each bin.

use std::f64::consts::PI;

use rand::Rng;

use crate::configuration::config::ClumpConfig;
use crate::simulation::states::{NVec3, Particle};

/// Radial profile of an n = 1 polytrope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolytropeProfile {
    pub alpha: f64, // length scale, r = alpha * xi
    pub rho_c: f64, // central density
    pub k: f64, // polytropic constant, P = k rho^2
}

impl PolytropeProfile {
    #[allow(non_snake_case)]
    pub fn new(k: f64, rho_c: f64, G: f64) -> Self {
        Self {
            alpha: (k / 2.0 / PI / G).sqrt(),
            rho_c,
            k,
        }
    }

    /// Outer radius, where the density first drops to zero
    pub fn outer_radius(&self) -> f64 {
        self.alpha * PI
    }

    /// Density at dimensionless radius `xi`
    pub fn density(&self, xi: f64) -> f64 {
        if xi == 0.0 {
            return self.rho_c;
        }
        xi.sin() / xi * self.rho_c
    }

    /// Pressure from the n = 1 equation of state
    pub fn pressure(&self, rho: f64) -> f64 {
        self.k * rho * rho
    }
}

/// Enclosed-mass primitive, `integral_0^xi x sin(x) dx`
fn enclosed(xi: f64) -> f64 {
    xi.sin() - xi * xi.cos()
}

/// Number of the `n_total` particles that fall between `xi1` and `xi2`
pub fn bin_count(xi1: f64, xi2: f64, n_total: usize) -> usize {
    let frac = (enclosed(xi2) - enclosed(xi1)) / PI;
    (frac * n_total as f64).round().max(0.0) as usize
}

/// Per-bin particle counts for `n_bin` equal-width bins over `[0, pi]`
pub fn bin_counts(n_total: usize, n_bin: usize) -> Vec<usize> {
    if n_bin == 0 {
        return Vec::new();
    }
    let dxi = PI / n_bin as f64;
    (0..n_bin)
        .map(|i| bin_count(dxi * i as f64, dxi * (i + 1) as f64, n_total))
        .collect()
}

/// Speed at which two clumps of mass `m` and radius `r` are sent at each other
#[allow(non_snake_case)]
pub fn collision_speed(G: f64, m: f64, r: f64) -> f64 {
    0.5 * (2.0 * G * m / 3.0 / r).sqrt()
}

/// Bulk velocity for a clump: explicit velocity wins, otherwise
/// `approach_x` times the collision speed along x, otherwise at rest
#[allow(non_snake_case)]
pub fn bulk_velocity(clump: &ClumpConfig, G: f64) -> NVec3 {
    if let Some(v) = &clump.velocity {
        return NVec3::new(v[0], v[1], v[2]);
    }
    match clump.approach_x {
        Some(s) => NVec3::new(s * collision_speed(G, clump.total_mass, clump.radius), 0.0, 0.0),
        None => NVec3::zeros(),
    }
}

/// Draw up to `clump.n` SPH particles following the polytrope profile,
/// translated by `clump.offset` and moving with the clump's bulk velocity
#[allow(non_snake_case)]
pub fn sample_clump<R: Rng>(clump: &ClumpConfig, G: f64, rng: &mut R) -> Vec<Particle> {
    let profile = PolytropeProfile::new(clump.k, clump.rho_c, G);
    let offset = NVec3::new(clump.offset[0], clump.offset[1], clump.offset[2]);
    let v = bulk_velocity(clump, G);
    let m = clump.total_mass / clump.n as f64;
    let h = clump.smoothing_length.unwrap_or(clump.radius / 5.0);

    let dxi = PI / clump.nbin as f64;
    let mut particles = Vec::with_capacity(clump.n);

    'bins: for i in 0..clump.nbin {
        let xi1 = dxi * i as f64;
        let xi2 = dxi * (i + 1) as f64;
        let n_in_bin = bin_count(xi1, xi2, clump.n);

        for _ in 0..n_in_bin {
            if particles.len() >= clump.n {
                break 'bins;
            }
            let phi = rng.gen_range(0.0..2.0 * PI);
            let cos_theta: f64 = rng.gen_range(-1.0..1.0);
            let xi = rng.gen_range(xi1..xi2);

            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
            let r = profile.alpha * xi;
            let x = NVec3::new(
                r * sin_theta * phi.cos(),
                r * sin_theta * phi.sin(),
                r * cos_theta,
            ) + offset;

            let rho = profile.density(xi);
            particles.push(Particle {
                x,
                v,
                m,
                rho,
                h,
                p: profile.pressure(rho),
            });
        }
    }

    particles
}
