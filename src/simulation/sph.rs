//! Smoothed-particle hydrodynamics helpers
//!
//! Cubic-spline (M4) kernel with compact support `2h`, a uniform-grid
//! neighbor search and the density / pressure passes used by
//! [`crate::simulation::forces::SphPressure`].

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::simulation::states::{NVec3, ParticleSystem};

/// Kernel support in units of the smoothing length
pub const SUPPORT: f64 = 2.0;

/// Cubic spline kernel W(r, h) in 3D, normalized so its volume integral is 1
pub fn kernel(r: f64, h: f64) -> f64 {
    let q = r / h;
    let sigma = 1.0 / (PI * h * h * h);
    if q < 1.0 {
        sigma * (1.0 - 1.5 * q * q + 0.75 * q * q * q)
    } else if q < 2.0 {
        let t = 2.0 - q;
        sigma * 0.25 * t * t * t
    } else {
        0.0
    }
}

/// dW/dr for the cubic spline kernel
pub fn kernel_derivative(r: f64, h: f64) -> f64 {
    let q = r / h;
    let sigma = 1.0 / (PI * h * h * h * h);
    if q < 1.0 {
        sigma * (-3.0 * q + 2.25 * q * q)
    } else if q < 2.0 {
        let t = 2.0 - q;
        sigma * (-0.75 * t * t)
    } else {
        0.0
    }
}

/// Gradient of W with respect to x_i, where `r_ij = x_i - x_j`
pub fn kernel_gradient(r_ij: &NVec3, h: f64) -> NVec3 {
    let r = r_ij.norm();
    if r == 0.0 {
        return NVec3::zeros();
    }
    r_ij * (kernel_derivative(r, h) / r)
}

/// Polytropic equation of state, `P = k rho^gamma`
pub fn pressure(k: f64, gamma: f64, rho: f64) -> f64 {
    k * rho.powf(gamma)
}

/// Uniform grid of cubic cells used to find particles within kernel support
pub struct NeighborGrid {
    cell_size: f64,
    cells: HashMap<[i64; 3], Vec<usize>>,
}

impl NeighborGrid {
    /// Bin every particle of `sys` into cells of side `cell_size`
    pub fn build(sys: &ParticleSystem, cell_size: f64) -> Self {
        let mut grid = NeighborGrid {
            cell_size,
            cells: HashMap::new(),
        };
        for (i, p) in sys.particles.iter().enumerate() {
            let key = grid.cell_of(&p.x);
            grid.cells.entry(key).or_default().push(i);
        }
        grid
    }

    fn cell_of(&self, x: &NVec3) -> [i64; 3] {
        [
            (x.x / self.cell_size).floor() as i64,
            (x.y / self.cell_size).floor() as i64,
            (x.z / self.cell_size).floor() as i64,
        ]
    }

    /// Candidate neighbors of position `x`: everything in the 27 surrounding cells
    pub fn candidates(&self, x: &NVec3) -> Vec<usize> {
        let [cx, cy, cz] = self.cell_of(x);
        let mut out = Vec::new();
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if let Some(cell) = self.cells.get(&[cx + dx, cy + dy, cz + dz]) {
                        out.extend_from_slice(cell);
                    }
                }
            }
        }
        out
    }
}

/// Largest smoothing length in the system, 0 if empty
pub fn max_smoothing_length(sys: &ParticleSystem) -> f64 {
    sys.particles.iter().fold(0.0_f64, |acc, p| acc.max(p.h))
}

/// Build a grid sized so every pair within kernel support shares or touches a cell.
/// `None` when no particle has a positive smoothing length.
pub fn neighbor_grid(sys: &ParticleSystem) -> Option<NeighborGrid> {
    let hmax = max_smoothing_length(sys);
    if hmax > 0.0 {
        Some(NeighborGrid::build(sys, SUPPORT * hmax))
    } else {
        None
    }
}

/// Summation density, `rho_i = sum_j m_j W(|x_i - x_j|, h_ij)` including the self term
pub fn compute_densities(sys: &ParticleSystem, grid: &NeighborGrid) -> Vec<f64> {
    sys.particles
        .iter()
        .map(|pi| {
            if pi.h <= 0.0 {
                return pi.rho;
            }
            grid.candidates(&pi.x)
                .into_iter()
                .map(|j| {
                    let pj = &sys.particles[j];
                    let h_ij = 0.5 * (pi.h + pj.h);
                    pj.m * kernel((pi.x - pj.x).norm(), h_ij)
                })
                .sum::<f64>()
        })
        .collect()
}

/// Refresh density and pressure of every particle in place
pub fn update_density_and_pressure(sys: &mut ParticleSystem, k: f64, gamma: f64) {
    let Some(grid) = neighbor_grid(sys) else {
        return;
    };
    let rho = compute_densities(sys, &grid);
    for (p, rho) in sys.particles.iter_mut().zip(rho) {
        p.rho = rho;
        p.p = pressure(k, gamma, rho);
    }
}

/// Symmetric pressure acceleration,
/// `a_i = -sum_j m_j (P_i/rho_i^2 + P_j/rho_j^2) grad_i W(r_ij, h_ij)`,
/// added into `out`
pub fn pressure_accelerations(sys: &ParticleSystem, grid: &NeighborGrid, out: &mut [NVec3]) {
    for (i, pi) in sys.particles.iter().enumerate() {
        if pi.rho <= 0.0 {
            continue;
        }
        let term_i = pi.p / (pi.rho * pi.rho);
        let mut acc = NVec3::zeros();

        for j in grid.candidates(&pi.x) {
            if j == i {
                continue;
            }
            let pj = &sys.particles[j];
            if pj.rho <= 0.0 {
                continue;
            }
            let h_ij = 0.5 * (pi.h + pj.h);
            if h_ij <= 0.0 {
                continue;
            }
            let r_ij = pi.x - pj.x;
            let term_j = pj.p / (pj.rho * pj.rho);
            acc -= kernel_gradient(&r_ij, h_ij) * (pj.m * (term_i + term_j));
        }

        out[i] += acc;
    }
}
