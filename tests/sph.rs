use std::f64::consts::PI;

use clumpsim::simulation::forces::{Acceleration, SphPressure};
use clumpsim::simulation::sph::{compute_densities, kernel, kernel_derivative, neighbor_grid, pressure};
use clumpsim::simulation::states::{NVec3, Particle, ParticleSystem};

use approx::assert_relative_eq;

fn gas_particle(x: NVec3) -> Particle {
    Particle {
        x,
        m: 1.0,
        h: 1.0,
        ..Default::default()
    }
}

#[test]
fn kernel_is_normalized() {
    let h = 0.7;
    let steps = 20_000;
    let dr = 2.0 * h / steps as f64;
    let integral: f64 = (0..steps)
        .map(|i| {
            let r = (i as f64 + 0.5) * dr;
            4.0 * PI * r * r * kernel(r, h) * dr
        })
        .sum();
    assert_relative_eq!(integral, 1.0, max_relative = 1e-4);
}

#[test]
fn kernel_has_compact_support() {
    assert_eq!(kernel(2.0, 1.0), 0.0);
    assert_eq!(kernel(3.5, 1.0), 0.0);
    assert_eq!(kernel_derivative(2.5, 1.0), 0.0);
    assert!(kernel(1.999, 1.0) > 0.0);
}

#[test]
fn kernel_derivative_matches_finite_difference() {
    let h = 1.3;
    for r in [0.1, 0.5, 1.0, 1.4, 2.2] {
        let d = 1e-6;
        let fd = (kernel(r + d, h) - kernel(r - d, h)) / (2.0 * d);
        assert_relative_eq!(kernel_derivative(r, h), fd, max_relative = 1e-5, epsilon = 1e-9);
    }
}

#[test]
fn isolated_particle_density_is_self_term() {
    let sys = ParticleSystem::new(vec![gas_particle(NVec3::zeros()), gas_particle(NVec3::new(10.0, 0.0, 0.0))]);
    let grid = neighbor_grid(&sys).unwrap();
    let rho = compute_densities(&sys, &grid);
    assert_relative_eq!(rho[0], 1.0 / PI, max_relative = 1e-12);
    assert_relative_eq!(rho[1], 1.0 / PI, max_relative = 1e-12);
}

#[test]
fn update_state_sets_density_and_pressure() {
    let mut sys = ParticleSystem::new(vec![gas_particle(NVec3::zeros()), gas_particle(NVec3::new(0.5, 0.0, 0.0))]);
    let term = SphPressure { k: 3.0, gamma: 2.0 };
    term.update_state(&mut sys);

    let expected = 1.0 / PI + kernel(0.5, 1.0);
    for p in &sys.particles {
        assert_relative_eq!(p.rho, expected, max_relative = 1e-12);
        assert_relative_eq!(p.p, pressure(3.0, 2.0, expected), max_relative = 1e-12);
    }
}

#[test]
fn pressure_pushes_pair_apart_symmetrically() {
    let mut sys = ParticleSystem::new(vec![gas_particle(NVec3::zeros()), gas_particle(NVec3::new(0.8, 0.3, 0.0))]);
    let term = SphPressure { k: 1.0, gamma: 2.0 };
    term.update_state(&mut sys);

    let mut acc = vec![NVec3::zeros(); 2];
    term.acceleration(0.0, &sys, &mut acc);

    let sep = sys.particles[0].x - sys.particles[1].x;
    assert!(acc[0].dot(&sep) > 0.0, "pressure should repel");
    assert!((acc[0] + acc[1]).norm() < 1e-12 * acc[0].norm());
}

#[test]
fn no_smoothing_length_means_no_pressure_force() {
    let mut sys = ParticleSystem::new(vec![
        Particle { m: 1.0, rho: 2.0, ..Default::default() },
        Particle { x: NVec3::new(0.1, 0.0, 0.0), m: 1.0, rho: 2.0, ..Default::default() },
    ]);
    let term = SphPressure { k: 1.0, gamma: 2.0 };
    term.update_state(&mut sys);
    assert_eq!(sys.particles[0].rho, 2.0);

    let mut acc = vec![NVec3::zeros(); 2];
    term.acceleration(0.0, &sys, &mut acc);
    assert_eq!(acc[0], NVec3::zeros());
}
