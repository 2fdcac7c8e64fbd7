//! Fixed-step time integrators for the particle system
//!
//! Provides a single-force-evaluation leapfrog (drift-kick-drift) and a
//! velocity Verlet (kick-drift-kick), both driven by `AccelSet` and
//! `Parameters`

use super::forces::AccelSet;
use super::params::Parameters;
use super::states::{NVec3, ParticleSystem};
use crate::configuration::config::IntegratorConfig;

/// Advance the system by one step with the configured method
pub fn step(method: IntegratorConfig, sys: &mut ParticleSystem, forces: &AccelSet, params: &Parameters) {
    match method {
        IntegratorConfig::Leapfrog => leapfrog(sys, forces, params),
        IntegratorConfig::Verlet => velocity_verlet(sys, forces, params),
    }
}

/// Advance the system by one step using a single-force-eval leapfrog.
/// Updates positions, velocities and `sys.t` in-place with fixed step `dt = params.dt`.
pub fn leapfrog(sys: &mut ParticleSystem, forces: &AccelSet, params: &Parameters) {
    let dt = params.dt; // time step dt
    let half_dt = 0.5 * dt; // half step dt/2

    // Drift: x_half = x_n + (dt/2) * v_n
    for p in sys.particles.iter_mut() {
        p.x += half_dt * p.v;
    }

    // a_mid from x_half at t_n + dt/2
    let t_mid = sys.t + half_dt;
    let mut a_mid = vec![NVec3::zeros(); sys.particles.len()];
    forces.update_state(sys);
    forces.accumulate_accels(t_mid, &*sys, &mut a_mid);

    // Kick: v_n+1 = v_n + dt * a_mid
    for (p, a) in sys.particles.iter_mut().zip(a_mid.iter()) {
        p.v += dt * *a;
    }

    // Second drift: x_n+1 = x_half + dt/2 * v_n+1
    for p in sys.particles.iter_mut() {
        p.x += half_dt * p.v;
    }

    sys.t += dt;
    sys.dt_last_done = dt;
}

/// Advance the system by one time step using velocity–Verlet.
/// Uses two force evaluations per step and updates positions, velocities,
/// and `sys.t` in-place with fixed step `dt = params.dt`.
pub fn velocity_verlet(sys: &mut ParticleSystem, forces: &AccelSet, params: &Parameters) {
    let n = sys.particles.len();
    let dt = params.dt;
    let half_dt = 0.5 * dt;

    // a_n from x_n at time t_n
    let mut a_old = vec![NVec3::zeros(); n];
    forces.update_state(sys);
    forces.accumulate_accels(sys.t, &*sys, &mut a_old);

    // Kick: v_n+1/2 = v_n + (1/2 * dt) * a_n
    for (p, a) in sys.particles.iter_mut().zip(a_old.iter()) {
        p.v += half_dt * *a;
    }

    // Drift: x_n+1 = x_n + dt v_n+1/2
    for p in sys.particles.iter_mut() {
        p.x += dt * p.v;
    }

    sys.t += dt;

    // a_n+1 from x_n+1 at time t_n+1
    let mut a_new = vec![NVec3::zeros(); n];
    forces.update_state(sys);
    forces.accumulate_accels(sys.t, &*sys, &mut a_new);

    // Second kick: v_n+1 = v_half + (dt/2) * a_n+1
    for (p, a) in sys.particles.iter_mut().zip(a_new.iter()) {
        p.v += half_dt * *a;
    }

    sys.dt_last_done = dt;
}
