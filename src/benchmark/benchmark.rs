use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::configuration::config::{ScenarioConfig, SphConfig};
use crate::simulation::forces::{AccelSet, Acceleration, NewtonianGravity, NewtonianGravityBarnesHut, SphPressure};
use crate::simulation::integrator::leapfrog;
use crate::simulation::params::Parameters;
use crate::simulation::sampling::sample_clump;
use crate::simulation::states::{NVec3, ParticleSystem};

/// One clump of the default scenario resampled with `n` particles
fn make_clump(n: usize) -> (ParticleSystem, Parameters, SphConfig) {
    let cfg = ScenarioConfig::colliding_planets();
    let mut clump = cfg.clumps[0].clone();
    clump.n = n;

    let mut rng = ChaCha8Rng::seed_from_u64(cfg.parameters.seed);
    let particles = sample_clump(&clump, cfg.parameters.G, &mut rng);

    let params = Parameters {
        t_end: None,
        dt: cfg.parameters.dt,
        G: cfg.parameters.G,
        softening: cfg.parameters.softening,
        seed: cfg.parameters.seed,
    };
    let sph = SphConfig { k: clump.k, gamma: 2.0 };
    (ParticleSystem::new(particles), params, sph)
}

/// Time one acceleration evaluation: direct sum vs Barnes–Hut vs SPH pressure
pub fn bench_gravity() {
    let ns = [200, 400, 800, 1600, 3200, 6400];

    println!("N,direct_s,bh_s,sph_s");
    for n in ns {
        let (mut sys, params, sph) = make_clump(n);
        let mut out = vec![NVec3::zeros(); sys.len()];

        let direct = NewtonianGravity { G: params.G, eps2: params.eps2() };
        let bh = NewtonianGravityBarnesHut { G: params.G, eps2: params.eps2(), theta: 0.7 };
        let pressure = SphPressure { k: sph.k, gamma: sph.gamma };
        pressure.update_state(&mut sys);

        // Warm up
        direct.acceleration(0.0, &sys, &mut out);
        bh.acceleration(0.0, &sys, &mut out);

        let t0 = Instant::now();
        direct.acceleration(0.0, &sys, &mut out);
        let dt_direct = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        bh.acceleration(0.0, &sys, &mut out);
        let dt_bh = t1.elapsed().as_secs_f64();

        let t2 = Instant::now();
        pressure.acceleration(0.0, &sys, &mut out);
        let dt_sph = t2.elapsed().as_secs_f64();

        println!("{n},{dt_direct:.6},{dt_bh:.6},{dt_sph:.6}");
    }
}

/// Time full leapfrog steps with tree gravity + SPH for a range of n
pub fn bench_leapfrog() {
    let steps = 2;

    println!("N,step_ms");
    for n in (500..=5000).step_by(500) {
        let (mut sys, params, sph) = make_clump(n);
        let forces = AccelSet::new()
            .with(NewtonianGravityBarnesHut { G: params.G, eps2: params.eps2(), theta: 0.7 })
            .with(SphPressure { k: sph.k, gamma: sph.gamma });

        // Warm-up one step
        leapfrog(&mut sys, &forces, &params);

        let t0 = Instant::now();
        for _ in 0..steps {
            leapfrog(&mut sys, &forces, &params);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{n},{ms:.6}");
    }
}
