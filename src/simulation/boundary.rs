//! Computational domain and boundary handling

use log::warn;

use crate::configuration::config::{BoundaryConfig, BoxConfig};
use crate::simulation::states::{NVec3, ParticleSystem};

/// Axis-aligned box centred on the origin, made of `root_n*` cubes of side `boxsize`
#[derive(Debug, Clone, PartialEq)]
pub struct SimBox {
    pub boxsize: f64,
    pub root_nx: usize,
    pub root_ny: usize,
    pub root_nz: usize,
}

impl SimBox {
    pub fn new(boxsize: f64, root_nx: usize, root_ny: usize, root_nz: usize) -> Self {
        Self {
            boxsize,
            root_nx,
            root_ny,
            root_nz,
        }
    }

    /// Full extent of the box along each axis
    pub fn size(&self) -> NVec3 {
        NVec3::new(
            self.boxsize * self.root_nx as f64,
            self.boxsize * self.root_ny as f64,
            self.boxsize * self.root_nz as f64,
        )
    }

    pub fn contains(&self, x: &NVec3) -> bool {
        let half = self.size() * 0.5;
        x.x.abs() <= half.x && x.y.abs() <= half.y && x.z.abs() <= half.z
    }
}

impl From<&BoxConfig> for SimBox {
    fn from(cfg: &BoxConfig) -> Self {
        SimBox::new(cfg.boxsize, cfg.root_nx, cfg.root_ny, cfg.root_nz)
    }
}

/// Apply the boundary condition to `sys`, returning how many particles were removed
pub fn apply_boundary(sys: &mut ParticleSystem, sim_box: &SimBox, boundary: BoundaryConfig) -> usize {
    match boundary {
        BoundaryConfig::None => 0,
        BoundaryConfig::Open => {
            let before = sys.particles.len();
            sys.particles.retain(|p| sim_box.contains(&p.x));
            let removed = before - sys.particles.len();
            if removed > 0 {
                warn!(
                    "t = {:e}: removed {} particle(s) outside the box, {} left",
                    sys.t,
                    removed,
                    sys.particles.len()
                );
            }
            removed
        }
    }
}
