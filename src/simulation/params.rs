//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size and (optional) end time,
//! - gravitational constant and softening length,
//! - random seed used to sample the initial clumps

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_end: Option<f64>, // time end, `None` integrates without bound
    pub dt: f64, // step size
    pub G: f64, // gravitational constant
    pub softening: f64, // gravitational softening length
    pub seed: u64, // deterministic seed
}

impl Parameters {
    /// Softening squared, the term added to |r|^2 in the force law
    pub fn eps2(&self) -> f64 {
        self.softening * self.softening
    }
}
