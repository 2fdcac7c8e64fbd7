//! Driving a `Scenario` forward in time
//!
//! `integrate` runs fixed steps until the target time, calling a heartbeat
//! before the first step and after every step. The heartbeat is where
//! periodic output lives.

use log::{info, warn};

use crate::error::Result;
use crate::simulation::boundary::apply_boundary;
use crate::simulation::integrator;
use crate::simulation::scenario::Scenario;

/// What the heartbeat wants the integration loop to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

impl Scenario {
    /// Shift positions and velocities so the centre of mass sits at the
    /// origin and total momentum is zero
    pub fn move_to_com(&mut self) {
        let (x_com, v_com) = self.system.center_of_mass();
        for p in self.system.particles.iter_mut() {
            p.x -= x_com;
            p.v -= v_com;
        }
    }

    /// One integrator step of `parameters.dt`, then the boundary check
    pub fn step(&mut self) {
        self.step_by(self.parameters.dt);
    }

    /// One integrator step of length `dt`, then the boundary check
    pub fn step_by(&mut self, dt: f64) {
        if dt == self.parameters.dt {
            integrator::step(self.engine.integrator, &mut self.system, &self.forces, &self.parameters);
        } else {
            let mut shortened = self.parameters.clone();
            shortened.dt = dt;
            integrator::step(self.engine.integrator, &mut self.system, &self.forces, &shortened);
        }

        if let Some(sim_box) = &self.sim_box {
            apply_boundary(&mut self.system, sim_box, self.engine.boundary);
        }
    }

    /// Integrate until `t_max` (which may be infinite).
    ///
    /// The last step is shortened so finite runs finish exactly on `t_max`.
    /// Stops early if the heartbeat returns [`Control::Exit`] or no particles
    /// are left. Heartbeat errors abort the run.
    pub fn integrate<F>(&mut self, t_max: f64, mut heartbeat: F) -> Result<()>
    where
        F: FnMut(&Scenario) -> Result<Control>,
    {
        info!(
            "integrating {} particles from t = {} to t = {}",
            self.system.len(),
            self.system.t,
            t_max
        );

        if heartbeat(&*self)? == Control::Exit {
            return Ok(());
        }

        while self.system.t < t_max {
            if self.system.is_empty() {
                warn!("no particles left at t = {:e}, stopping", self.system.t);
                break;
            }

            let remaining = t_max - self.system.t;
            let dt = self.parameters.dt.min(remaining);
            self.step_by(dt);

            if heartbeat(&*self)? == Control::Exit {
                info!("heartbeat requested exit at t = {:e}", self.system.t);
                break;
            }
        }

        Ok(())
    }
}
