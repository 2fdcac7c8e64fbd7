//! Progress reporting

use std::time::Instant;

use log::info;

use crate::simulation::states::ParticleSystem;

/// Wall-clock timer between successive progress reports
#[derive(Debug)]
pub struct OutputTimer {
    last: Instant,
}

impl Default for OutputTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputTimer {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }

    /// Log particle count, time, cpu seconds since the last report and,
    /// for finite `t_max`, how far along the run is. Returns the formatted line.
    pub fn output_timing(&mut self, sys: &ParticleSystem, t_max: f64) -> String {
        let now = Instant::now();
        let cpu = now.duration_since(self.last).as_secs_f64();
        self.last = now;

        let mut line = format!("N_tot= {}  t= {:e}  cpu= {:.6} [s]", sys.len(), sys.t, cpu);
        if t_max.is_finite() && t_max > 0.0 {
            line.push_str(&format!("  t/tmax= {:5.2}%", sys.t / t_max * 100.0));
        }
        info!("{line}");
        line
    }
}
