//! The scenario heartbeat: every `interval` report timing and append a snapshot

use std::path::PathBuf;

use crate::configuration::config::OutputConfig;
use crate::error::Result;
use crate::output::ascii::write_ascii;
use crate::output::check::output_check_phase;
use crate::output::timing::OutputTimer;
use crate::simulation::run::Control;
use crate::simulation::scenario::Scenario;

pub struct SnapshotWriter {
    pub path: PathBuf,
    pub interval: f64,
    pub phase: f64,
    pub timing: bool,
    pub t_max: f64,
    timer: OutputTimer,
    written: usize,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>, interval: f64, t_max: f64) -> Self {
        Self {
            path: path.into(),
            interval,
            phase: 0.0,
            timing: true,
            t_max,
            timer: OutputTimer::new(),
            written: 0,
        }
    }

    pub fn from_config(cfg: &OutputConfig, t_max: f64) -> Self {
        let mut w = Self::new(&cfg.path, cfg.interval, t_max);
        w.phase = cfg.phase;
        w.timing = cfg.timing;
        w
    }

    /// Number of snapshots written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn heartbeat(&mut self, scenario: &Scenario) -> Result<Control> {
        if output_check_phase(&scenario.system, self.interval, self.phase) {
            if self.timing {
                self.timer.output_timing(&scenario.system, self.t_max);
            }
            write_ascii(&scenario.system, &self.path)?;
            self.written += 1;
        }
        Ok(Control::Continue)
    }
}
