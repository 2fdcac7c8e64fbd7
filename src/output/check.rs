use crate::simulation::states::ParticleSystem;

/// True if the last completed step crossed a multiple of `interval`, or at t = 0.
pub fn output_check(sys: &ParticleSystem, interval: f64) -> bool {
    output_check_phase(sys, interval, 0.0)
}

/// Like [`output_check`] with the output times shifted by `phase * interval`.
pub fn output_check_phase(sys: &ParticleSystem, interval: f64, phase: f64) -> bool {
    if sys.t == 0.0 {
        return true;
    }
    if interval <= 0.0 {
        return false;
    }
    let shift = sys.t + interval * phase;
    (shift / interval).floor() != ((shift - sys.dt_last_done) / interval).floor()
}
