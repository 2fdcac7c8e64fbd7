//! Plain-text snapshots, one line per particle: `x y z vx vy vz`

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::simulation::states::ParticleSystem;

/// Append the current positions and velocities to `path`, creating it if needed
pub fn write_ascii(sys: &ParticleSystem, path: impl AsRef<Path>) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);
    write_particles(sys, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write the snapshot lines for `sys` into any writer
pub fn write_particles<W: Write>(sys: &ParticleSystem, out: &mut W) -> Result<()> {
    for p in &sys.particles {
        writeln!(
            out,
            "{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}\t{:.6e}",
            p.x.x, p.x.y, p.x.z, p.v.x, p.v.y, p.v.z
        )?;
    }
    Ok(())
}
