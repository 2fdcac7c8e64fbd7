//! Periodic output: when to write, progress timing and ASCII snapshots

pub mod check;
pub mod ascii;
pub mod timing;
pub mod snapshot;
