//! Scheduler handlers - Date-driven activation and retirement.

mod run_sweep;

pub use run_sweep::{RunSweepHandler, SweepFailure, SweepReport};
