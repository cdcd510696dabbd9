//! Scheduling adapters.
//!
//! - **SweepRunner** - Periodic driver for the scheduler sweep

mod sweep_runner;

pub use sweep_runner::{SweepRunner, SweepRunnerConfig};
