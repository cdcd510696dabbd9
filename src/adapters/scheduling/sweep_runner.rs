//! SweepRunner - Background task that runs the scheduler sweep on an interval.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 1h | Time between sweeps |
//! | `run_on_startup` | true | Sweep immediately instead of waiting one interval |
//!
//! ## Graceful Shutdown
//!
//! The runner listens on a `watch` channel. A sweep in progress finishes
//! before the loop exits. Sweeps are idempotent, so a missed or repeated
//! tick is harmless.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::application::handlers::{RunSweepHandler, SweepReport};
use crate::domain::workflow::WorkflowError;

#[derive(Debug, Clone)]
pub struct SweepRunnerConfig {
    pub interval: Duration,
    pub run_on_startup: bool,
}

impl Default for SweepRunnerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            run_on_startup: true,
        }
    }
}

impl SweepRunnerConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_run_on_startup(mut self, run_on_startup: bool) -> Self {
        self.run_on_startup = run_on_startup;
        self
    }
}

pub struct SweepRunner {
    handler: Arc<RunSweepHandler>,
    config: SweepRunnerConfig,
}

impl SweepRunner {
    pub fn new(handler: Arc<RunSweepHandler>) -> Self {
        Self {
            handler,
            config: SweepRunnerConfig::default(),
        }
    }

    pub fn with_config(handler: Arc<RunSweepHandler>, config: SweepRunnerConfig) -> Self {
        Self { handler, config }
    }

    /// Runs sweeps until the shutdown signal is received.
    ///
    /// A failed sweep is logged and retried on the next tick; the loop
    /// itself only ends on shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if !self.config.run_on_startup {
            // First tick completes immediately.
            interval.tick().await;
        }

        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            "Scheduler sweep runner started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Scheduler sweep runner stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    let _ = self.run_once().await;
                }
            }
        }
    }

    /// Runs exactly one sweep ("run now").
    pub async fn run_once(&self) -> Result<SweepReport, WorkflowError> {
        let result = self.handler.handle().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Scheduler sweep failed");
        }
        result
    }
}
