//! Scheduler configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::foundation::UserId;

const MAX_INTERVAL_SECS: u64 = 86_400;

/// Settings for the periodic activation/retirement sweep.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Run the sweep loop at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between sweeps
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Principal recorded as actor on scheduled transitions
    #[serde(default = "default_system_actor")]
    pub system_actor: String,

    /// Sweep once immediately at startup
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn system_actor_id(&self) -> Result<UserId, ValidationError> {
        UserId::new(self.system_actor.clone()).map_err(|_| ValidationError::InvalidSystemActor)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_secs == 0 || self.interval_secs > MAX_INTERVAL_SECS {
            return Err(ValidationError::InvalidSweepInterval);
        }
        self.system_actor_id()?;
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval(),
            system_actor: default_system_actor(),
            run_on_startup: default_run_on_startup(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    3600
}

fn default_system_actor() -> String {
    "system:scheduler".to_string()
}

fn default_run_on_startup() -> bool {
    true
}
