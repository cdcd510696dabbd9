//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DOC_LIFECYCLE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use doc_lifecycle::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Sweeping every {:?}", config.scheduler.interval());
//! ```

mod database;
mod error;
mod identity;
mod scheduler;
mod service;
mod storage;
mod workflow;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use identity::IdentityConfig;
pub use scheduler::SchedulerConfig;
pub use service::{Environment, ServiceConfig};
pub use storage::{StorageBackend, StorageConfig};
pub use workflow::WorkflowConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// in-memory development setup. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Environment and logging
    #[serde(default)]
    pub service: ServiceConfig,

    /// Document store backend
    #[serde(default)]
    pub storage: StorageConfig,

    /// PostgreSQL connection (postgres backend only)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Activation/retirement sweep
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Review and approval SLAs
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Role map source
    #[serde(default)]
    pub identity: IdentityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DOC_LIFECYCLE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DOC_LIFECYCLE__STORAGE__BACKEND=postgres` -> `storage.backend = postgres`
    /// - `DOC_LIFECYCLE__SCHEDULER__INTERVAL_SECS=600` -> `scheduler.interval_secs = 600`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DOC_LIFECYCLE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// The database section is only checked when the postgres backend is
    /// selected. Production refuses the in-memory backend.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.service.validate()?;
        if self.storage.uses_postgres() {
            self.database.validate()?;
        } else if self.service.is_production() {
            return Err(ValidationError::MemoryStorageInProduction);
        }
        self.scheduler.validate()?;
        self.workflow.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.service.is_production()
    }
}
