//! Document lifecycle service.
//!
//! Wires the configured adapters, checks dependency graph integrity once and
//! runs the scheduler sweep until Ctrl-C.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use doc_lifecycle::adapters::{
    InMemoryDocumentStore, LoggingNotificationSender, PostgresDocumentStore, StaticRoleProvider,
    SweepRunner, SweepRunnerConfig, SystemClock,
};
use doc_lifecycle::application::{
    CheckGraphIntegrityHandler, ExecuteActionHandler, RunSweepHandler,
};
use doc_lifecycle::config::{AppConfig, ServiceConfig, StorageBackend};
use doc_lifecycle::domain::workflow::WorkflowEngine;
use doc_lifecycle::ports::DocumentStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.service);
    config.validate()?;

    tracing::info!(
        environment = ?config.service.environment,
        storage = ?config.storage.backend,
        "Starting document lifecycle service"
    );

    let store: Arc<dyn DocumentStore> = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on exit");
            Arc::new(InMemoryDocumentStore::new())
        }
        StorageBackend::Postgres => {
            tracing::info!(url = %config.database.redacted_url(), "Connecting to PostgreSQL");
            let pool = PgPoolOptions::new()
                .min_connections(config.database.min_connections)
                .max_connections(config.database.max_connections)
                .acquire_timeout(config.database.acquire_timeout())
                .idle_timeout(Some(config.database.idle_timeout()))
                .connect(&config.database.url)
                .await?;
            if config.database.run_migrations {
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("Database migrations applied");
            }
            Arc::new(PostgresDocumentStore::new(pool))
        }
    };

    let system_actor = config.scheduler.system_actor_id()?;
    let roles = match &config.identity.roles_file {
        Some(path) => StaticRoleProvider::from_file(path).await?,
        None => {
            tracing::warn!("No role map configured; only the scheduler can act");
            StaticRoleProvider::new()
        }
    }
    .with_system_actor(system_actor.clone());

    let clock = Arc::new(SystemClock::new());
    let executor = Arc::new(ExecuteActionHandler::new(
        store.clone(),
        Arc::new(roles),
        Arc::new(LoggingNotificationSender::new()),
        clock.clone(),
        WorkflowEngine::new(config.workflow.policy()),
    ));

    let report = CheckGraphIntegrityHandler::new(store.clone()).handle().await?;
    if !report.is_healthy() {
        tracing::error!(
            cycles = ?report.cycles,
            dangling_edges = ?report.dangling_edges,
            "Dependency graph needs attention"
        );
    }

    if !config.scheduler.enabled {
        tracing::info!("Scheduler disabled; exiting");
        return Ok(());
    }

    let sweep = Arc::new(RunSweepHandler::new(store, executor, clock, system_actor));
    let runner = SweepRunner::with_config(
        sweep,
        SweepRunnerConfig::default()
            .with_interval(config.scheduler.interval())
            .with_run_on_startup(config.scheduler.run_on_startup),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(async move { runner.run(shutdown_rx).await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    shutdown_tx.send(true)?;
    task.await?;

    Ok(())
}

fn init_tracing(service: &ServiceConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&service.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if service.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
