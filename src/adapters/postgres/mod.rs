//! PostgreSQL adapters - Database implementations for the storage port.
//!
//! - `PostgresDocumentStore` - Versions, workflows, audit and dependency edges
//!
//! Schema migrations live in `migrations/` and are applied with
//! `sqlx::migrate!` at startup when `database.run_migrations` is set.

mod document_store;

pub use document_store::PostgresDocumentStore;
