//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DocumentStore` - Authoritative storage for versions, workflows, audit and edges
//! - `RoleProvider` - Role membership lookups
//! - `NotificationSender` - Post-commit notification delivery
//! - `Clock` - Current time and business date

mod clock;
mod document_store;
mod notification_sender;
mod role_provider;

pub use clock::Clock;
pub use document_store::{DocumentStore, DueKind};
pub use notification_sender::NotificationSender;
pub use role_provider::RoleProvider;
