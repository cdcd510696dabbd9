//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-process document store (development, tests)
//! - `postgres` - sqlx-backed document store
//! - `identity` - Role lookups from a static role map
//! - `notification` - Notification delivery (log, recording)
//! - `clock` - System and fixed clocks
//! - `scheduling` - Periodic scheduler sweep runner

pub mod clock;
pub mod identity;
pub mod memory;
pub mod notification;
pub mod postgres;
pub mod scheduling;

pub use clock::{FixedClock, SystemClock};
pub use identity::StaticRoleProvider;
pub use memory::InMemoryDocumentStore;
pub use notification::{LoggingNotificationSender, RecordingNotificationSender};
pub use postgres::PostgresDocumentStore;
pub use scheduling::{SweepRunner, SweepRunnerConfig};
