//! Audit module - Append-only transition and dependency records.

mod record;
mod recorder;

pub use record::{DependencyAuditEntry, DependencyChange, TransitionRecord};
pub use recorder::{AuditRecorder, ChainVerification};
