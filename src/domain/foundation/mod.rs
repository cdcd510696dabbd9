//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the document control domain.

mod command;
mod errors;
mod ids;
mod role;
mod state_machine;
mod timestamp;

pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    AuditEntryId, BaseNumber, DependencyId, DocumentVersionId, TransitionId, UserId,
    WorkflowInstanceId, MAX_BASE_NUMBER_LENGTH,
};
pub use role::Role;
pub use state_machine::StateMachine;
pub use timestamp::{add_days, Timestamp};
