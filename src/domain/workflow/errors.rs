//! Workflow error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::dependency::{DependencyError, RetirementCheck};
use crate::domain::family::FamilyError;
use crate::domain::foundation::{DomainError, ErrorCode, Role, ValidationError};

/// Category of a refused action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardKind {
    WrongRole,
    WrongActor,
    SegregationOfDuties,
    InvalidState,
    MissingField,
    InvalidValue,
    NotDue,
    NotLatest,
    FamilyConflict,
    UnknownAction,
    InvalidPayload,
}

/// A failed precondition. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct GuardViolation {
    pub kind: GuardKind,
    pub message: String,
}

impl GuardViolation {
    pub fn new(kind: GuardKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn wrong_role(role: Role) -> Self {
        Self::new(
            GuardKind::WrongRole,
            format!("Actor does not hold the {} role", role),
        )
    }

    pub fn wrong_actor(expected: impl fmt::Display) -> Self {
        Self::new(
            GuardKind::WrongActor,
            format!("Only the {} may perform this action", expected),
        )
    }

    pub fn segregation(message: impl Into<String>) -> Self {
        Self::new(GuardKind::SegregationOfDuties, message)
    }

    pub fn invalid_state(action: &str, status: impl fmt::Display) -> Self {
        Self::new(
            GuardKind::InvalidState,
            format!("Cannot {} a document in {}", action, status),
        )
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            GuardKind::MissingField,
            format!("Field '{}' is required", field),
        )
    }

    pub fn invalid_value(field: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            GuardKind::InvalidValue,
            format!("Field '{}' is invalid: {}", field, reason),
        )
    }

    pub fn not_due(message: impl Into<String>) -> Self {
        Self::new(GuardKind::NotDue, message)
    }

    pub fn not_latest() -> Self {
        Self::new(
            GuardKind::NotLatest,
            "Only the latest version of a family may be scheduled for obsolescence",
        )
    }

    pub fn family_conflict(message: impl Into<String>) -> Self {
        Self::new(GuardKind::FamilyConflict, message)
    }

    pub fn unknown_action(name: &str) -> Self {
        Self::new(
            GuardKind::UnknownAction,
            format!("Unknown workflow action '{}'", name),
        )
    }

    pub fn invalid_payload(reason: impl fmt::Display) -> Self {
        Self::new(
            GuardKind::InvalidPayload,
            format!("Invalid action payload: {}", reason),
        )
    }
}

/// Error returned by workflow, dependency and family operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Guard violation: {0}")]
    Guard(#[from] GuardViolation),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(
        "Retirement of {} blocked by {} active dependent(s)",
        .0.base_number,
        .0.blocking_dependent_count()
    )]
    RetirementBlocked(RetirementCheck),

    #[error("Concurrent modification: {0}")]
    ConcurrencyConflict(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl WorkflowError {
    pub fn not_found(what: impl fmt::Display) -> Self {
        WorkflowError::NotFound(what.to_string())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            WorkflowError::NotFound(_) => ErrorCode::DocumentNotFound,
            WorkflowError::Guard(guard) => match guard.kind {
                GuardKind::WrongRole | GuardKind::WrongActor | GuardKind::SegregationOfDuties => {
                    ErrorCode::Forbidden
                }
                GuardKind::InvalidState => ErrorCode::InvalidStateTransition,
                _ => ErrorCode::GuardViolation,
            },
            WorkflowError::Dependency(err) => err.code(),
            WorkflowError::RetirementBlocked(_) => ErrorCode::RetirementBlocked,
            WorkflowError::ConcurrencyConflict(_) => ErrorCode::ConcurrencyConflict,
            WorkflowError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::ConcurrencyConflict(_))
    }
}

impl From<DomainError> for WorkflowError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConcurrencyConflict => WorkflowError::ConcurrencyConflict(err.message),
            ErrorCode::DocumentNotFound | ErrorCode::DependencyNotFound => {
                WorkflowError::NotFound(err.message)
            }
            ErrorCode::ValidationFailed | ErrorCode::InvalidFormat => {
                WorkflowError::Guard(GuardViolation::new(GuardKind::InvalidValue, err.message))
            }
            _ => WorkflowError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        WorkflowError::Guard(GuardViolation::new(GuardKind::InvalidValue, err.to_string()))
    }
}

impl From<FamilyError> for WorkflowError {
    fn from(err: FamilyError) -> Self {
        let message = err.to_string();
        match err {
            FamilyError::EdgeCopy(inner) => WorkflowError::Dependency(inner),
            FamilyError::SourceNotEffective { .. } => {
                WorkflowError::Guard(GuardViolation::new(GuardKind::InvalidState, message))
            }
            FamilyError::InFlightVersionExists { .. } => {
                WorkflowError::Guard(GuardViolation::family_conflict(message))
            }
            FamilyError::NotAMember { .. } | FamilyError::Validation(_) => {
                WorkflowError::Guard(GuardViolation::new(GuardKind::InvalidValue, message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_conflict_becomes_retryable_workflow_conflict() {
        let err: WorkflowError = DomainError::conflict("document_version x").into();
        assert!(err.is_retryable());
        assert_eq!(err.code(), ErrorCode::ConcurrencyConflict);
    }

    #[test]
    fn database_errors_become_infrastructure() {
        let err: WorkflowError = DomainError::database("pool timed out").into();
        assert!(matches!(err, WorkflowError::Infrastructure(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn role_guards_map_to_forbidden() {
        let err = WorkflowError::Guard(GuardViolation::wrong_role(Role::Approver));
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(
            err.to_string(),
            "Guard violation: Actor does not hold the approver role"
        );
    }

    #[test]
    fn non_effective_source_maps_to_invalid_state_transition() {
        let err: WorkflowError = FamilyError::SourceNotEffective {
            status: crate::domain::document::DocumentStatus::Draft,
        }
        .into();
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }
}
