//! Dependency graph errors.

use thiserror::Error;

use crate::domain::foundation::{DependencyId, DocumentVersionId, ErrorCode};

/// Reasons an edge mutation is refused. No partial edge is ever written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    #[error("Document version {version_id} cannot depend on itself")]
    SelfReference { version_id: DocumentVersionId },

    #[error("Dependency would create a cycle: {}", format_path(.path))]
    CycleDetected { path: Vec<DocumentVersionId> },

    #[error("Active dependency from {from} to {to} already exists ({existing})")]
    Duplicate {
        from: DocumentVersionId,
        to: DocumentVersionId,
        existing: DependencyId,
    },

    #[error("Invalid endpoint {version_id}: {reason}")]
    InvalidEndpoint {
        version_id: DocumentVersionId,
        reason: String,
    },

    #[error("Dependency not found: {0}")]
    NotFound(DependencyId),

    #[error("Dependency {0} is already inactive")]
    AlreadyInactive(DependencyId),
}

impl DependencyError {
    pub fn invalid_endpoint(version_id: DocumentVersionId, reason: impl Into<String>) -> Self {
        DependencyError::InvalidEndpoint {
            version_id,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DependencyError::CycleDetected { .. } => ErrorCode::DependencyCycle,
            DependencyError::NotFound(_) => ErrorCode::DependencyNotFound,
            _ => ErrorCode::ValidationFailed,
        }
    }
}

fn format_path(path: &[DocumentVersionId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
