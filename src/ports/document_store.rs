//! DocumentStore port - Single authoritative store for document control data.
//!
//! Reads return plain domain values. All writes go through [`DocumentStore::commit`],
//! which applies a [`ChangeSet`] atomically:
//!
//! - every updated version must still be at the revision it was read at,
//!   otherwise the commit fails with `ErrorCode::ConcurrencyConflict`
//! - if `expected_graph_revision` is set it must match the stored edge-set
//!   revision; any edge insert or deactivation bumps that revision
//! - transition records are unique per `(document_version_id, sequence)`
//! - per base number at most one in-flight and one in-force version may
//!   exist after the commit
//!
//! Stores bump each written version's revision; callers never do.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::audit::{DependencyAuditEntry, TransitionRecord};
use crate::domain::dependency::{Dependency, GraphSnapshot};
use crate::domain::document::DocumentVersion;
use crate::domain::foundation::{BaseNumber, DependencyId, DocumentVersionId, DomainError};
use crate::domain::workflow::{ChangeSet, WorkflowInstance};

/// Which date-driven transition a sweep is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DueKind {
    /// APPROVED_PENDING_EFFECTIVE with `effective_date <= today`.
    Activation,
    /// SCHEDULED_FOR_OBSOLESCENCE with `obsolescence_date <= today`.
    Retirement,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_version(
        &self,
        id: DocumentVersionId,
    ) -> Result<Option<DocumentVersion>, DomainError>;

    /// All versions sharing `base_number`, in any order.
    async fn find_family(&self, base_number: &BaseNumber) -> Result<Vec<DocumentVersion>, DomainError>;

    /// Versions due for the given date-driven transition, oldest date first.
    async fn find_due(
        &self,
        kind: DueKind,
        today: NaiveDate,
    ) -> Result<Vec<DocumentVersion>, DomainError>;

    /// The version's open workflow instance, if any.
    async fn find_active_workflow(
        &self,
        version_id: DocumentVersionId,
    ) -> Result<Option<WorkflowInstance>, DomainError>;

    /// Transition records for a version ordered by sequence.
    async fn history(
        &self,
        version_id: DocumentVersionId,
    ) -> Result<Vec<TransitionRecord>, DomainError>;

    /// Dependency audit entries where the version is the dependent, oldest first.
    async fn dependency_audit(
        &self,
        version_id: DocumentVersionId,
    ) -> Result<Vec<DependencyAuditEntry>, DomainError>;

    /// Every version as a graph node plus every edge, with the edge-set revision.
    async fn load_graph(&self) -> Result<GraphSnapshot, DomainError>;

    async fn find_dependency(&self, id: DependencyId) -> Result<Option<Dependency>, DomainError>;

    /// Applies the change set atomically.
    async fn commit(&self, changes: ChangeSet) -> Result<(), DomainError>;
}
