//! Atomic unit of work handed to the document store.

use crate::domain::audit::{DependencyAuditEntry, TransitionRecord};
use crate::domain::dependency::Dependency;
use crate::domain::document::{DocumentVersion, Revision};

use super::WorkflowInstance;

/// Everything one operation writes. The store applies all of it or none.
///
/// - `updated_versions` carry the revision they were read at; the store
///   rejects the set if the stored revision moved on.
/// - `workflows` are upserted by id.
/// - `transitions` and `dependency_audit` are append-only.
/// - `expected_graph_revision`, when set, must equal the store's current
///   edge-set revision. Any edge insert or deactivation bumps it.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub inserted_versions: Vec<DocumentVersion>,
    pub updated_versions: Vec<DocumentVersion>,
    pub workflows: Vec<WorkflowInstance>,
    pub transitions: Vec<TransitionRecord>,
    pub inserted_edges: Vec<Dependency>,
    pub deactivated_edges: Vec<Dependency>,
    pub dependency_audit: Vec<DependencyAuditEntry>,
    pub expected_graph_revision: Option<Revision>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the edge set to be unchanged since `revision` was read.
    pub fn expecting_graph_revision(mut self, revision: Revision) -> Self {
        self.expected_graph_revision = Some(revision);
        self
    }

    pub fn touches_edges(&self) -> bool {
        !self.inserted_edges.is_empty() || !self.deactivated_edges.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.inserted_versions.is_empty()
            && self.updated_versions.is_empty()
            && self.workflows.is_empty()
            && self.transitions.is_empty()
            && !self.touches_edges()
            && self.dependency_audit.is_empty()
    }
}
