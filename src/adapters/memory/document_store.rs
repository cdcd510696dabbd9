//! In-memory DocumentStore.
//!
//! Holds all state behind one async lock. `commit` validates a change set
//! against a working copy and swaps it in only when every check passes, so
//! a rejected change set leaves no trace.
//!
//! Suitable for tests, demos and single-process deployments that do not
//! need durability.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::domain::audit::{DependencyAuditEntry, TransitionRecord};
use crate::domain::dependency::{Dependency, GraphNode, GraphSnapshot};
use crate::domain::document::{DocumentStatus, DocumentVersion, Revision};
use crate::domain::foundation::{
    BaseNumber, DependencyId, DocumentVersionId, DomainError, ErrorCode, WorkflowInstanceId,
};
use crate::domain::workflow::{ChangeSet, WorkflowInstance};
use crate::ports::{DocumentStore, DueKind};

#[derive(Debug, Clone, Default)]
struct StoreState {
    versions: HashMap<DocumentVersionId, DocumentVersion>,
    workflows: HashMap<WorkflowInstanceId, WorkflowInstance>,
    transitions: Vec<TransitionRecord>,
    edges: Vec<Dependency>,
    dependency_audit: Vec<DependencyAuditEntry>,
    graph_revision: Revision,
}

/// DocumentStore backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    state: RwLock<StoreState>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored transition records (for test assertions).
    pub async fn transition_count(&self) -> usize {
        self.state.read().await.transitions.len()
    }

    /// Current edge-set revision.
    pub async fn graph_revision(&self) -> Revision {
        self.state.read().await.graph_revision
    }

    /// All workflow instances of a version, open or closed.
    pub async fn workflows_of(&self, version_id: DocumentVersionId) -> Vec<WorkflowInstance> {
        let state = self.state.read().await;
        let mut workflows: Vec<WorkflowInstance> = state
            .workflows
            .values()
            .filter(|wf| wf.document_version_id == version_id)
            .cloned()
            .collect();
        workflows.sort_by_key(|wf| wf.created_at);
        workflows
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_version(
        &self,
        id: DocumentVersionId,
    ) -> Result<Option<DocumentVersion>, DomainError> {
        Ok(self.state.read().await.versions.get(&id).cloned())
    }

    async fn find_family(&self, base_number: &BaseNumber) -> Result<Vec<DocumentVersion>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .versions
            .values()
            .filter(|v| v.base_number() == base_number)
            .cloned()
            .collect())
    }

    async fn find_due(
        &self,
        kind: DueKind,
        today: NaiveDate,
    ) -> Result<Vec<DocumentVersion>, DomainError> {
        let state = self.state.read().await;
        let mut due: Vec<(NaiveDate, DocumentVersion)> = state
            .versions
            .values()
            .filter_map(|v| {
                let date = match kind {
                    DueKind::Activation if v.status() == DocumentStatus::ApprovedPendingEffective => {
                        v.effective_date()
                    }
                    DueKind::Retirement if v.status() == DocumentStatus::ScheduledForObsolescence => {
                        v.obsolescence_date()
                    }
                    _ => None,
                }?;
                (date <= today).then(|| (date, v.clone()))
            })
            .collect();
        due.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.created_at().cmp(&b.1.created_at())));
        Ok(due.into_iter().map(|(_, v)| v).collect())
    }

    async fn find_active_workflow(
        &self,
        version_id: DocumentVersionId,
    ) -> Result<Option<WorkflowInstance>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .workflows
            .values()
            .find(|wf| wf.document_version_id == version_id && !wf.is_terminated)
            .cloned())
    }

    async fn history(
        &self,
        version_id: DocumentVersionId,
    ) -> Result<Vec<TransitionRecord>, DomainError> {
        let state = self.state.read().await;
        let mut records: Vec<TransitionRecord> = state
            .transitions
            .iter()
            .filter(|r| r.document_version_id == version_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.sequence);
        Ok(records)
    }

    async fn dependency_audit(
        &self,
        version_id: DocumentVersionId,
    ) -> Result<Vec<DependencyAuditEntry>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .dependency_audit
            .iter()
            .filter(|entry| entry.document_version_id == version_id)
            .cloned()
            .collect())
    }

    async fn load_graph(&self) -> Result<GraphSnapshot, DomainError> {
        let state = self.state.read().await;
        Ok(GraphSnapshot {
            revision: state.graph_revision,
            nodes: state.versions.values().map(GraphNode::from_version).collect(),
            edges: state.edges.clone(),
        })
    }

    async fn find_dependency(&self, id: DependencyId) -> Result<Option<Dependency>, DomainError> {
        let state = self.state.read().await;
        Ok(state.edges.iter().find(|edge| edge.id == id).cloned())
    }

    async fn commit(&self, changes: ChangeSet) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        apply(&mut next, changes)?;
        *state = next;
        Ok(())
    }
}

fn apply(state: &mut StoreState, changes: ChangeSet) -> Result<(), DomainError> {
    if let Some(expected) = changes.expected_graph_revision {
        if expected != state.graph_revision {
            return Err(DomainError::conflict("dependency graph")
                .with_detail("expected_revision", expected.to_string())
                .with_detail("actual_revision", state.graph_revision.to_string()));
        }
    }

    let mut families: HashSet<BaseNumber> = HashSet::new();

    for version in changes.inserted_versions {
        if state.versions.contains_key(&version.id()) {
            return Err(DomainError::conflict(format!("document_version {}", version.id())));
        }
        families.insert(version.base_number().clone());
        state.versions.insert(version.id(), version);
    }

    for mut version in changes.updated_versions {
        let stored = state.versions.get(&version.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DocumentNotFound,
                format!("Document version not found: {}", version.id()),
            )
        })?;
        if stored.revision() != version.revision() {
            return Err(DomainError::conflict(format!("document_version {}", version.id())));
        }
        version.set_revision(stored.revision().next());
        families.insert(version.base_number().clone());
        state.versions.insert(version.id(), version);
    }

    for workflow in changes.workflows {
        state.workflows.insert(workflow.id, workflow);
    }

    for record in changes.transitions {
        let taken = state.transitions.iter().any(|existing| {
            existing.document_version_id == record.document_version_id
                && existing.sequence == record.sequence
        });
        if taken {
            return Err(DomainError::conflict(format!(
                "transition {} of document_version {}",
                record.sequence, record.document_version_id
            )));
        }
        state.transitions.push(record);
    }

    let touches_edges = !changes.inserted_edges.is_empty() || !changes.deactivated_edges.is_empty();

    for edge in changes.deactivated_edges {
        let slot = state
            .edges
            .iter_mut()
            .find(|existing| existing.id == edge.id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::DependencyNotFound,
                    format!("Dependency not found: {}", edge.id),
                )
            })?;
        if !slot.is_active {
            return Err(DomainError::conflict(format!("dependency {}", edge.id)));
        }
        *slot = edge;
    }

    for edge in changes.inserted_edges {
        let duplicate = state.edges.iter().any(|existing| {
            existing.id == edge.id
                || (existing.is_active
                    && existing.connects(edge.document_version_id, edge.depends_on_version_id))
        });
        if duplicate {
            return Err(DomainError::conflict(format!("dependency {}", edge.id)));
        }
        state.edges.push(edge);
    }

    state.dependency_audit.extend(changes.dependency_audit);

    if touches_edges {
        state.graph_revision = state.graph_revision.next();
    }

    check_single_open_workflow(state)?;
    for base_number in families {
        check_family(state, &base_number)?;
    }

    Ok(())
}

fn check_single_open_workflow(state: &StoreState) -> Result<(), DomainError> {
    let mut open: HashSet<DocumentVersionId> = HashSet::new();
    for workflow in state.workflows.values().filter(|wf| !wf.is_terminated) {
        if !open.insert(workflow.document_version_id) {
            return Err(DomainError::conflict(format!(
                "workflow of document_version {}",
                workflow.document_version_id
            )));
        }
    }
    Ok(())
}

fn check_family(state: &StoreState, base_number: &BaseNumber) -> Result<(), DomainError> {
    let members = state
        .versions
        .values()
        .filter(|v| v.base_number() == base_number);
    let (mut in_flight, mut in_force) = (0, 0);
    for member in members {
        if member.status().is_in_flight() {
            in_flight += 1;
        }
        if member.status().is_in_force() {
            in_force += 1;
        }
    }
    if in_flight > 1 || in_force > 1 {
        return Err(DomainError::conflict(format!("family {}", base_number))
            .with_detail("in_flight", in_flight.to_string())
            .with_detail("in_force", in_force.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dependency::DependencyType;
    use crate::domain::foundation::{Timestamp, UserId};

    fn author() -> UserId {
        UserId::new("author-1").unwrap()
    }

    fn draft(base: &str) -> DocumentVersion {
        DocumentVersion::new_draft(
            BaseNumber::new(base).unwrap(),
            "Document".to_string(),
            author(),
            Timestamp::now(),
        )
        .unwrap()
    }

    async fn seeded(store: &InMemoryDocumentStore, version: &DocumentVersion) {
        store
            .commit(ChangeSet {
                inserted_versions: vec![version.clone()],
                ..ChangeSet::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_bumps_revision() {
        let store = InMemoryDocumentStore::new();
        let v = draft("SOP-1");
        seeded(&store, &v).await;

        store
            .commit(ChangeSet {
                updated_versions: vec![v.clone()],
                ..ChangeSet::default()
            })
            .await
            .unwrap();

        let stored = store.find_version(v.id()).await.unwrap().unwrap();
        assert_eq!(stored.revision(), Revision::initial().next());
    }

    #[tokio::test]
    async fn stale_update_is_a_conflict_and_changes_nothing() {
        let store = InMemoryDocumentStore::new();
        let v = draft("SOP-1");
        seeded(&store, &v).await;
        store
            .commit(ChangeSet {
                updated_versions: vec![v.clone()],
                ..ChangeSet::default()
            })
            .await
            .unwrap();

        let other = draft("SOP-2");
        let err = store
            .commit(ChangeSet {
                inserted_versions: vec![other.clone()],
                updated_versions: vec![v.clone()],
                ..ChangeSet::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
        assert!(store.find_version(other.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_in_flight_version_in_a_family_is_rejected() {
        let store = InMemoryDocumentStore::new();
        seeded(&store, &draft("SOP-1")).await;

        let err = store
            .commit(ChangeSet {
                inserted_versions: vec![draft("SOP-1")],
                ..ChangeSet::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
    }

    #[tokio::test]
    async fn edge_changes_bump_graph_revision_and_stale_readers_conflict() {
        let store = InMemoryDocumentStore::new();
        let a = draft("A");
        let b = draft("B");
        seeded(&store, &a).await;
        seeded(&store, &b).await;
        let read_at = store.load_graph().await.unwrap().revision;

        let edge = Dependency::new(a.id(), b.id(), DependencyType::Reference, author(), Timestamp::now());
        store
            .commit(ChangeSet {
                inserted_edges: vec![edge],
                ..ChangeSet::default()
            }
            .expecting_graph_revision(read_at))
            .await
            .unwrap();
        assert_eq!(store.graph_revision().await, read_at.next());

        let err = store
            .commit(ChangeSet::default().expecting_graph_revision(read_at))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
    }

    #[tokio::test]
    async fn deactivating_twice_conflicts() {
        let store = InMemoryDocumentStore::new();
        let a = draft("A");
        let b = draft("B");
        seeded(&store, &a).await;
        seeded(&store, &b).await;
        let edge = Dependency::new(a.id(), b.id(), DependencyType::Reference, author(), Timestamp::now());
        store
            .commit(ChangeSet {
                inserted_edges: vec![edge.clone()],
                ..ChangeSet::default()
            })
            .await
            .unwrap();

        let off = ChangeSet {
            deactivated_edges: vec![edge.deactivated(Timestamp::now())],
            ..ChangeSet::default()
        };
        store.commit(off.clone()).await.unwrap();
        let err = store.commit(off).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
        assert!(!store.find_dependency(edge.id).await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn find_due_filters_by_status_and_date() {
        let store = InMemoryDocumentStore::new();
        let v = draft("SOP-1");
        seeded(&store, &v).await;

        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut approved = v.clone();
        approved.set_status(DocumentStatus::ApprovedPendingEffective, Timestamp::now());
        approved.set_effective_date(today);
        store
            .commit(ChangeSet {
                updated_versions: vec![approved],
                ..ChangeSet::default()
            })
            .await
            .unwrap();

        assert_eq!(store.find_due(DueKind::Activation, today).await.unwrap().len(), 1);
        assert!(store
            .find_due(DueKind::Activation, today.pred_opt().unwrap())
            .await
            .unwrap()
            .is_empty());
        assert!(store.find_due(DueKind::Retirement, today).await.unwrap().is_empty());
    }
}
