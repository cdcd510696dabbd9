//! AddDependencyHandler - Records that one version depends on another.

use std::sync::Arc;

use crate::domain::audit::{AuditRecorder, DependencyChange};
use crate::domain::dependency::{Dependency, DependencyType};
use crate::domain::foundation::{CommandMetadata, DocumentVersionId, Role};
use crate::domain::workflow::{ChangeSet, WorkflowError};
use crate::ports::{Clock, DocumentStore, RoleProvider};

use super::super::support::{load_graph, require_role};

#[derive(Debug, Clone)]
pub struct AddDependencyCommand {
    /// The version that depends on another.
    pub dependent_id: DocumentVersionId,
    /// The version being depended on.
    pub depends_on_id: DocumentVersionId,
    pub dependency_type: DependencyType,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AddDependencyResult {
    pub dependency: Dependency,
}

pub struct AddDependencyHandler {
    store: Arc<dyn DocumentStore>,
    roles: Arc<dyn RoleProvider>,
    clock: Arc<dyn Clock>,
}

impl AddDependencyHandler {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        roles: Arc<dyn RoleProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, roles, clock }
    }

    pub async fn handle(
        &self,
        cmd: AddDependencyCommand,
        metadata: CommandMetadata,
    ) -> Result<AddDependencyResult, WorkflowError> {
        require_role(self.roles.as_ref(), &metadata, Role::Author).await?;

        let graph = load_graph(self.store.as_ref()).await?;
        if let Err(e) = graph.check_new_edge(cmd.dependent_id, cmd.depends_on_id) {
            tracing::info!(
                dependent_id = %cmd.dependent_id,
                depends_on_id = %cmd.depends_on_id,
                error = %e,
                "Dependency rejected"
            );
            return Err(e.into());
        }

        let now = self.clock.now();
        let dependency = Dependency::new(
            cmd.dependent_id,
            cmd.depends_on_id,
            cmd.dependency_type,
            metadata.actor_id.clone(),
            now,
        );

        let mut changes = ChangeSet::new().expecting_graph_revision(graph.revision());
        changes.dependency_audit.push(AuditRecorder::dependency_entry(
            &dependency,
            DependencyChange::Added,
            &metadata.actor_id,
            cmd.comment,
            now,
        ));
        changes.inserted_edges.push(dependency.clone());
        self.store.commit(changes).await?;

        tracing::info!(
            dependency_id = %dependency.id,
            dependent_id = %dependency.document_version_id,
            depends_on_id = %dependency.depends_on_version_id,
            dependency_type = %dependency.dependency_type,
            actor_id = %metadata.actor_id,
            "Dependency added"
        );

        Ok(AddDependencyResult { dependency })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::{meta, Fixture};
    use crate::domain::dependency::DependencyError;
    use crate::domain::foundation::ErrorCode;

    fn handler(fx: &Fixture) -> AddDependencyHandler {
        AddDependencyHandler::new(fx.store.clone(), fx.roles.clone(), fx.clock.clone())
    }

    fn command(from: DocumentVersionId, to: DocumentVersionId) -> AddDependencyCommand {
        AddDependencyCommand {
            dependent_id: from,
            depends_on_id: to,
            dependency_type: DependencyType::Reference,
            comment: Some("cites section 4".to_string()),
        }
    }

    #[tokio::test]
    async fn adds_edge_with_audit_entry_and_bumps_revision() {
        let fx = Fixture::new();
        let a = fx.create_document("SOP-A").await;
        let b = fx.create_document("SOP-B").await;
        let before = fx.store.graph_revision().await;

        let result = handler(&fx).handle(command(a.id(), b.id()), meta("author-1")).await.unwrap();

        assert!(result.dependency.is_active);
        assert_eq!(fx.store.graph_revision().await, before.next());
        let audit = fx.store.dependency_audit(a.id()).await.unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].change, DependencyChange::Added);
        assert_eq!(audit[0].comment.as_deref(), Some("cites section 4"));
    }

    #[tokio::test]
    async fn rejects_self_reference() {
        let fx = Fixture::new();
        let a = fx.create_document("SOP-A").await;

        let err = handler(&fx).handle(command(a.id(), a.id()), meta("author-1")).await.unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Dependency(DependencyError::SelfReference { .. })
        ));
    }

    #[tokio::test]
    async fn rejects_cycle_and_writes_nothing() {
        let fx = Fixture::new();
        let a = fx.create_document("SOP-A").await;
        let b = fx.create_document("SOP-B").await;
        let c = fx.create_document("SOP-C").await;
        handler(&fx).handle(command(a.id(), b.id()), meta("author-1")).await.unwrap();
        handler(&fx).handle(command(b.id(), c.id()), meta("author-1")).await.unwrap();
        let revision = fx.store.graph_revision().await;

        let err = handler(&fx).handle(command(c.id(), a.id()), meta("author-1")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::DependencyCycle);
        match err {
            WorkflowError::Dependency(DependencyError::CycleDetected { path }) => {
                assert_eq!(path, vec![c.id(), a.id(), b.id(), c.id()]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
        assert_eq!(fx.store.graph_revision().await, revision);
        assert!(fx.store.dependency_audit(c.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_duplicate_active_edge() {
        let fx = Fixture::new();
        let a = fx.create_document("SOP-A").await;
        let b = fx.create_document("SOP-B").await;
        handler(&fx).handle(command(a.id(), b.id()), meta("author-1")).await.unwrap();

        let err = handler(&fx).handle(command(a.id(), b.id()), meta("author-1")).await.unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Dependency(DependencyError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_endpoint_is_rejected() {
        let fx = Fixture::new();
        let a = fx.create_document("SOP-A").await;

        let err = handler(&fx)
            .handle(command(a.id(), DocumentVersionId::new()), meta("author-1"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Dependency(DependencyError::InvalidEndpoint { .. })
        ));
    }
}
