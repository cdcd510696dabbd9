//! RemoveDependencyHandler - Soft-deletes an edge.
//!
//! The row stays with `is_active = false`; every graph check ignores it.

use std::sync::Arc;

use crate::domain::audit::{AuditRecorder, DependencyChange};
use crate::domain::dependency::{Dependency, DependencyError};
use crate::domain::foundation::{CommandMetadata, DependencyId, Role};
use crate::domain::workflow::{ChangeSet, WorkflowError};
use crate::ports::{Clock, DocumentStore, RoleProvider};

use super::super::support::require_role;

#[derive(Debug, Clone)]
pub struct RemoveDependencyCommand {
    pub dependency_id: DependencyId,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RemoveDependencyResult {
    pub dependency: Dependency,
}

pub struct RemoveDependencyHandler {
    store: Arc<dyn DocumentStore>,
    roles: Arc<dyn RoleProvider>,
    clock: Arc<dyn Clock>,
}

impl RemoveDependencyHandler {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        roles: Arc<dyn RoleProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, roles, clock }
    }

    pub async fn handle(
        &self,
        cmd: RemoveDependencyCommand,
        metadata: CommandMetadata,
    ) -> Result<RemoveDependencyResult, WorkflowError> {
        require_role(self.roles.as_ref(), &metadata, Role::Author).await?;

        let existing = self
            .store
            .find_dependency(cmd.dependency_id)
            .await?
            .ok_or(DependencyError::NotFound(cmd.dependency_id))?;
        if !existing.is_active {
            return Err(DependencyError::AlreadyInactive(cmd.dependency_id).into());
        }

        let now = self.clock.now();
        let dependency = existing.deactivated(now);

        let mut changes = ChangeSet::new();
        changes.dependency_audit.push(AuditRecorder::dependency_entry(
            &dependency,
            DependencyChange::Deactivated,
            &metadata.actor_id,
            cmd.comment,
            now,
        ));
        changes.deactivated_edges.push(dependency.clone());
        self.store.commit(changes).await?;

        tracing::info!(
            dependency_id = %dependency.id,
            dependent_id = %dependency.document_version_id,
            depends_on_id = %dependency.depends_on_version_id,
            actor_id = %metadata.actor_id,
            "Dependency deactivated"
        );

        Ok(RemoveDependencyResult { dependency })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::dependency::{AddDependencyCommand, AddDependencyHandler};
    use crate::application::handlers::testing::{meta, Fixture};
    use crate::domain::dependency::DependencyType;
    use crate::domain::foundation::ErrorCode;

    fn handler(fx: &Fixture) -> RemoveDependencyHandler {
        RemoveDependencyHandler::new(fx.store.clone(), fx.roles.clone(), fx.clock.clone())
    }

    async fn edge(fx: &Fixture) -> Dependency {
        let a = fx.create_document("SOP-A").await;
        let b = fx.create_document("SOP-B").await;
        AddDependencyHandler::new(fx.store.clone(), fx.roles.clone(), fx.clock.clone())
            .handle(
                AddDependencyCommand {
                    dependent_id: a.id(),
                    depends_on_id: b.id(),
                    dependency_type: DependencyType::Reference,
                    comment: None,
                },
                meta("author-1"),
            )
            .await
            .unwrap()
            .dependency
    }

    #[tokio::test]
    async fn deactivates_edge_and_keeps_row() {
        let fx = Fixture::new();
        let dependency = edge(&fx).await;

        let result = handler(&fx)
            .handle(
                RemoveDependencyCommand {
                    dependency_id: dependency.id,
                    comment: Some("no longer cited".to_string()),
                },
                meta("author-1"),
            )
            .await
            .unwrap();

        assert!(!result.dependency.is_active);
        assert!(result.dependency.deactivated_at.is_some());
        let stored = fx.store.find_dependency(dependency.id).await.unwrap().unwrap();
        assert!(!stored.is_active);

        let audit = fx.store.dependency_audit(dependency.document_version_id).await.unwrap();
        let changes: Vec<_> = audit.iter().map(|e| e.change).collect();
        assert_eq!(changes, vec![DependencyChange::Added, DependencyChange::Deactivated]);
    }

    #[tokio::test]
    async fn removing_twice_is_rejected() {
        let fx = Fixture::new();
        let dependency = edge(&fx).await;
        let cmd = RemoveDependencyCommand {
            dependency_id: dependency.id,
            comment: None,
        };
        handler(&fx).handle(cmd.clone(), meta("author-1")).await.unwrap();

        let err = handler(&fx).handle(cmd, meta("author-1")).await.unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Dependency(DependencyError::AlreadyInactive(_))
        ));
    }

    #[tokio::test]
    async fn unknown_dependency_is_not_found() {
        let fx = Fixture::new();
        let err = handler(&fx)
            .handle(
                RemoveDependencyCommand {
                    dependency_id: DependencyId::new(),
                    comment: None,
                },
                meta("author-1"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::DependencyNotFound);
    }
}
