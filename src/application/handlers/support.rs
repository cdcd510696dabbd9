//! Lookups and checks shared by the document control handlers.

use crate::domain::dependency::DependencyGraph;
use crate::domain::document::DocumentVersion;
use crate::domain::family::VersionFamily;
use crate::domain::foundation::{CommandMetadata, DocumentVersionId, Role};
use crate::domain::workflow::{GuardViolation, Notification, WorkflowError};
use crate::ports::{DocumentStore, NotificationSender, RoleProvider};

pub(crate) async fn load_version(
    store: &dyn DocumentStore,
    id: DocumentVersionId,
) -> Result<DocumentVersion, WorkflowError> {
    store
        .find_version(id)
        .await?
        .ok_or_else(|| WorkflowError::not_found(format!("document version {}", id)))
}

pub(crate) async fn load_family(
    store: &dyn DocumentStore,
    version: &DocumentVersion,
) -> Result<VersionFamily, WorkflowError> {
    let members = store.find_family(version.base_number()).await?;
    Ok(VersionFamily::new(version.base_number().clone(), members))
}

pub(crate) async fn load_graph(store: &dyn DocumentStore) -> Result<DependencyGraph, WorkflowError> {
    let snapshot = store.load_graph().await?;
    Ok(DependencyGraph::from_snapshot(snapshot))
}

pub(crate) async fn require_role(
    roles: &dyn RoleProvider,
    metadata: &CommandMetadata,
    role: Role,
) -> Result<(), WorkflowError> {
    if roles.actor_has_role(&metadata.actor_id, role).await? {
        Ok(())
    } else {
        tracing::warn!(
            actor_id = %metadata.actor_id,
            role = %role,
            correlation_id = %metadata.correlation_id(),
            "Actor lacks required role"
        );
        Err(GuardViolation::wrong_role(role).into())
    }
}

/// Delivers post-commit notifications. Failures are logged, never returned.
pub(crate) async fn deliver(sender: &dyn NotificationSender, notifications: &[Notification]) -> usize {
    let mut delivered = 0;
    for notification in notifications {
        match sender.notify(notification).await {
            Ok(()) => delivered += 1,
            Err(e) => tracing::warn!(
                event_type = %notification.event_type,
                version_id = %notification.document_version_id,
                error = %e,
                "Failed to deliver notification"
            ),
        }
    }
    delivered
}
