//! CreateNewVersionHandler - Drafts the next version of an EFFECTIVE document.
//!
//! The draft inherits the source's active dependencies, each re-pointed to
//! the latest EFFECTIVE version of its target family. The copies are checked
//! against the graph as loaded and committed with its revision, so a
//! concurrent edge change forces a retry.

use std::sync::Arc;

use crate::domain::dependency::Dependency;
use crate::domain::document::{DocumentVersion, VersionType};
use crate::domain::family::NewVersionRequest;
use crate::domain::foundation::{CommandMetadata, DocumentVersionId, Role};
use crate::domain::workflow::{ChangeSet, WorkflowError};
use crate::ports::{Clock, DocumentStore, RoleProvider};

use super::super::support::{load_family, load_graph, load_version, require_role};

#[derive(Debug, Clone)]
pub struct CreateNewVersionCommand {
    pub source_id: DocumentVersionId,
    pub version_type: VersionType,
    pub change_reason: String,
    /// Defaults to the source's title.
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateNewVersionResult {
    pub version: DocumentVersion,
    pub copied_dependencies: Vec<Dependency>,
}

pub struct CreateNewVersionHandler {
    store: Arc<dyn DocumentStore>,
    roles: Arc<dyn RoleProvider>,
    clock: Arc<dyn Clock>,
}

impl CreateNewVersionHandler {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        roles: Arc<dyn RoleProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, roles, clock }
    }

    pub async fn handle(
        &self,
        cmd: CreateNewVersionCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateNewVersionResult, WorkflowError> {
        require_role(self.roles.as_ref(), &metadata, Role::Author).await?;

        let source = load_version(self.store.as_ref(), cmd.source_id).await?;
        let family = load_family(self.store.as_ref(), &source).await?;
        let mut graph = load_graph(self.store.as_ref()).await?;
        let graph_revision = graph.revision();

        let plan = family.plan_new_version(
            NewVersionRequest {
                source_id: cmd.source_id,
                version_type: cmd.version_type,
                change_reason: cmd.change_reason,
                title: cmd.title,
                author_id: metadata.actor_id.clone(),
            },
            &mut graph,
            self.clock.now(),
        )?;

        let mut changes = ChangeSet::new().expecting_graph_revision(graph_revision);
        changes.inserted_versions.push(plan.version.clone());
        changes.inserted_edges.extend(plan.copied_edges.iter().cloned());
        changes.dependency_audit.extend(plan.audit_entries);
        self.store.commit(changes).await?;

        tracing::info!(
            version_id = %plan.version.id(),
            document = %plan.version.label(),
            source_id = %cmd.source_id,
            copied_dependencies = plan.copied_edges.len(),
            actor_id = %metadata.actor_id,
            "New document version drafted"
        );

        Ok(CreateNewVersionResult {
            version: plan.version,
            copied_dependencies: plan.copied_edges,
        })
    }
}
