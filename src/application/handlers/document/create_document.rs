//! CreateDocumentHandler - Starts a new family at version 1.0 in DRAFT.

use std::sync::Arc;

use crate::domain::document::DocumentVersion;
use crate::domain::foundation::{BaseNumber, CommandMetadata, Role};
use crate::domain::workflow::{ChangeSet, GuardViolation, WorkflowError};
use crate::ports::{Clock, DocumentStore, RoleProvider};

use super::super::support::require_role;

#[derive(Debug, Clone)]
pub struct CreateDocumentCommand {
    pub base_number: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct CreateDocumentResult {
    pub version: DocumentVersion,
}

pub struct CreateDocumentHandler {
    store: Arc<dyn DocumentStore>,
    roles: Arc<dyn RoleProvider>,
    clock: Arc<dyn Clock>,
}

impl CreateDocumentHandler {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        roles: Arc<dyn RoleProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, roles, clock }
    }

    pub async fn handle(
        &self,
        cmd: CreateDocumentCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateDocumentResult, WorkflowError> {
        require_role(self.roles.as_ref(), &metadata, Role::Author).await?;

        let base_number = BaseNumber::new(cmd.base_number)?;
        if !self.store.find_family(&base_number).await?.is_empty() {
            return Err(GuardViolation::family_conflict(format!(
                "Base number {} is already in use",
                base_number
            ))
            .into());
        }

        let version = DocumentVersion::new_draft(
            base_number,
            cmd.title,
            metadata.actor_id.clone(),
            self.clock.now(),
        )?;

        let mut changes = ChangeSet::new();
        changes.inserted_versions.push(version.clone());
        self.store.commit(changes).await?;

        tracing::info!(
            version_id = %version.id(),
            document = %version.label(),
            actor_id = %metadata.actor_id,
            "Document created"
        );

        Ok(CreateDocumentResult { version })
    }
}
