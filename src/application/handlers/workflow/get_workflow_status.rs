//! GetWorkflowStatusHandler - Query handler for a version's workflow view.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::audit::{AuditRecorder, TransitionRecord};
use crate::domain::document::DocumentStatus;
use crate::domain::foundation::{DocumentVersionId, UserId};
use crate::domain::workflow::{WorkflowError, WorkflowType};
use crate::ports::{Clock, DocumentStore};

use super::super::support::load_version;

#[derive(Debug, Clone)]
pub struct GetWorkflowStatusQuery {
    pub version_id: DocumentVersionId,
}

/// Current state of a version plus its verified transition history.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStatusView {
    pub version_id: DocumentVersionId,
    /// e.g. `SOP-1 v2.0`
    pub label: String,
    pub current_state: DocumentStatus,
    pub workflow_type: Option<WorkflowType>,
    pub assignee: Option<UserId>,
    pub due_date: Option<NaiveDate>,
    pub is_overdue: bool,
    pub history: Vec<TransitionRecord>,
    /// Whether the hash chain over `history` verifies.
    pub audit_intact: bool,
}

pub struct GetWorkflowStatusHandler {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl GetWorkflowStatusHandler {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn handle(
        &self,
        query: GetWorkflowStatusQuery,
    ) -> Result<WorkflowStatusView, WorkflowError> {
        let version = load_version(self.store.as_ref(), query.version_id).await?;
        let workflow = self.store.find_active_workflow(query.version_id).await?;
        let history = self.store.history(query.version_id).await?;

        let verification = AuditRecorder::verify_chain(&history);
        if !verification.intact {
            tracing::error!(
                version_id = %query.version_id,
                broken_at = ?verification.broken_at,
                "Transition audit chain failed verification"
            );
        }

        let today = self.clock.today();
        Ok(WorkflowStatusView {
            version_id: version.id(),
            label: version.label(),
            current_state: version.status(),
            workflow_type: workflow.as_ref().map(|wf| wf.workflow_type),
            assignee: workflow.as_ref().and_then(|wf| wf.assignee_id.clone()),
            due_date: workflow.as_ref().and_then(|wf| wf.due_date),
            is_overdue: workflow.as_ref().map(|wf| wf.is_overdue(today)).unwrap_or(false),
            history,
            audit_intact: verification.intact,
        })
    }
}
