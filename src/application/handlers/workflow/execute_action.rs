//! ExecuteActionHandler - Runs one guarded workflow action.
//!
//! Flow: role check, load version and family (plus the dependency graph for
//! obsolescence actions), plan in the engine, commit the change set, then
//! deliver notifications. Nothing is written when a guard fails.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::document::DocumentStatus;
use crate::domain::foundation::{CommandMetadata, DocumentVersionId, TransitionId};
use crate::domain::workflow::{TransitionContext, WorkflowAction, WorkflowEngine, WorkflowError};
use crate::ports::{Clock, DocumentStore, NotificationSender, RoleProvider};

use super::super::support::{deliver, load_family, load_graph, load_version, require_role};

/// Command to execute a named action against a document version.
#[derive(Debug, Clone)]
pub struct ExecuteActionCommand {
    pub version_id: DocumentVersionId,
    /// Action name, e.g. `"submit_for_review"`.
    pub action: String,
    /// Action payload; `null` means no fields.
    pub payload: Value,
}

/// Result of a committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteActionResult {
    pub new_status: DocumentStatus,
    pub transition_id: TransitionId,
    pub notifications_delivered: usize,
}

/// Handler for workflow actions.
pub struct ExecuteActionHandler {
    store: Arc<dyn DocumentStore>,
    roles: Arc<dyn RoleProvider>,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
    engine: WorkflowEngine,
}

impl ExecuteActionHandler {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        roles: Arc<dyn RoleProvider>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
        engine: WorkflowEngine,
    ) -> Self {
        Self {
            store,
            roles,
            notifier,
            clock,
            engine,
        }
    }

    pub async fn handle(
        &self,
        cmd: ExecuteActionCommand,
        metadata: CommandMetadata,
    ) -> Result<ExecuteActionResult, WorkflowError> {
        let action = WorkflowAction::parse(&cmd.action, cmd.payload)?;
        self.execute(cmd.version_id, &action, &metadata).await
    }

    /// Runs an already-typed action. The scheduler enters here.
    pub async fn execute(
        &self,
        version_id: DocumentVersionId,
        action: &WorkflowAction,
        metadata: &CommandMetadata,
    ) -> Result<ExecuteActionResult, WorkflowError> {
        require_role(self.roles.as_ref(), metadata, action.required_role()).await?;

        let version = load_version(self.store.as_ref(), version_id).await?;
        let family = load_family(self.store.as_ref(), &version).await?;
        let graph = match action {
            WorkflowAction::ScheduleObsolescence { .. } | WorkflowAction::Retire { .. } => {
                Some(load_graph(self.store.as_ref()).await?)
            }
            _ => None,
        };
        let active_workflow = self.store.find_active_workflow(version_id).await?;

        let now = self.clock.now();
        let ctx = TransitionContext {
            version: &version,
            family: &family,
            graph: graph.as_ref(),
            active_workflow: active_workflow.as_ref(),
            actor_id: &metadata.actor_id,
            now,
            today: self.clock.today(),
        };

        let plan = match self.engine.plan(&ctx, action) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::info!(
                    version_id = %version_id,
                    action = action.name(),
                    actor_id = %metadata.actor_id,
                    error = %e,
                    "Workflow action rejected"
                );
                return Err(e);
            }
        };

        let from = version.status();
        self.store.commit(plan.changes).await?;

        tracing::info!(
            version_id = %version_id,
            document = %version.label(),
            action = action.name(),
            from = %from,
            to = %plan.new_status,
            actor_id = %metadata.actor_id,
            source = metadata.source(),
            correlation_id = %metadata.correlation_id(),
            "Workflow transition committed"
        );

        let notifications_delivered = deliver(self.notifier.as_ref(), &plan.notifications).await;

        Ok(ExecuteActionResult {
            new_status: plan.new_status,
            transition_id: plan.transition_id,
            notifications_delivered,
        })
    }
}
