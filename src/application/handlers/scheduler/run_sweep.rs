//! RunSweepHandler - One pass of the date-driven scheduler.
//!
//! 1. APPROVED_PENDING_EFFECTIVE versions with `effective_date <= today` are activated
//! 2. SCHEDULED_FOR_OBSOLESCENCE versions with `obsolescence_date <= today` are retired
//!
//! Each version goes through [`ExecuteActionHandler::execute`] as the system
//! actor, so the same guards apply as for a manual call. A version that
//! fails is reported and picked up again on the next sweep. Running the
//! sweep twice on the same day changes nothing the second time.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{CommandMetadata, DocumentVersionId, ErrorCode, UserId};
use crate::domain::workflow::{WorkflowAction, WorkflowError};
use crate::ports::{Clock, DocumentStore, DueKind};

use super::super::workflow::ExecuteActionHandler;

/// A version the sweep could not move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepFailure {
    pub version_id: DocumentVersionId,
    /// `"activate"` or `"retire"`.
    pub action: String,
    pub code: ErrorCode,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub activated: Vec<DocumentVersionId>,
    pub retired: Vec<DocumentVersionId>,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.activated.len() + self.retired.len() + self.failures.len()
    }
}

pub struct RunSweepHandler {
    store: Arc<dyn DocumentStore>,
    executor: Arc<ExecuteActionHandler>,
    clock: Arc<dyn Clock>,
    system_actor: UserId,
}

impl RunSweepHandler {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        executor: Arc<ExecuteActionHandler>,
        clock: Arc<dyn Clock>,
        system_actor: UserId,
    ) -> Self {
        Self {
            store,
            executor,
            clock,
            system_actor,
        }
    }

    /// Runs one sweep. Only a failure to list due versions is returned as
    /// an error; per-version failures land in the report.
    pub async fn handle(&self) -> Result<SweepReport, WorkflowError> {
        let today = self.clock.today();
        let metadata = CommandMetadata::new(self.system_actor.clone()).with_source("scheduler");
        let mut report = SweepReport::default();

        let due = self.store.find_due(DueKind::Activation, today).await?;
        for version in due {
            let action = WorkflowAction::Activate {
                comment: Some(format!("Scheduled activation on {}", today)),
            };
            match self.executor.execute(version.id(), &action, &metadata).await {
                Ok(_) => report.activated.push(version.id()),
                Err(e) => report.failures.push(Self::failure(version.id(), &action, e)),
            }
        }

        let due = self.store.find_due(DueKind::Retirement, today).await?;
        for version in due {
            let action = WorkflowAction::Retire {
                comment: Some(format!("Scheduled retirement on {}", today)),
            };
            match self.executor.execute(version.id(), &action, &metadata).await {
                Ok(_) => report.retired.push(version.id()),
                Err(e) => report.failures.push(Self::failure(version.id(), &action, e)),
            }
        }

        if report.processed() > 0 {
            tracing::info!(
                today = %today,
                activated = report.activated.len(),
                retired = report.retired.len(),
                failed = report.failures.len(),
                "Scheduler sweep finished"
            );
        } else {
            tracing::debug!(today = %today, "Scheduler sweep found nothing due");
        }

        Ok(report)
    }

    fn failure(
        version_id: DocumentVersionId,
        action: &WorkflowAction,
        error: WorkflowError,
    ) -> SweepFailure {
        tracing::warn!(
            version_id = %version_id,
            action = action.name(),
            error = %error,
            retryable = error.is_retryable(),
            "Scheduler could not process version"
        );
        SweepFailure {
            version_id,
            action: action.name().to_string(),
            code: error.code(),
            error: error.to_string(),
        }
    }
}
