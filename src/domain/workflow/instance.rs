//! Workflow instances bound to a document version.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::document::DocumentStatus;
use crate::domain::foundation::{
    DocumentVersionId, Timestamp, UserId, ValidationError, WorkflowInstanceId,
};

/// The fixed set of workflows a version can run through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    /// Authoring, review and approval up to EFFECTIVE or TERMINATED.
    Approval,
    /// Scheduled retirement of an EFFECTIVE version.
    Obsolescence,
    /// Replacement of an EFFECTIVE version by a newer family member.
    Supersession,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::Approval => "approval",
            WorkflowType::Obsolescence => "obsolescence",
            WorkflowType::Supersession => "supersession",
        }
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkflowType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approval" => Ok(WorkflowType::Approval),
            "obsolescence" => Ok(WorkflowType::Obsolescence),
            "supersession" => Ok(WorkflowType::Supersession),
            other => Err(ValidationError::invalid_format(
                "workflow_type",
                format!("unknown workflow type '{}'", other),
            )),
        }
    }
}

/// One run of a workflow over a document version.
///
/// A version has at most one open (non-terminated) instance at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: WorkflowInstanceId,
    pub document_version_id: DocumentVersionId,
    pub workflow_type: WorkflowType,
    pub current_state: DocumentStatus,
    pub assignee_id: Option<UserId>,
    pub due_date: Option<NaiveDate>,
    pub is_terminated: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WorkflowInstance {
    /// Opens an instance for a version currently in `state`.
    pub fn open(
        document_version_id: DocumentVersionId,
        workflow_type: WorkflowType,
        state: DocumentStatus,
        now: Timestamp,
    ) -> Self {
        Self {
            id: WorkflowInstanceId::new(),
            document_version_id,
            workflow_type,
            current_state: state,
            assignee_id: None,
            due_date: None,
            is_terminated: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the instance along with its version.
    pub fn advance(
        &mut self,
        state: DocumentStatus,
        assignee_id: Option<UserId>,
        due_date: Option<NaiveDate>,
        now: Timestamp,
    ) {
        self.current_state = state;
        self.assignee_id = assignee_id;
        self.due_date = due_date;
        self.updated_at = now;
    }

    /// Records the final state and closes the instance.
    pub fn terminate(&mut self, state: DocumentStatus, now: Timestamp) {
        self.advance(state, None, None, now);
        self.is_terminated = true;
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_terminated && self.due_date.map(|due| due < today).unwrap_or(false)
    }
}
