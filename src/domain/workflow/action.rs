//! Workflow actions and their payloads.
//!
//! Callers name an action and pass a JSON payload; [`WorkflowAction::parse`]
//! turns the pair into a typed action or a guard violation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::foundation::{Role, UserId};

use super::GuardViolation;

/// Decision recorded by a reviewer or approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Approve,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum WorkflowAction {
    SubmitForReview {
        #[serde(default)]
        reviewer_id: Option<UserId>,
        #[serde(default)]
        comment: Option<String>,
    },
    StartReview {
        #[serde(default)]
        comment: Option<String>,
    },
    CompleteReview {
        outcome: ReviewOutcome,
        #[serde(default)]
        comment: Option<String>,
    },
    RouteForApproval {
        #[serde(default)]
        approver_id: Option<UserId>,
        #[serde(default)]
        comment: Option<String>,
    },
    Approve {
        outcome: ReviewOutcome,
        #[serde(default)]
        effective_date: Option<NaiveDate>,
        #[serde(default)]
        comment: Option<String>,
    },
    Activate {
        #[serde(default)]
        comment: Option<String>,
    },
    ScheduleObsolescence {
        target_date: NaiveDate,
        reason: String,
        #[serde(default)]
        comment: Option<String>,
    },
    Retire {
        #[serde(default)]
        comment: Option<String>,
    },
    Terminate {
        reason: String,
    },
}

impl WorkflowAction {
    /// Every action name accepted by [`Self::parse`].
    pub const NAMES: [&'static str; 9] = [
        "submit_for_review",
        "start_review",
        "complete_review",
        "route_for_approval",
        "approve",
        "activate",
        "schedule_obsolescence",
        "retire",
        "terminate",
    ];

    /// Builds an action from its name and JSON payload.
    ///
    /// A `null` payload is treated as `{}`.
    pub fn parse(name: &str, payload: Value) -> Result<Self, GuardViolation> {
        if !Self::NAMES.contains(&name) {
            return Err(GuardViolation::unknown_action(name));
        }
        let payload = if payload.is_null() { json!({}) } else { payload };
        serde_json::from_value(json!({ "action": name, "payload": payload }))
            .map_err(GuardViolation::invalid_payload)
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkflowAction::SubmitForReview { .. } => "submit_for_review",
            WorkflowAction::StartReview { .. } => "start_review",
            WorkflowAction::CompleteReview { .. } => "complete_review",
            WorkflowAction::RouteForApproval { .. } => "route_for_approval",
            WorkflowAction::Approve { .. } => "approve",
            WorkflowAction::Activate { .. } => "activate",
            WorkflowAction::ScheduleObsolescence { .. } => "schedule_obsolescence",
            WorkflowAction::Retire { .. } => "retire",
            WorkflowAction::Terminate { .. } => "terminate",
        }
    }

    /// Role the acting principal must hold.
    pub fn required_role(&self) -> Role {
        match self {
            WorkflowAction::SubmitForReview { .. }
            | WorkflowAction::RouteForApproval { .. }
            | WorkflowAction::Terminate { .. } => Role::Author,
            WorkflowAction::StartReview { .. } | WorkflowAction::CompleteReview { .. } => {
                Role::Reviewer
            }
            WorkflowAction::Approve { .. } | WorkflowAction::ScheduleObsolescence { .. } => {
                Role::Approver
            }
            WorkflowAction::Activate { .. } | WorkflowAction::Retire { .. } => Role::System,
        }
    }

    /// Free-text comment for the audit record.
    pub fn comment(&self) -> Option<&str> {
        match self {
            WorkflowAction::SubmitForReview { comment, .. }
            | WorkflowAction::StartReview { comment }
            | WorkflowAction::CompleteReview { comment, .. }
            | WorkflowAction::RouteForApproval { comment, .. }
            | WorkflowAction::Approve { comment, .. }
            | WorkflowAction::Activate { comment }
            | WorkflowAction::ScheduleObsolescence { comment, .. }
            | WorkflowAction::Retire { comment } => comment.as_deref(),
            WorkflowAction::Terminate { reason } => Some(reason.as_str()),
        }
    }
}
