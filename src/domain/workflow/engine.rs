//! WorkflowEngine - pure transition planning.
//!
//! The engine never touches storage. Given the version, its family, the
//! dependency graph (when the action needs it), the open workflow instance
//! and the acting principal, it validates an action and returns a
//! [`TransitionPlan`]: the change set to commit plus the notifications to
//! send once the commit succeeds.
//!
//! Role membership is checked by the caller through the `RoleProvider`
//! port before planning; the engine enforces actor identity, segregation
//! of duties, source states, payload rules and family/graph guards.

use chrono::NaiveDate;

use crate::domain::audit::{AuditRecorder, TransitionRecord};
use crate::domain::dependency::DependencyGraph;
use crate::domain::document::{DocumentStatus, DocumentVersion};
use crate::domain::family::VersionFamily;
use crate::domain::foundation::{add_days, StateMachine, Timestamp, TransitionId, UserId};

use super::{
    ChangeSet, GuardViolation, Notification, NotificationEvent, ReviewOutcome, WorkflowAction,
    WorkflowError, WorkflowInstance, WorkflowType,
};

/// Service-level agreements applied to review and approval steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowPolicy {
    pub review_sla_days: u32,
    pub approval_sla_days: u32,
}

impl Default for WorkflowPolicy {
    fn default() -> Self {
        Self {
            review_sla_days: 5,
            approval_sla_days: 5,
        }
    }
}

/// Everything the engine reads to plan one action.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub version: &'a DocumentVersion,
    pub family: &'a VersionFamily,
    /// Required by `schedule_obsolescence` and `retire`.
    pub graph: Option<&'a DependencyGraph>,
    /// The version's open workflow instance, if any.
    pub active_workflow: Option<&'a WorkflowInstance>,
    pub actor_id: &'a UserId,
    pub now: Timestamp,
    pub today: NaiveDate,
}

/// Validated outcome of an action, ready to commit.
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    pub transition_id: TransitionId,
    pub new_status: DocumentStatus,
    pub changes: ChangeSet,
    pub notifications: Vec<Notification>,
}

/// What a single action does to the version it targets.
struct Step {
    to: DocumentStatus,
    workflow_type: WorkflowType,
    assignee: Option<UserId>,
    due_date: Option<NaiveDate>,
    closes_workflow: bool,
    notification: Option<Notification>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowEngine {
    policy: WorkflowPolicy,
}

impl WorkflowEngine {
    pub fn new(policy: WorkflowPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> WorkflowPolicy {
        self.policy
    }

    /// Validates `action` against `ctx` and plans the resulting writes.
    pub fn plan(
        &self,
        ctx: &TransitionContext<'_>,
        action: &WorkflowAction,
    ) -> Result<TransitionPlan, WorkflowError> {
        let mut version = ctx.version.clone();
        let mut changes = ChangeSet::new();

        let step = match action {
            WorkflowAction::SubmitForReview { reviewer_id, .. } => {
                self.submit_for_review(ctx, &mut version, reviewer_id.as_ref())?
            }
            WorkflowAction::StartReview { .. } => self.start_review(ctx, &version)?,
            WorkflowAction::CompleteReview { outcome, .. } => {
                self.complete_review(ctx, &version, *outcome, action.comment())?
            }
            WorkflowAction::RouteForApproval { approver_id, .. } => {
                self.route_for_approval(ctx, &mut version, approver_id.as_ref())?
            }
            WorkflowAction::Approve {
                outcome,
                effective_date,
                ..
            } => self.approve(ctx, &mut version, *outcome, *effective_date, action.comment())?,
            WorkflowAction::Activate { .. } => self.activate(ctx, &version)?,
            WorkflowAction::ScheduleObsolescence {
                target_date,
                reason,
                ..
            } => {
                let graph = Self::require_graph(ctx)?;
                changes.expected_graph_revision = Some(graph.revision());
                self.schedule_obsolescence(ctx, graph, &mut version, *target_date, reason)?
            }
            WorkflowAction::Retire { .. } => {
                let graph = Self::require_graph(ctx)?;
                changes.expected_graph_revision = Some(graph.revision());
                self.retire(ctx, graph, &version)?
            }
            WorkflowAction::Terminate { reason } => self.terminate(ctx, &version, reason)?,
        };

        version
            .status()
            .transition_to(step.to)
            .map_err(|_| GuardViolation::invalid_state(action.name(), version.status()))?;

        let mut workflow = match ctx.active_workflow {
            Some(open) if !open.is_terminated && open.workflow_type == step.workflow_type => {
                open.clone()
            }
            _ => WorkflowInstance::open(version.id(), step.workflow_type, version.status(), ctx.now),
        };

        let comment = action.comment().map(str::to_string);
        let record = AuditRecorder::transition(
            &mut version,
            step.to,
            workflow.id,
            ctx.actor_id,
            comment,
            ctx.now,
        );
        if step.closes_workflow {
            workflow.terminate(step.to, ctx.now);
        } else {
            workflow.advance(step.to, step.assignee, step.due_date, ctx.now);
        }

        let transition_id = record.id;
        let new_status = step.to;
        let mut notifications: Vec<Notification> = step.notification.into_iter().collect();

        if new_status == DocumentStatus::Effective {
            self.supersede_prior(ctx, &version, &mut changes, &mut notifications);
            notifications.push(Notification::new(
                NotificationEvent::BecameEffective,
                version.id(),
                Self::stakeholders(&version),
                format!("{} is now effective", version.label()),
            ));
        }

        changes.updated_versions.insert(0, version);
        changes.workflows.insert(0, workflow);
        changes.transitions.insert(0, record);

        Ok(TransitionPlan {
            transition_id,
            new_status,
            changes,
            notifications,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn submit_for_review(
        &self,
        ctx: &TransitionContext<'_>,
        version: &mut DocumentVersion,
        reviewer_id: Option<&UserId>,
    ) -> Result<Step, WorkflowError> {
        Self::expect_status("submit_for_review", version, DocumentStatus::Draft)?;
        Self::require_author(ctx, version)?;

        let reviewer = reviewer_id
            .or(version.reviewer_id())
            .cloned()
            .ok_or_else(|| GuardViolation::missing_field("reviewer_id"))?;
        if version.is_authored_by(&reviewer) {
            return Err(GuardViolation::segregation("The reviewer must not be the author").into());
        }
        version.assign_reviewer(reviewer.clone());

        Ok(Step {
            to: DocumentStatus::PendingReview,
            workflow_type: WorkflowType::Approval,
            assignee: Some(reviewer.clone()),
            due_date: Some(add_days(ctx.today, self.policy.review_sla_days)),
            closes_workflow: false,
            notification: Some(Notification::new(
                NotificationEvent::ReviewRequested,
                version.id(),
                [reviewer],
                format!("{} is awaiting review", version.label()),
            )),
        })
    }

    fn start_review(
        &self,
        ctx: &TransitionContext<'_>,
        version: &DocumentVersion,
    ) -> Result<Step, WorkflowError> {
        Self::expect_status("start_review", version, DocumentStatus::PendingReview)?;
        Self::require_reviewer(ctx, version)?;

        Ok(Step {
            to: DocumentStatus::UnderReview,
            workflow_type: WorkflowType::Approval,
            assignee: Some(ctx.actor_id.clone()),
            due_date: ctx.active_workflow.and_then(|wf| wf.due_date),
            closes_workflow: false,
            notification: Some(Notification::new(
                NotificationEvent::ReviewStarted,
                version.id(),
                [version.author_id().clone()],
                format!("Review of {} has started", version.label()),
            )),
        })
    }

    fn complete_review(
        &self,
        ctx: &TransitionContext<'_>,
        version: &DocumentVersion,
        outcome: ReviewOutcome,
        comment: Option<&str>,
    ) -> Result<Step, WorkflowError> {
        Self::expect_status("complete_review", version, DocumentStatus::UnderReview)?;
        Self::require_reviewer(ctx, version)?;

        let (to, event, summary) = match outcome {
            ReviewOutcome::Approve => (
                DocumentStatus::Reviewed,
                NotificationEvent::ReviewCompleted,
                format!("{} passed review and can be routed for approval", version.label()),
            ),
            ReviewOutcome::Reject => {
                Self::require_comment(comment)?;
                (
                    DocumentStatus::Draft,
                    NotificationEvent::ReviewRejected,
                    format!("{} was returned to draft by the reviewer", version.label()),
                )
            }
        };

        Ok(Step {
            to,
            workflow_type: WorkflowType::Approval,
            assignee: Some(version.author_id().clone()),
            due_date: None,
            closes_workflow: false,
            notification: Some(Notification::new(
                event,
                version.id(),
                [version.author_id().clone()],
                summary,
            )),
        })
    }

    fn route_for_approval(
        &self,
        ctx: &TransitionContext<'_>,
        version: &mut DocumentVersion,
        approver_id: Option<&UserId>,
    ) -> Result<Step, WorkflowError> {
        Self::expect_status("route_for_approval", version, DocumentStatus::Reviewed)?;
        Self::require_author(ctx, version)?;

        let approver = approver_id
            .or(version.approver_id())
            .cloned()
            .ok_or_else(|| GuardViolation::missing_field("approver_id"))?;
        if version.is_authored_by(&approver) {
            return Err(GuardViolation::segregation("The approver must not be the author").into());
        }
        version.assign_approver(approver.clone());

        Ok(Step {
            to: DocumentStatus::PendingApproval,
            workflow_type: WorkflowType::Approval,
            assignee: Some(approver.clone()),
            due_date: Some(add_days(ctx.today, self.policy.approval_sla_days)),
            closes_workflow: false,
            notification: Some(Notification::new(
                NotificationEvent::ApprovalRequested,
                version.id(),
                [approver],
                format!("{} is awaiting approval", version.label()),
            )),
        })
    }

    fn approve(
        &self,
        ctx: &TransitionContext<'_>,
        version: &mut DocumentVersion,
        outcome: ReviewOutcome,
        effective_date: Option<NaiveDate>,
        comment: Option<&str>,
    ) -> Result<Step, WorkflowError> {
        Self::expect_status("approve", version, DocumentStatus::PendingApproval)?;
        Self::require_approver(ctx, version)?;

        if outcome == ReviewOutcome::Reject {
            Self::require_comment(comment)?;
            return Ok(Step {
                to: DocumentStatus::Draft,
                workflow_type: WorkflowType::Approval,
                assignee: Some(version.author_id().clone()),
                due_date: None,
                closes_workflow: false,
                notification: Some(Notification::new(
                    NotificationEvent::ApprovalRejected,
                    version.id(),
                    [version.author_id().clone()],
                    format!("{} was returned to draft by the approver", version.label()),
                )),
            });
        }

        let effective_date =
            effective_date.ok_or_else(|| GuardViolation::missing_field("effective_date"))?;
        version.set_effective_date(effective_date);

        if effective_date > ctx.today {
            return Ok(Step {
                to: DocumentStatus::ApprovedPendingEffective,
                workflow_type: WorkflowType::Approval,
                assignee: None,
                due_date: Some(effective_date),
                closes_workflow: false,
                notification: Some(Notification::new(
                    NotificationEvent::Approved,
                    version.id(),
                    Self::stakeholders(version),
                    format!(
                        "{} approved, effective on {}",
                        version.label(),
                        effective_date
                    ),
                )),
            });
        }

        Ok(Self::effective_step())
    }

    fn activate(
        &self,
        ctx: &TransitionContext<'_>,
        version: &DocumentVersion,
    ) -> Result<Step, WorkflowError> {
        Self::expect_status("activate", version, DocumentStatus::ApprovedPendingEffective)?;

        let effective_date = version
            .effective_date()
            .ok_or_else(|| GuardViolation::missing_field("effective_date"))?;
        if effective_date > ctx.today {
            return Err(GuardViolation::not_due(format!(
                "{} is not effective until {}",
                version.label(),
                effective_date
            ))
            .into());
        }

        Ok(Self::effective_step())
    }

    fn schedule_obsolescence(
        &self,
        ctx: &TransitionContext<'_>,
        graph: &DependencyGraph,
        version: &mut DocumentVersion,
        target_date: NaiveDate,
        reason: &str,
    ) -> Result<Step, WorkflowError> {
        Self::expect_status("schedule_obsolescence", version, DocumentStatus::Effective)?;

        if !ctx.family.is_latest(version.id()) {
            return Err(GuardViolation::not_latest().into());
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(GuardViolation::missing_field("reason").into());
        }
        if target_date < ctx.today {
            return Err(GuardViolation::invalid_value("target_date", "must not be in the past").into());
        }

        let check = graph.can_retire_family(version.base_number());
        if !check.is_clear() {
            return Err(WorkflowError::RetirementBlocked(check));
        }

        version.set_obsolescence(target_date, reason.to_string());

        Ok(Step {
            to: DocumentStatus::ScheduledForObsolescence,
            workflow_type: WorkflowType::Obsolescence,
            assignee: None,
            due_date: Some(target_date),
            closes_workflow: false,
            notification: Some(Notification::new(
                NotificationEvent::ObsolescenceScheduled,
                version.id(),
                Self::stakeholders(version),
                format!("{} will be retired on {}: {}", version.label(), target_date, reason),
            )),
        })
    }

    fn retire(
        &self,
        ctx: &TransitionContext<'_>,
        graph: &DependencyGraph,
        version: &DocumentVersion,
    ) -> Result<Step, WorkflowError> {
        Self::expect_status("retire", version, DocumentStatus::ScheduledForObsolescence)?;

        let obsolescence_date = version
            .obsolescence_date()
            .ok_or_else(|| GuardViolation::missing_field("obsolescence_date"))?;
        if obsolescence_date > ctx.today {
            return Err(GuardViolation::not_due(format!(
                "{} is not due for retirement until {}",
                version.label(),
                obsolescence_date
            ))
            .into());
        }

        let check = graph.can_retire_family(version.base_number());
        if !check.is_clear() {
            return Err(WorkflowError::RetirementBlocked(check));
        }

        Ok(Step {
            to: DocumentStatus::Obsolete,
            workflow_type: WorkflowType::Obsolescence,
            assignee: None,
            due_date: None,
            closes_workflow: true,
            notification: Some(Notification::new(
                NotificationEvent::Retired,
                version.id(),
                Self::stakeholders(version),
                format!("{} is now obsolete", version.label()),
            )),
        })
    }

    fn terminate(
        &self,
        ctx: &TransitionContext<'_>,
        version: &DocumentVersion,
        reason: &str,
    ) -> Result<Step, WorkflowError> {
        if !version.status().is_terminable() {
            return Err(GuardViolation::invalid_state("terminate", version.status()).into());
        }
        Self::require_author(ctx, version)?;
        if reason.trim().is_empty() {
            return Err(GuardViolation::missing_field("reason").into());
        }

        let recipients: Vec<UserId> = version
            .reviewer_id()
            .into_iter()
            .chain(version.approver_id())
            .cloned()
            .collect();

        Ok(Step {
            to: DocumentStatus::Terminated,
            workflow_type: WorkflowType::Approval,
            assignee: None,
            due_date: None,
            closes_workflow: true,
            notification: Some(Notification::new(
                NotificationEvent::Terminated,
                version.id(),
                recipients,
                format!("{} was terminated", version.label()),
            )),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn effective_step() -> Step {
        Step {
            to: DocumentStatus::Effective,
            workflow_type: WorkflowType::Approval,
            assignee: None,
            due_date: None,
            closes_workflow: true,
            notification: None,
        }
    }

    /// Moves every other EFFECTIVE family member to SUPERSEDED, each under
    /// its own supersession instance.
    fn supersede_prior(
        &self,
        ctx: &TransitionContext<'_>,
        incoming: &DocumentVersion,
        changes: &mut ChangeSet,
        notifications: &mut Vec<Notification>,
    ) {
        for prior in ctx.family.supersession_targets(incoming.id()) {
            let mut prior = prior.clone();
            let mut workflow = WorkflowInstance::open(
                prior.id(),
                WorkflowType::Supersession,
                prior.status(),
                ctx.now,
            );
            let record: TransitionRecord = AuditRecorder::transition(
                &mut prior,
                DocumentStatus::Superseded,
                workflow.id,
                ctx.actor_id,
                Some(format!("Superseded by {}", incoming.label())),
                ctx.now,
            );
            workflow.terminate(DocumentStatus::Superseded, ctx.now);

            notifications.push(Notification::new(
                NotificationEvent::Superseded,
                prior.id(),
                [prior.author_id().clone()],
                format!("{} was superseded by {}", prior.label(), incoming.label()),
            ));
            changes.transitions.push(record);
            changes.workflows.push(workflow);
            changes.updated_versions.push(prior);
        }
    }

    fn stakeholders(version: &DocumentVersion) -> Vec<UserId> {
        std::iter::once(version.author_id())
            .chain(version.reviewer_id())
            .chain(version.approver_id())
            .cloned()
            .collect()
    }

    fn require_graph<'a>(ctx: &TransitionContext<'a>) -> Result<&'a DependencyGraph, WorkflowError> {
        ctx.graph.ok_or_else(|| {
            WorkflowError::Infrastructure("dependency graph was not loaded for this action".into())
        })
    }

    fn expect_status(
        action: &str,
        version: &DocumentVersion,
        expected: DocumentStatus,
    ) -> Result<(), GuardViolation> {
        if version.status() == expected {
            Ok(())
        } else {
            Err(GuardViolation::invalid_state(action, version.status()))
        }
    }

    fn require_author(ctx: &TransitionContext<'_>, version: &DocumentVersion) -> Result<(), GuardViolation> {
        if version.is_authored_by(ctx.actor_id) {
            Ok(())
        } else {
            Err(GuardViolation::wrong_actor("author"))
        }
    }

    fn require_reviewer(ctx: &TransitionContext<'_>, version: &DocumentVersion) -> Result<(), GuardViolation> {
        if version.reviewer_id() == Some(ctx.actor_id) {
            Ok(())
        } else {
            Err(GuardViolation::wrong_actor("assigned reviewer"))
        }
    }

    fn require_approver(ctx: &TransitionContext<'_>, version: &DocumentVersion) -> Result<(), GuardViolation> {
        if version.approver_id() == Some(ctx.actor_id) {
            Ok(())
        } else {
            Err(GuardViolation::wrong_actor("assigned approver"))
        }
    }

    fn require_comment(comment: Option<&str>) -> Result<(), GuardViolation> {
        match comment.map(str::trim) {
            Some(text) if !text.is_empty() => Ok(()),
            _ => Err(GuardViolation::missing_field("comment")),
        }
    }
}
