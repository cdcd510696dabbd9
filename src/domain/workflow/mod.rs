//! Workflow module - Role-gated status transitions for document versions.
//!
//! # Flow
//!
//! ```text
//! DRAFT → PENDING_REVIEW → UNDER_REVIEW → REVIEWED → PENDING_APPROVAL
//!       → APPROVED_PENDING_EFFECTIVE → EFFECTIVE
//!       → SCHEDULED_FOR_OBSOLESCENCE → OBSOLETE
//! ```
//!
//! EFFECTIVE versions become SUPERSEDED when a newer family member takes
//! effect. Anything before approval may be TERMINATED by its author.

mod action;
mod change_set;
mod engine;
mod errors;
mod instance;
mod notification;

pub use action::{ReviewOutcome, WorkflowAction};
pub use change_set::ChangeSet;
pub use engine::{TransitionContext, TransitionPlan, WorkflowEngine, WorkflowPolicy};
pub use errors::{GuardKind, GuardViolation, WorkflowError};
pub use instance::{WorkflowInstance, WorkflowType};
pub use notification::{Notification, NotificationEvent};
