//! Document status state machine.
//!
//! Defines every lifecycle status a controlled document version can hold
//! and the transitions between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Lifecycle status of one document version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Being authored. Initial state.
    #[default]
    Draft,
    /// Submitted, waiting for the reviewer to pick it up.
    PendingReview,
    /// Reviewer is working on it.
    UnderReview,
    /// Review passed; back with the author to route for approval.
    Reviewed,
    /// Waiting for the approver's decision.
    PendingApproval,
    /// Approved with a future effective date.
    ApprovedPendingEffective,
    /// In force.
    Effective,
    /// In force until its obsolescence date.
    ScheduledForObsolescence,
    /// Retired. Terminal.
    Obsolete,
    /// Replaced by a newer version of the family. Terminal.
    Superseded,
    /// Cancelled before approval. Terminal.
    Terminated,
}

impl DocumentStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [DocumentStatus; 11] = [
        DocumentStatus::Draft,
        DocumentStatus::PendingReview,
        DocumentStatus::UnderReview,
        DocumentStatus::Reviewed,
        DocumentStatus::PendingApproval,
        DocumentStatus::ApprovedPendingEffective,
        DocumentStatus::Effective,
        DocumentStatus::ScheduledForObsolescence,
        DocumentStatus::Obsolete,
        DocumentStatus::Superseded,
        DocumentStatus::Terminated,
    ];

    /// Returns the canonical storage name (e.g. `PENDING_REVIEW`).
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "DRAFT",
            DocumentStatus::PendingReview => "PENDING_REVIEW",
            DocumentStatus::UnderReview => "UNDER_REVIEW",
            DocumentStatus::Reviewed => "REVIEWED",
            DocumentStatus::PendingApproval => "PENDING_APPROVAL",
            DocumentStatus::ApprovedPendingEffective => "APPROVED_PENDING_EFFECTIVE",
            DocumentStatus::Effective => "EFFECTIVE",
            DocumentStatus::ScheduledForObsolescence => "SCHEDULED_FOR_OBSOLESCENCE",
            DocumentStatus::Obsolete => "OBSOLETE",
            DocumentStatus::Superseded => "SUPERSEDED",
            DocumentStatus::Terminated => "TERMINATED",
        }
    }

    /// Authoring pipeline up to (and including) approval with a future date.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Draft
                | DocumentStatus::PendingReview
                | DocumentStatus::UnderReview
                | DocumentStatus::Reviewed
                | DocumentStatus::PendingApproval
                | DocumentStatus::ApprovedPendingEffective
        )
    }

    /// Currently governing practice.
    pub fn is_in_force(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Effective | DocumentStatus::ScheduledForObsolescence
        )
    }

    /// A dependent in one of these statuses blocks retirement of what it depends on.
    pub fn is_live_dependent(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Effective | DocumentStatus::ApprovedPendingEffective
        )
    }

    /// States from which the author may terminate the version.
    pub fn is_terminable(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Draft
                | DocumentStatus::PendingReview
                | DocumentStatus::UnderReview
                | DocumentStatus::Reviewed
                | DocumentStatus::PendingApproval
        )
    }

    /// Whether other versions may start depending on a version in this status.
    pub fn accepts_dependents(&self) -> bool {
        !matches!(self, DocumentStatus::Obsolete | DocumentStatus::Terminated)
    }
}

impl StateMachine for DocumentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use DocumentStatus::*;
        matches!(
            (self, target),
            (Draft, PendingReview)
                | (PendingReview, UnderReview)
                | (UnderReview, Reviewed)
                | (UnderReview, Draft)
                | (Reviewed, PendingApproval)
                | (PendingApproval, ApprovedPendingEffective)
                | (PendingApproval, Effective)
                | (PendingApproval, Draft)
                | (ApprovedPendingEffective, Effective)
                | (Effective, ScheduledForObsolescence)
                | (Effective, Superseded)
                | (ScheduledForObsolescence, Obsolete)
                | (Draft, Terminated)
                | (PendingReview, Terminated)
                | (UnderReview, Terminated)
                | (Reviewed, Terminated)
                | (PendingApproval, Terminated)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DocumentStatus::*;
        match self {
            Draft => vec![PendingReview, Terminated],
            PendingReview => vec![UnderReview, Terminated],
            UnderReview => vec![Reviewed, Draft, Terminated],
            Reviewed => vec![PendingApproval, Terminated],
            PendingApproval => vec![ApprovedPendingEffective, Effective, Draft, Terminated],
            ApprovedPendingEffective => vec![Effective],
            Effective => vec![ScheduledForObsolescence, Superseded],
            ScheduledForObsolescence => vec![Obsolete],
            Obsolete | Superseded | Terminated => vec![],
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("status", format!("unknown status '{}'", s)))
    }
}
