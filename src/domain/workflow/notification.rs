//! Notifications emitted after a transition commits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DocumentVersionId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    ReviewRequested,
    ReviewStarted,
    ReviewCompleted,
    ReviewRejected,
    ApprovalRequested,
    Approved,
    ApprovalRejected,
    BecameEffective,
    Superseded,
    ObsolescenceScheduled,
    Retired,
    Terminated,
}

impl NotificationEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationEvent::ReviewRequested => "review_requested",
            NotificationEvent::ReviewStarted => "review_started",
            NotificationEvent::ReviewCompleted => "review_completed",
            NotificationEvent::ReviewRejected => "review_rejected",
            NotificationEvent::ApprovalRequested => "approval_requested",
            NotificationEvent::Approved => "approved",
            NotificationEvent::ApprovalRejected => "approval_rejected",
            NotificationEvent::BecameEffective => "became_effective",
            NotificationEvent::Superseded => "superseded",
            NotificationEvent::ObsolescenceScheduled => "obsolescence_scheduled",
            NotificationEvent::Retired => "retired",
            NotificationEvent::Terminated => "terminated",
        }
    }
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fire-and-forget message about a document version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub event_type: NotificationEvent,
    pub document_version_id: DocumentVersionId,
    pub recipients: Vec<UserId>,
    pub summary: String,
}

impl Notification {
    /// Builds a notification, dropping duplicate recipients.
    pub fn new(
        event_type: NotificationEvent,
        document_version_id: DocumentVersionId,
        recipients: impl IntoIterator<Item = UserId>,
        summary: impl Into<String>,
    ) -> Self {
        let mut unique: Vec<UserId> = Vec::new();
        for recipient in recipients {
            if !unique.contains(&recipient) {
                unique.push(recipient);
            }
        }
        Self {
            event_type,
            document_version_id,
            recipients: unique,
            summary: summary.into(),
        }
    }
}
