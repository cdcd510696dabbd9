//! Shared wiring for handler unit tests.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::adapters::clock::FixedClock;
use crate::adapters::identity::StaticRoleProvider;
use crate::adapters::memory::InMemoryDocumentStore;
use crate::adapters::notification::RecordingNotificationSender;
use crate::domain::document::DocumentVersion;
use crate::domain::foundation::{CommandMetadata, DocumentVersionId, Role, UserId};
use crate::domain::workflow::WorkflowEngine;
use crate::ports::Clock;

use super::document::{CreateDocumentCommand, CreateDocumentHandler};
use super::workflow::{ExecuteActionCommand, ExecuteActionHandler};

pub(crate) const SYSTEM_ACTOR: &str = "scheduler";

pub(crate) fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub(crate) fn meta(actor: &str) -> CommandMetadata {
    CommandMetadata::new(user(actor)).with_source("test")
}

pub(crate) fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

pub(crate) struct Fixture {
    pub store: Arc<InMemoryDocumentStore>,
    pub roles: Arc<StaticRoleProvider>,
    pub notifier: Arc<RecordingNotificationSender>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    pub fn new() -> Self {
        let roles = StaticRoleProvider::new()
            .with_roles(&user("author-1"), [Role::Author])
            .with_roles(&user("author-2"), [Role::Author])
            .with_roles(&user("reviewer-1"), [Role::Reviewer])
            .with_roles(&user("approver-1"), [Role::Approver])
            .with_system_actor(user(SYSTEM_ACTOR));

        Self {
            store: Arc::new(InMemoryDocumentStore::new()),
            roles: Arc::new(roles),
            notifier: Arc::new(RecordingNotificationSender::new()),
            clock: Arc::new(FixedClock::at_date(start_date())),
        }
    }

    pub fn execute_handler(&self) -> ExecuteActionHandler {
        ExecuteActionHandler::new(
            self.store.clone(),
            self.roles.clone(),
            self.notifier.clone(),
            self.clock.clone(),
            WorkflowEngine::default(),
        )
    }

    pub async fn create_document(&self, base_number: &str) -> DocumentVersion {
        CreateDocumentHandler::new(self.store.clone(), self.roles.clone(), self.clock.clone())
            .handle(
                CreateDocumentCommand {
                    base_number: base_number.to_string(),
                    title: format!("{} procedure", base_number),
                },
                meta("author-1"),
            )
            .await
            .unwrap()
            .version
    }

    pub async fn act(
        &self,
        version_id: DocumentVersionId,
        actor: &str,
        action: &str,
        payload: serde_json::Value,
    ) {
        self.execute_handler()
            .handle(
                ExecuteActionCommand {
                    version_id,
                    action: action.to_string(),
                    payload,
                },
                meta(actor),
            )
            .await
            .unwrap();
    }

    /// Walks a DRAFT through review and routing to PENDING_APPROVAL.
    pub async fn drive_to_pending_approval(&self, version_id: DocumentVersionId, author: &str) {
        self.act(version_id, author, "submit_for_review", json!({ "reviewer_id": "reviewer-1" }))
            .await;
        self.act(version_id, "reviewer-1", "start_review", json!(null)).await;
        self.act(version_id, "reviewer-1", "complete_review", json!({ "outcome": "approve" }))
            .await;
        self.act(version_id, author, "route_for_approval", json!({ "approver_id": "approver-1" }))
            .await;
    }

    /// Approves with today's date, landing directly in EFFECTIVE.
    pub async fn drive_to_effective(&self, version_id: DocumentVersionId) {
        self.drive_to_pending_approval(version_id, "author-1").await;
        let today = self.clock.now().date();
        self.act(
            version_id,
            "approver-1",
            "approve",
            json!({ "outcome": "approve", "effective_date": today }),
        )
        .await;
    }
}
