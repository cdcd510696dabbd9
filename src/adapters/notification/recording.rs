//! In-memory notification sender for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::workflow::{Notification, NotificationEvent};
use crate::ports::NotificationSender;

/// Records every delivered notification. Can be switched into a failing
/// mode to exercise delivery errors.
#[derive(Debug, Default)]
pub struct RecordingNotificationSender {
    sent: RwLock<Vec<Notification>>,
    failing: AtomicBool,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: every delivery fails until `set_failing(false)`.
    pub fn failing() -> Self {
        let sender = Self::default();
        sender.set_failing(true);
        sender
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }

    pub async fn events(&self) -> Vec<NotificationEvent> {
        self.sent.read().await.iter().map(|n| n.event_type).collect()
    }

    pub async fn clear(&self) {
        self.sent.write().await.clear();
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn notify(&self, notification: &Notification) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Notification channel unavailable",
            ));
        }
        self.sent.write().await.push(notification.clone());
        Ok(())
    }
}
