//! Notification sender that emits tracing events.
//!
//! Used when no delivery channel is configured. Downstream log shipping can
//! route `target = "doc_lifecycle::notifications"` to mail or chat.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::workflow::Notification;
use crate::ports::NotificationSender;

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotificationSender;

impl LoggingNotificationSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSender for LoggingNotificationSender {
    async fn notify(&self, notification: &Notification) -> Result<(), DomainError> {
        let recipients: Vec<&str> = notification.recipients.iter().map(|r| r.as_str()).collect();
        tracing::info!(
            target: "doc_lifecycle::notifications",
            event_type = %notification.event_type,
            document_version_id = %notification.document_version_id,
            recipients = ?recipients,
            "{}",
            notification.summary
        );
        Ok(())
    }
}
