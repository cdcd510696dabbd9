//! NotificationSender port - Fire-and-forget delivery of workflow notices.
//!
//! Called only after a transition has committed. A delivery failure is
//! logged by the caller and never rolls the transition back.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::workflow::Notification;

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), DomainError>;
}
