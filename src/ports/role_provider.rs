//! RoleProvider port - Answers whether an actor holds a workflow role.
//!
//! User and role administration live outside this crate. The workflow only
//! asks a yes/no question before every action.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Role, UserId};

/// Port for role membership lookups.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// Returns `true` if `actor_id` currently holds `role`.
    ///
    /// Unknown actors hold no roles; they are not an error.
    async fn actor_has_role(&self, actor_id: &UserId, role: Role) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FixedRoles(HashSet<(String, Role)>);

    #[async_trait]
    impl RoleProvider for FixedRoles {
        async fn actor_has_role(&self, actor_id: &UserId, role: Role) -> Result<bool, DomainError> {
            Ok(self.0.contains(&(actor_id.as_str().to_string(), role)))
        }
    }

    #[tokio::test]
    async fn role_provider_is_object_safe() {
        let provider: Box<dyn RoleProvider> = Box::new(FixedRoles(HashSet::from([(
            "alice".to_string(),
            Role::Approver,
        )])));
        let alice = UserId::new("alice").unwrap();

        assert!(provider.actor_has_role(&alice, Role::Approver).await.unwrap());
        assert!(!provider.actor_has_role(&alice, Role::System).await.unwrap());
    }
}
