//! Static role provider backed by a YAML role map.
//!
//! File format:
//!
//! ```yaml
//! roles:
//!   alice: [author]
//!   bob: [reviewer, approver]
//! ```
//!
//! The configured system actor always holds `Role::System` and nothing else
//! unless the map says so.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::foundation::{DomainError, ErrorCode, Role, UserId};
use crate::ports::RoleProvider;

/// On-disk shape of the role map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMapFile {
    #[serde(default)]
    pub roles: BTreeMap<String, BTreeSet<Role>>,
}

#[derive(Debug, Clone, Default)]
pub struct StaticRoleProvider {
    grants: HashMap<String, HashSet<Role>>,
    system_actor: Option<UserId>,
}

impl StaticRoleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML role map.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DomainError> {
        let file: RoleMapFile = serde_yaml::from_str(yaml).map_err(|e| {
            DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Invalid role map: {}", e),
            )
        })?;

        let mut provider = Self::new();
        for (actor, roles) in file.roles {
            let actor = UserId::new(actor)?;
            provider = provider.with_roles(&actor, roles);
        }
        Ok(provider)
    }

    /// Reads and parses a YAML role map from disk.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).await.map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to read role map {}: {}", path.display(), e),
            )
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Builder: grant `roles` to `actor` in addition to any existing grants.
    pub fn with_roles(mut self, actor: &UserId, roles: impl IntoIterator<Item = Role>) -> Self {
        self.grants
            .entry(actor.as_str().to_string())
            .or_default()
            .extend(roles);
        self
    }

    /// Builder: the principal the scheduler acts as.
    pub fn with_system_actor(mut self, actor: UserId) -> Self {
        self.system_actor = Some(actor);
        self
    }

    pub fn actor_count(&self) -> usize {
        self.grants.len()
    }
}

#[async_trait]
impl RoleProvider for StaticRoleProvider {
    async fn actor_has_role(&self, actor_id: &UserId, role: Role) -> Result<bool, DomainError> {
        if role == Role::System && self.system_actor.as_ref() == Some(actor_id) {
            return Ok(true);
        }
        Ok(self
            .grants
            .get(actor_id.as_str())
            .map(|roles| roles.contains(&role))
            .unwrap_or(false))
    }
}
