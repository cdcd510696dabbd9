//! Role enum for role-gated workflow actions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role an actor must hold to perform a workflow action.
///
/// Role administration lives outside this crate; the `RoleProvider` port
/// answers whether an actor holds a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Drafts documents, routes them and may terminate them.
    Author,
    /// Reviews submitted drafts.
    Reviewer,
    /// Approves documents and schedules obsolescence.
    Approver,
    /// Automated principal used by the scheduler.
    System,
}

impl Role {
    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Author => "author",
            Role::Reviewer => "reviewer",
            Role::Approver => "approver",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
