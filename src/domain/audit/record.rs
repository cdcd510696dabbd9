//! Append-only audit records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::document::DocumentStatus;
use crate::domain::foundation::{
    AuditEntryId, DependencyId, DocumentVersionId, Timestamp, TransitionId, UserId,
    ValidationError, WorkflowInstanceId,
};

/// One state change of one document version.
///
/// Records are never mutated or deleted. `hash` covers the record's
/// canonical fields plus `previous_hash`, chaining the records of a
/// version together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: TransitionId,
    pub workflow_instance_id: WorkflowInstanceId,
    pub document_version_id: DocumentVersionId,
    /// 1-based position in this version's chain.
    pub sequence: u64,
    pub from_state: DocumentStatus,
    pub to_state: DocumentStatus,
    pub actor_id: UserId,
    pub comment: Option<String>,
    pub timestamp: Timestamp,
    pub previous_hash: Option<String>,
    pub hash: String,
}

/// What happened to a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyChange {
    Added,
    /// Carried over onto a new version of the dependent's family.
    Copied,
    Deactivated,
}

impl DependencyChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyChange::Added => "added",
            DependencyChange::Copied => "copied",
            DependencyChange::Deactivated => "deactivated",
        }
    }
}

impl fmt::Display for DependencyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DependencyChange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(DependencyChange::Added),
            "copied" => Ok(DependencyChange::Copied),
            "deactivated" => Ok(DependencyChange::Deactivated),
            other => Err(ValidationError::invalid_format(
                "change",
                format!("unknown dependency change '{}'", other),
            )),
        }
    }
}

/// Audit entry for an edge mutation, written with the mutation itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyAuditEntry {
    pub id: AuditEntryId,
    pub dependency_id: DependencyId,
    pub document_version_id: DocumentVersionId,
    pub depends_on_version_id: DocumentVersionId,
    pub change: DependencyChange,
    pub actor_id: UserId,
    pub comment: Option<String>,
    pub timestamp: Timestamp,
}
