//! Dependency edge entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    DependencyId, DocumentVersionId, Timestamp, UserId, ValidationError,
};

/// How strongly a dependent relies on the version it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    #[default]
    Reference,
    Critical,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Reference => "reference",
            DependencyType::Critical => "critical",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DependencyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reference" => Ok(DependencyType::Reference),
            "critical" => Ok(DependencyType::Critical),
            other => Err(ValidationError::invalid_format(
                "dependency_type",
                format!("unknown dependency type '{}'", other),
            )),
        }
    }
}

/// Directed edge: `document_version_id` depends on `depends_on_version_id`.
///
/// Edges are never deleted. Removal flips `is_active` and stamps
/// `deactivated_at`; inactive edges are ignored by every graph check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: DependencyId,
    pub document_version_id: DocumentVersionId,
    pub depends_on_version_id: DocumentVersionId,
    pub dependency_type: DependencyType,
    pub is_active: bool,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub deactivated_at: Option<Timestamp>,
}

impl Dependency {
    /// Creates a new active edge.
    pub fn new(
        dependent: DocumentVersionId,
        depends_on: DocumentVersionId,
        dependency_type: DependencyType,
        created_by: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id: DependencyId::new(),
            document_version_id: dependent,
            depends_on_version_id: depends_on,
            dependency_type,
            is_active: true,
            created_by,
            created_at: now,
            deactivated_at: None,
        }
    }

    /// Copy of this edge for a new dependent, pointing at `target`.
    pub fn copy_for(
        &self,
        dependent: DocumentVersionId,
        target: DocumentVersionId,
        created_by: UserId,
        now: Timestamp,
    ) -> Self {
        Self::new(dependent, target, self.dependency_type, created_by, now)
    }

    /// Returns the soft-deleted form of this edge.
    pub fn deactivated(&self, now: Timestamp) -> Self {
        Self {
            is_active: false,
            deactivated_at: Some(now),
            ..self.clone()
        }
    }

    pub fn connects(&self, from: DocumentVersionId, to: DocumentVersionId) -> bool {
        self.document_version_id == from && self.depends_on_version_id == to
    }
}
