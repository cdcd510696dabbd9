//! Version family errors.

use thiserror::Error;

use crate::domain::dependency::DependencyError;
use crate::domain::document::{DocumentStatus, VersionNumber};
use crate::domain::foundation::{BaseNumber, DocumentVersionId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FamilyError {
    #[error("Version {version_id} is not a member of family {base_number}")]
    NotAMember {
        base_number: BaseNumber,
        version_id: DocumentVersionId,
    },

    #[error("New versions can only be drafted from an EFFECTIVE version (source is {status})")]
    SourceNotEffective { status: DocumentStatus },

    #[error("Family {base_number} already has version {version} in progress")]
    InFlightVersionExists {
        base_number: BaseNumber,
        version: VersionNumber,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Cannot carry dependency over to the new version: {0}")]
    EdgeCopy(DependencyError),
}
