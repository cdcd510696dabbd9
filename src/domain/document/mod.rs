//! Document module - Controlled document versions and their status machine.
//!
//! A DocumentVersion is one revision of a controlled document. Its status
//! moves only through the workflow engine; records are never deleted.

mod status;
mod version;

pub use status::DocumentStatus;
pub use version::{
    AuditHead, DocumentVersion, DocumentVersionParts, Revision, VersionNumber, VersionType,
    MAX_TITLE_LENGTH,
};
