//! DocumentVersion aggregate entity.
//!
//! One version of a controlled document. Versions sharing a base number
//! form a family. Status only changes through the workflow engine; the
//! store bumps `revision` on every committed update.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    BaseNumber, DocumentVersionId, Timestamp, UserId, ValidationError,
};

use super::DocumentStatus;

/// Maximum length for document title.
pub const MAX_TITLE_LENGTH: usize = 500;

/// `major.minor` version number. Ordering compares major first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionNumber {
    pub major: u32,
    pub minor: u32,
}

/// Kind of revision requested when drafting a new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    Major,
    Minor,
}

impl VersionNumber {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Number given to the first version of a family.
    pub fn initial() -> Self {
        Self::new(1, 0)
    }

    /// Next number after this one for the given revision kind.
    pub fn bump(&self, version_type: VersionType) -> Self {
        match version_type {
            VersionType::Major => Self::new(self.major.saturating_add(1), 0),
            VersionType::Minor => Self::new(self.major, self.minor.saturating_add(1)),
        }
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Optimistic-concurrency token for a stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    pub fn initial() -> Self {
        Self(0)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of the last audit record in a version's transition chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditHead {
    pub sequence: u64,
    pub hash: String,
}

/// Every persisted field of a version, used to rebuild it from storage.
#[derive(Debug, Clone)]
pub struct DocumentVersionParts {
    pub id: DocumentVersionId,
    pub base_number: BaseNumber,
    pub version: VersionNumber,
    pub title: String,
    pub status: DocumentStatus,
    pub author_id: UserId,
    pub reviewer_id: Option<UserId>,
    pub approver_id: Option<UserId>,
    pub effective_date: Option<NaiveDate>,
    pub obsolescence_date: Option<NaiveDate>,
    pub supersedes_id: Option<DocumentVersionId>,
    pub obsolescence_reason: Option<String>,
    pub change_reason: Option<String>,
    pub revision: Revision,
    pub audit_head: Option<AuditHead>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DocumentVersion aggregate.
///
/// # Invariants
///
/// - `title` is 1-500 characters, non-empty
/// - `supersedes_id`, when set, names an older member of the same family
/// - the record is never deleted; TERMINATED is a logical cancellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVersion {
    id: DocumentVersionId,
    base_number: BaseNumber,
    version: VersionNumber,
    title: String,
    status: DocumentStatus,
    author_id: UserId,
    reviewer_id: Option<UserId>,
    approver_id: Option<UserId>,
    effective_date: Option<NaiveDate>,
    obsolescence_date: Option<NaiveDate>,
    supersedes_id: Option<DocumentVersionId>,
    obsolescence_reason: Option<String>,
    change_reason: Option<String>,
    revision: Revision,
    audit_head: Option<AuditHead>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl DocumentVersion {
    /// Creates the first version (1.0) of a new family in DRAFT.
    pub fn new_draft(
        base_number: BaseNumber,
        title: String,
        author_id: UserId,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        Self::validate_title(&title)?;
        Ok(Self {
            id: DocumentVersionId::new(),
            base_number,
            version: VersionNumber::initial(),
            title: title.trim().to_string(),
            status: DocumentStatus::Draft,
            author_id,
            reviewer_id: None,
            approver_id: None,
            effective_date: None,
            obsolescence_date: None,
            supersedes_id: None,
            obsolescence_reason: None,
            change_reason: None,
            revision: Revision::initial(),
            audit_head: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Creates a DRAFT successor of `source` in the same family.
    pub fn successor_draft(
        source: &DocumentVersion,
        version: VersionNumber,
        title: Option<String>,
        author_id: UserId,
        change_reason: String,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let title = title.unwrap_or_else(|| source.title.clone());
        Self::validate_title(&title)?;
        if change_reason.trim().is_empty() {
            return Err(ValidationError::empty_field("change_reason"));
        }
        Ok(Self {
            id: DocumentVersionId::new(),
            base_number: source.base_number.clone(),
            version,
            title: title.trim().to_string(),
            status: DocumentStatus::Draft,
            author_id,
            reviewer_id: None,
            approver_id: None,
            effective_date: None,
            obsolescence_date: None,
            supersedes_id: Some(source.id),
            obsolescence_reason: None,
            change_reason: Some(change_reason.trim().to_string()),
            revision: Revision::initial(),
            audit_head: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a version from persistence (no validation).
    pub fn reconstitute(parts: DocumentVersionParts) -> Self {
        Self {
            id: parts.id,
            base_number: parts.base_number,
            version: parts.version,
            title: parts.title,
            status: parts.status,
            author_id: parts.author_id,
            reviewer_id: parts.reviewer_id,
            approver_id: parts.approver_id,
            effective_date: parts.effective_date,
            obsolescence_date: parts.obsolescence_date,
            supersedes_id: parts.supersedes_id,
            obsolescence_reason: parts.obsolescence_reason,
            change_reason: parts.change_reason,
            revision: parts.revision,
            audit_head: parts.audit_head,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> DocumentVersionId {
        self.id
    }

    pub fn base_number(&self) -> &BaseNumber {
        &self.base_number
    }

    pub fn version(&self) -> VersionNumber {
        self.version
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn reviewer_id(&self) -> Option<&UserId> {
        self.reviewer_id.as_ref()
    }

    pub fn approver_id(&self) -> Option<&UserId> {
        self.approver_id.as_ref()
    }

    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.effective_date
    }

    pub fn obsolescence_date(&self) -> Option<NaiveDate> {
        self.obsolescence_date
    }

    pub fn supersedes_id(&self) -> Option<DocumentVersionId> {
        self.supersedes_id
    }

    pub fn obsolescence_reason(&self) -> Option<&str> {
        self.obsolescence_reason.as_deref()
    }

    pub fn change_reason(&self) -> Option<&str> {
        self.change_reason.as_deref()
    }

    /// Concurrency token this copy was read at.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn audit_head(&self) -> Option<&AuditHead> {
        self.audit_head.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// `BASE vMAJOR.MINOR`, for log lines and messages.
    pub fn label(&self) -> String {
        format!("{} v{}", self.base_number, self.version)
    }

    pub fn is_authored_by(&self, user_id: &UserId) -> bool {
        &self.author_id == user_id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations (driven by the workflow engine and stores)
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn set_status(&mut self, status: DocumentStatus, now: Timestamp) {
        self.status = status;
        self.updated_at = now;
    }

    pub(crate) fn assign_reviewer(&mut self, reviewer_id: UserId) {
        self.reviewer_id = Some(reviewer_id);
    }

    pub(crate) fn assign_approver(&mut self, approver_id: UserId) {
        self.approver_id = Some(approver_id);
    }

    pub(crate) fn set_effective_date(&mut self, date: NaiveDate) {
        self.effective_date = Some(date);
    }

    pub(crate) fn set_obsolescence(&mut self, date: NaiveDate, reason: String) {
        self.obsolescence_date = Some(date);
        self.obsolescence_reason = Some(reason);
    }

    pub(crate) fn set_audit_head(&mut self, head: AuditHead) {
        self.audit_head = Some(head);
    }

    pub(crate) fn set_revision(&mut self, revision: Revision) {
        self.revision = revision;
    }

    fn validate_title(title: &str) -> Result<(), ValidationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if trimmed.len() > MAX_TITLE_LENGTH {
            return Err(ValidationError::invalid_format(
                "title",
                format!("must be {} characters or less", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> UserId {
        UserId::new("author-1").unwrap()
    }

    fn draft() -> DocumentVersion {
        DocumentVersion::new_draft(
            BaseNumber::new("POL-0001").unwrap(),
            "Quality Policy".to_string(),
            author(),
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn new_draft_starts_at_one_zero_in_draft() {
        let version = draft();
        assert_eq!(version.version(), VersionNumber::new(1, 0));
        assert_eq!(version.status(), DocumentStatus::Draft);
        assert_eq!(version.revision(), Revision::initial());
        assert!(version.supersedes_id().is_none());
        assert!(version.audit_head().is_none());
    }

    #[test]
    fn new_draft_rejects_blank_title() {
        let result = DocumentVersion::new_draft(
            BaseNumber::new("POL-0001").unwrap(),
            "   ".to_string(),
            author(),
            Timestamp::now(),
        );
        assert_eq!(result.unwrap_err(), ValidationError::empty_field("title"));
    }

    #[test]
    fn new_draft_rejects_too_long_title() {
        let result = DocumentVersion::new_draft(
            BaseNumber::new("POL-0001").unwrap(),
            "x".repeat(MAX_TITLE_LENGTH + 1),
            author(),
            Timestamp::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn successor_links_to_source_and_copies_title() {
        let source = draft();
        let next = DocumentVersion::successor_draft(
            &source,
            VersionNumber::new(2, 0),
            None,
            UserId::new("author-2").unwrap(),
            "Annual review".to_string(),
            Timestamp::now(),
        )
        .unwrap();

        assert_eq!(next.supersedes_id(), Some(source.id()));
        assert_eq!(next.base_number(), source.base_number());
        assert_eq!(next.title(), "Quality Policy");
        assert_eq!(next.change_reason(), Some("Annual review"));
        assert_ne!(next.id(), source.id());
    }

    #[test]
    fn successor_requires_change_reason() {
        let source = draft();
        let result = DocumentVersion::successor_draft(
            &source,
            VersionNumber::new(1, 1),
            None,
            author(),
            " ".to_string(),
            Timestamp::now(),
        );
        assert_eq!(result.unwrap_err(), ValidationError::empty_field("change_reason"));
    }

    #[test]
    fn version_numbers_order_by_major_then_minor() {
        assert!(VersionNumber::new(1, 9) < VersionNumber::new(2, 0));
        assert!(VersionNumber::new(2, 0) < VersionNumber::new(2, 1));
    }

    #[test]
    fn bump_resets_minor_on_major() {
        let v = VersionNumber::new(1, 3);
        assert_eq!(v.bump(VersionType::Major), VersionNumber::new(2, 0));
        assert_eq!(v.bump(VersionType::Minor), VersionNumber::new(1, 4));
    }

    #[test]
    fn label_includes_base_and_version() {
        assert_eq!(draft().label(), "POL-0001 v1.0");
    }
}
