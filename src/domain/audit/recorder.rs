//! Builds and verifies audit records.
//!
//! Every status change of a document version goes through
//! [`AuditRecorder::transition`], which applies the change and produces
//! exactly one hash-chained [`TransitionRecord`] for it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::dependency::Dependency;
use crate::domain::document::{AuditHead, DocumentStatus, DocumentVersion};
use crate::domain::foundation::{
    AuditEntryId, Timestamp, TransitionId, UserId, WorkflowInstanceId,
};

use super::{DependencyAuditEntry, DependencyChange, TransitionRecord};

/// Outcome of verifying one version's transition chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVerification {
    pub intact: bool,
    pub records_checked: usize,
    /// Sequence of the first record that fails verification.
    pub broken_at: Option<u64>,
}

/// Stateless builder for transition and dependency audit records.
pub struct AuditRecorder;

impl AuditRecorder {
    /// Moves `version` to `to` and returns the audit record for the move.
    ///
    /// The version's audit head advances to the new record, so several
    /// calls on the same version inside one change set chain correctly.
    pub fn transition(
        version: &mut DocumentVersion,
        to: DocumentStatus,
        workflow_instance_id: WorkflowInstanceId,
        actor_id: &UserId,
        comment: Option<String>,
        now: Timestamp,
    ) -> TransitionRecord {
        let (sequence, previous_hash) = match version.audit_head() {
            Some(head) => (head.sequence + 1, Some(head.hash.clone())),
            None => (1, None),
        };

        let mut record = TransitionRecord {
            id: TransitionId::new(),
            workflow_instance_id,
            document_version_id: version.id(),
            sequence,
            from_state: version.status(),
            to_state: to,
            actor_id: actor_id.clone(),
            comment,
            timestamp: now,
            previous_hash,
            hash: String::new(),
        };
        record.hash = Self::compute_hash(&record);

        version.set_status(to, now);
        version.set_audit_head(AuditHead {
            sequence,
            hash: record.hash.clone(),
        });

        record
    }

    /// Audit entry for an edge mutation.
    pub fn dependency_entry(
        edge: &Dependency,
        change: DependencyChange,
        actor_id: &UserId,
        comment: Option<String>,
        now: Timestamp,
    ) -> DependencyAuditEntry {
        DependencyAuditEntry {
            id: AuditEntryId::new(),
            dependency_id: edge.id,
            document_version_id: edge.document_version_id,
            depends_on_version_id: edge.depends_on_version_id,
            change,
            actor_id: actor_id.clone(),
            comment,
            timestamp: now,
        }
    }

    /// Verifies a version's records: consecutive sequences from 1, each
    /// linked to its predecessor's hash, each hash matching its content.
    pub fn verify_chain(records: &[TransitionRecord]) -> ChainVerification {
        let mut ordered: Vec<&TransitionRecord> = records.iter().collect();
        ordered.sort_by_key(|record| record.sequence);

        let mut previous: Option<&TransitionRecord> = None;
        for (index, record) in ordered.iter().enumerate() {
            let expected_sequence = index as u64 + 1;
            let linked = record.previous_hash.as_deref() == previous.map(|p| p.hash.as_str());
            let consistent = previous
                .map(|p| p.to_state == record.from_state)
                .unwrap_or(true);

            if record.sequence != expected_sequence
                || !linked
                || !consistent
                || Self::compute_hash(record) != record.hash
            {
                tracing::warn!(
                    document_version_id = %record.document_version_id,
                    sequence = record.sequence,
                    "Audit chain verification failed"
                );
                return ChainVerification {
                    intact: false,
                    records_checked: index + 1,
                    broken_at: Some(record.sequence),
                };
            }
            previous = Some(record);
        }

        ChainVerification {
            intact: true,
            records_checked: ordered.len(),
            broken_at: None,
        }
    }

    fn compute_hash(record: &TransitionRecord) -> String {
        let canonical = [
            record.id.to_string(),
            record.workflow_instance_id.to_string(),
            record.document_version_id.to_string(),
            record.sequence.to_string(),
            record.from_state.to_string(),
            record.to_state.to_string(),
            record.actor_id.to_string(),
            record.comment.clone().unwrap_or_default(),
            record.timestamp.to_canonical_string(),
            record.previous_hash.clone().unwrap_or_default(),
        ]
        .join("\n");

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dependency::DependencyType;
    use crate::domain::foundation::BaseNumber;

    fn actor() -> UserId {
        UserId::new("author-1").unwrap()
    }

    fn draft() -> DocumentVersion {
        DocumentVersion::new_draft(
            BaseNumber::new("SOP-1").unwrap(),
            "Cleaning".to_string(),
            actor(),
            Timestamp::now(),
        )
        .unwrap()
    }

    fn walk(version: &mut DocumentVersion) -> Vec<TransitionRecord> {
        let workflow = WorkflowInstanceId::new();
        vec![
            AuditRecorder::transition(
                version,
                DocumentStatus::PendingReview,
                workflow,
                &actor(),
                None,
                Timestamp::now(),
            ),
            AuditRecorder::transition(
                version,
                DocumentStatus::UnderReview,
                workflow,
                &UserId::new("reviewer-1").unwrap(),
                Some("picking up".to_string()),
                Timestamp::now(),
            ),
        ]
    }

    #[test]
    fn transition_applies_status_and_chains_records() {
        let mut version = draft();
        let records = walk(&mut version);

        assert_eq!(version.status(), DocumentStatus::UnderReview);
        assert_eq!(records[0].sequence, 1);
        assert_eq!(records[0].from_state, DocumentStatus::Draft);
        assert!(records[0].previous_hash.is_none());
        assert_eq!(records[1].sequence, 2);
        assert_eq!(records[1].previous_hash.as_deref(), Some(records[0].hash.as_str()));
        assert_eq!(version.audit_head().map(|h| h.sequence), Some(2));
    }

    #[test]
    fn hash_is_hex_sha256() {
        let mut version = draft();
        let records = walk(&mut version);
        assert_eq!(records[0].hash.len(), 64);
        assert!(records[0].hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn untouched_chain_verifies() {
        let mut version = draft();
        let records = walk(&mut version);
        let result = AuditRecorder::verify_chain(&records);
        assert!(result.intact);
        assert_eq!(result.records_checked, 2);
    }

    #[test]
    fn edited_comment_breaks_chain() {
        let mut version = draft();
        let mut records = walk(&mut version);
        records[1].comment = Some("rewritten".to_string());

        let result = AuditRecorder::verify_chain(&records);
        assert!(!result.intact);
        assert_eq!(result.broken_at, Some(2));
    }

    #[test]
    fn missing_record_breaks_chain() {
        let mut version = draft();
        let records = walk(&mut version);
        let result = AuditRecorder::verify_chain(&records[1..]);
        assert_eq!(result.broken_at, Some(2));
    }

    #[test]
    fn empty_chain_is_intact() {
        assert!(AuditRecorder::verify_chain(&[]).intact);
    }

    #[test]
    fn dependency_entry_mirrors_edge() {
        let edge = Dependency::new(
            draft().id(),
            draft().id(),
            DependencyType::Reference,
            actor(),
            Timestamp::now(),
        );
        let entry = AuditRecorder::dependency_entry(
            &edge,
            DependencyChange::Added,
            &actor(),
            None,
            Timestamp::now(),
        );
        assert_eq!(entry.dependency_id, edge.id);
        assert_eq!(entry.depends_on_version_id, edge.depends_on_version_id);
        assert_eq!(entry.change, DependencyChange::Added);
    }
}
