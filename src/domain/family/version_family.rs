//! VersionFamily - computed view over all versions sharing a base number.

use crate::domain::audit::{AuditRecorder, DependencyAuditEntry, DependencyChange};
use crate::domain::dependency::{Dependency, DependencyError, DependencyGraph, GraphNode};
use crate::domain::document::{DocumentStatus, DocumentVersion, VersionNumber, VersionType};
use crate::domain::foundation::{BaseNumber, DocumentVersionId, Timestamp, UserId};

use super::FamilyError;

/// Inputs for drafting the next version of a family.
#[derive(Debug, Clone)]
pub struct NewVersionRequest {
    pub source_id: DocumentVersionId,
    pub version_type: VersionType,
    pub change_reason: String,
    /// Overrides the source's title when set.
    pub title: Option<String>,
    pub author_id: UserId,
}

/// Everything `create_new_version` writes in one unit of work.
#[derive(Debug, Clone)]
pub struct NewVersionPlan {
    pub version: DocumentVersion,
    pub copied_edges: Vec<Dependency>,
    pub audit_entries: Vec<DependencyAuditEntry>,
}

/// All versions of one document, newest first. Owns nothing; rebuilt on
/// every read.
#[derive(Debug, Clone)]
pub struct VersionFamily {
    base_number: BaseNumber,
    members: Vec<DocumentVersion>,
}

impl VersionFamily {
    pub fn new(base_number: BaseNumber, members: Vec<DocumentVersion>) -> Self {
        let mut members: Vec<DocumentVersion> = members
            .into_iter()
            .filter(|member| member.base_number() == &base_number)
            .collect();
        members.sort_by(|a, b| b.version().cmp(&a.version()));
        Self {
            base_number,
            members,
        }
    }

    pub fn base_number(&self) -> &BaseNumber {
        &self.base_number
    }

    /// Members ordered by version, highest first.
    pub fn members(&self) -> &[DocumentVersion] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member(&self, id: DocumentVersionId) -> Option<&DocumentVersion> {
        self.members.iter().find(|member| member.id() == id)
    }

    /// Highest `(major, minor)` regardless of status.
    pub fn latest(&self) -> Option<&DocumentVersion> {
        self.members.first()
    }

    pub fn is_latest(&self, id: DocumentVersionId) -> bool {
        self.latest().map(|latest| latest.id() == id).unwrap_or(false)
    }

    /// Highest-numbered EFFECTIVE member.
    pub fn latest_effective(&self) -> Option<&DocumentVersion> {
        self.members
            .iter()
            .find(|member| member.status() == DocumentStatus::Effective)
    }

    /// The version currently moving through authoring, review or approval.
    pub fn in_flight(&self) -> Option<&DocumentVersion> {
        self.members.iter().find(|member| member.status().is_in_flight())
    }

    /// Versions currently governing practice.
    pub fn in_force(&self) -> Vec<&DocumentVersion> {
        self.members
            .iter()
            .filter(|member| member.status().is_in_force())
            .collect()
    }

    /// EFFECTIVE members that must become SUPERSEDED once `incoming` is EFFECTIVE.
    pub fn supersession_targets(&self, incoming: DocumentVersionId) -> Vec<&DocumentVersion> {
        self.members
            .iter()
            .filter(|member| member.id() != incoming && member.status() == DocumentStatus::Effective)
            .collect()
    }

    /// Number for the next version, counted from the family's highest one.
    pub fn next_version_number(&self, version_type: VersionType) -> VersionNumber {
        self.latest()
            .map(|latest| latest.version().bump(version_type))
            .unwrap_or_else(VersionNumber::initial)
    }

    /// Plans a new DRAFT from an EFFECTIVE source.
    ///
    /// The source's active outgoing edges are copied onto the draft and
    /// re-pointed to the latest EFFECTIVE version of each target's family,
    /// falling back to the literal target. `graph` is updated in place so
    /// the copies are validated against each other.
    pub fn plan_new_version(
        &self,
        request: NewVersionRequest,
        graph: &mut DependencyGraph,
        now: Timestamp,
    ) -> Result<NewVersionPlan, FamilyError> {
        let source = self
            .member(request.source_id)
            .ok_or_else(|| FamilyError::NotAMember {
                base_number: self.base_number.clone(),
                version_id: request.source_id,
            })?;

        if source.status() != DocumentStatus::Effective {
            return Err(FamilyError::SourceNotEffective {
                status: source.status(),
            });
        }
        if let Some(pending) = self.in_flight() {
            return Err(FamilyError::InFlightVersionExists {
                base_number: self.base_number.clone(),
                version: pending.version(),
            });
        }

        let version = DocumentVersion::successor_draft(
            source,
            self.next_version_number(request.version_type),
            request.title,
            request.author_id.clone(),
            request.change_reason,
            now,
        )?;
        graph.insert_node(GraphNode::from_version(&version));

        let mut source_edges: Vec<Dependency> =
            graph.outgoing(source.id()).into_iter().cloned().collect();
        source_edges.sort_by_key(|edge| edge.created_at);

        let mut copied_edges = Vec::new();
        let mut audit_entries = Vec::new();
        for edge in source_edges {
            let Some(target) = self.copy_target(&edge, version.id(), graph)? else {
                continue;
            };

            let copy = edge.copy_for(version.id(), target, request.author_id.clone(), now);
            audit_entries.push(AuditRecorder::dependency_entry(
                &copy,
                DependencyChange::Copied,
                &request.author_id,
                Some(format!("copied from dependency {}", edge.id)),
                now,
            ));
            graph.insert_edge(copy.clone());
            copied_edges.push(copy);
        }

        Ok(NewVersionPlan {
            version,
            copied_edges,
            audit_entries,
        })
    }

    /// Picks where a copied edge should point, or `None` to drop it.
    fn copy_target(
        &self,
        edge: &Dependency,
        dependent: DocumentVersionId,
        graph: &DependencyGraph,
    ) -> Result<Option<DocumentVersionId>, FamilyError> {
        let literal = edge.depends_on_version_id;
        let mut candidates = Vec::with_capacity(2);
        if let Some(family) = graph.node(literal).map(|node| node.base_number.clone()) {
            if let Some(latest) = graph.latest_effective(&family) {
                candidates.push(latest.id);
            }
        }
        if !candidates.contains(&literal) {
            candidates.push(literal);
        }

        let mut last_error = None;
        for candidate in candidates {
            match graph.check_new_edge(dependent, candidate) {
                Ok(()) => return Ok(Some(candidate)),
                // Two source edges re-pointed onto the same version.
                Err(DependencyError::Duplicate { .. }) => return Ok(None),
                Err(err) => last_error = Some(err),
            }
        }

        match last_error {
            Some(err @ DependencyError::CycleDetected { .. }) => Err(FamilyError::EdgeCopy(err)),
            Some(err) => {
                tracing::warn!(
                    dependency_id = %edge.id,
                    error = %err,
                    "Dependency not carried over to new version"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dependency::{DependencyType, GraphSnapshot};
    use crate::domain::document::{DocumentVersionParts, Revision};

    fn version(base: &str, major: u32, minor: u32, status: DocumentStatus) -> DocumentVersion {
        let now = Timestamp::now();
        DocumentVersion::reconstitute(DocumentVersionParts {
            id: DocumentVersionId::new(),
            base_number: BaseNumber::new(base).unwrap(),
            version: VersionNumber::new(major, minor),
            title: format!("{} title", base),
            status,
            author_id: UserId::new("author-1").unwrap(),
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

    fn graph_of(versions: &[&DocumentVersion], edges: Vec<Dependency>) -> DependencyGraph {
        DependencyGraph::from_snapshot(GraphSnapshot {
            revision: Revision::initial(),
            nodes: versions.iter().map(|v| GraphNode::from_version(v)).collect(),
            edges,
        })
    }

    fn edge(from: &DocumentVersion, to: &DocumentVersion) -> Dependency {
        Dependency::new(
            from.id(),
            to.id(),
            DependencyType::Critical,
            UserId::new("author-1").unwrap(),
            Timestamp::now(),
        )
    }

    fn request(source: &DocumentVersion, version_type: VersionType) -> NewVersionRequest {
        NewVersionRequest {
            source_id: source.id(),
            version_type,
            change_reason: "Periodic review".to_string(),
            title: None,
            author_id: UserId::new("author-2").unwrap(),
        }
    }

    #[test]
    fn orders_members_newest_first() {
        let v1 = version("A", 1, 0, DocumentStatus::Superseded);
        let v2 = version("A", 2, 0, DocumentStatus::Effective);
        let v21 = version("A", 2, 1, DocumentStatus::Draft);
        let family = VersionFamily::new(
            BaseNumber::new("A").unwrap(),
            vec![v1.clone(), v21.clone(), v2.clone()],
        );

        assert_eq!(family.latest().map(|v| v.id()), Some(v21.id()));
        assert_eq!(family.latest_effective().map(|v| v.id()), Some(v2.id()));
        assert_eq!(family.in_flight().map(|v| v.id()), Some(v21.id()));
        assert_eq!(family.in_force().len(), 1);
        assert!(family.is_latest(v21.id()));
    }

    #[test]
    fn numbering_follows_highest_version() {
        let v1 = version("A", 1, 3, DocumentStatus::Effective);
        let family = VersionFamily::new(BaseNumber::new("A").unwrap(), vec![v1]);
        assert_eq!(family.next_version_number(VersionType::Major), VersionNumber::new(2, 0));
        assert_eq!(family.next_version_number(VersionType::Minor), VersionNumber::new(1, 4));
    }

    #[test]
    fn supersession_targets_exclude_incoming() {
        let v1 = version("A", 1, 0, DocumentStatus::Effective);
        let v2 = version("A", 2, 0, DocumentStatus::ApprovedPendingEffective);
        let family = VersionFamily::new(BaseNumber::new("A").unwrap(), vec![v1.clone(), v2.clone()]);
        let targets = family.supersession_targets(v2.id());
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id(), v1.id());
    }

    #[test]
    fn new_version_requires_effective_source() {
        let v1 = version("A", 1, 0, DocumentStatus::Draft);
        let family = VersionFamily::new(BaseNumber::new("A").unwrap(), vec![v1.clone()]);
        let mut graph = graph_of(&[&v1], vec![]);

        let err = family
            .plan_new_version(request(&v1, VersionType::Major), &mut graph, Timestamp::now())
            .unwrap_err();
        assert_eq!(err, FamilyError::SourceNotEffective { status: DocumentStatus::Draft });
    }

    #[test]
    fn new_version_rejected_while_another_is_in_flight() {
        let v1 = version("A", 1, 0, DocumentStatus::Effective);
        let v2 = version("A", 2, 0, DocumentStatus::PendingReview);
        let family = VersionFamily::new(BaseNumber::new("A").unwrap(), vec![v1.clone(), v2.clone()]);
        let mut graph = graph_of(&[&v1, &v2], vec![]);

        let err = family
            .plan_new_version(request(&v1, VersionType::Minor), &mut graph, Timestamp::now())
            .unwrap_err();
        assert!(matches!(err, FamilyError::InFlightVersionExists { .. }));
    }

    #[test]
    fn copied_edges_point_at_latest_effective_target() {
        let a1 = version("A", 1, 0, DocumentStatus::Effective);
        let b1 = version("B", 1, 0, DocumentStatus::Superseded);
        let b2 = version("B", 2, 0, DocumentStatus::Effective);
        let family = VersionFamily::new(BaseNumber::new("A").unwrap(), vec![a1.clone()]);
        let mut graph = graph_of(&[&a1, &b1, &b2], vec![edge(&a1, &b1)]);

        let plan = family
            .plan_new_version(request(&a1, VersionType::Major), &mut graph, Timestamp::now())
            .unwrap();

        assert_eq!(plan.version.version(), VersionNumber::new(2, 0));
        assert_eq!(plan.version.supersedes_id(), Some(a1.id()));
        assert_eq!(plan.copied_edges.len(), 1);
        assert!(plan.copied_edges[0].connects(plan.version.id(), b2.id()));
        assert_eq!(plan.copied_edges[0].dependency_type, DependencyType::Critical);
        assert_eq!(plan.audit_entries[0].change, DependencyChange::Copied);
    }

    #[test]
    fn copied_edges_fall_back_to_literal_target() {
        let a1 = version("A", 1, 0, DocumentStatus::Effective);
        let c1 = version("C", 1, 0, DocumentStatus::ScheduledForObsolescence);
        let family = VersionFamily::new(BaseNumber::new("A").unwrap(), vec![a1.clone()]);
        let mut graph = graph_of(&[&a1, &c1], vec![edge(&a1, &c1)]);

        let plan = family
            .plan_new_version(request(&a1, VersionType::Minor), &mut graph, Timestamp::now())
            .unwrap();

        assert_eq!(plan.version.version(), VersionNumber::new(1, 1));
        assert!(plan.copied_edges[0].connects(plan.version.id(), c1.id()));
    }

    #[test]
    fn inactive_source_edges_are_not_copied() {
        let a1 = version("A", 1, 0, DocumentStatus::Effective);
        let b1 = version("B", 1, 0, DocumentStatus::Effective);
        let family = VersionFamily::new(BaseNumber::new("A").unwrap(), vec![a1.clone()]);
        let mut graph = graph_of(&[&a1, &b1], vec![edge(&a1, &b1).deactivated(Timestamp::now())]);

        let plan = family
            .plan_new_version(request(&a1, VersionType::Major), &mut graph, Timestamp::now())
            .unwrap();
        assert!(plan.copied_edges.is_empty());
    }
}
