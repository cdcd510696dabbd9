//! In-memory view of the dependency graph.
//!
//! Every document version is a distinct node. Only active edges take part
//! in reachability, cycle and retirement checks; inactive edges are kept
//! for history.
//!
//! Acyclicity is family-aware: an edge `from -> to` is refused when any
//! version of `from`'s family is reachable from `to`. That keeps the
//! version graph acyclic. Collapsed to families the graph may still loop,
//! through different versions of the families involved.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

use crate::domain::document::{DocumentStatus, DocumentVersion, Revision, VersionNumber};
use crate::domain::foundation::{BaseNumber, DependencyId, DocumentVersionId, StateMachine};

use super::{Dependency, DependencyError, DependencyType};

/// The slice of a document version the graph needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: DocumentVersionId,
    pub base_number: BaseNumber,
    pub version: VersionNumber,
    pub status: DocumentStatus,
}

impl GraphNode {
    pub fn from_version(version: &DocumentVersion) -> Self {
        Self {
            id: version.id(),
            base_number: version.base_number().clone(),
            version: version.version(),
            status: version.status(),
        }
    }
}

/// Everything a store hands back when asked for the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Edge-set revision the snapshot was read at.
    pub revision: Revision,
    pub nodes: Vec<GraphNode>,
    /// All edges, active and inactive.
    pub edges: Vec<Dependency>,
}

/// A dependent that prevents its target's family from being retired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingDependent {
    pub dependency_id: DependencyId,
    pub dependent_id: DocumentVersionId,
    pub base_number: BaseNumber,
    pub version: VersionNumber,
    pub status: DocumentStatus,
    pub dependency_type: DependencyType,
}

/// One family member with live dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedVersion {
    pub version_id: DocumentVersionId,
    pub version: VersionNumber,
    pub status: DocumentStatus,
    pub dependents: Vec<BlockingDependent>,
}

/// Outcome of the family-wide retirement check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementCheck {
    pub base_number: BaseNumber,
    /// True when no family member has an EFFECTIVE or about-to-be-effective dependent.
    pub ok: bool,
    pub blocking: Vec<BlockedVersion>,
}

impl RetirementCheck {
    pub fn new(base_number: BaseNumber, blocking: Vec<BlockedVersion>) -> Self {
        Self {
            base_number,
            ok: blocking.is_empty(),
            blocking,
        }
    }

    pub fn is_clear(&self) -> bool {
        self.ok
    }

    pub fn blocking_dependent_count(&self) -> usize {
        self.blocking.iter().map(|b| b.dependents.len()).sum()
    }
}

/// Result of the system-wide integrity sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub revision: Revision,
    pub node_count: usize,
    pub active_edge_count: usize,
    /// Each cycle as the list of versions along it, first node not repeated.
    pub cycles: Vec<Vec<DocumentVersionId>>,
    /// Active edges naming a version the store does not know.
    pub dangling_edges: Vec<DependencyId>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.cycles.is_empty() && self.dangling_edges.is_empty()
    }
}

/// Dependency graph built from a [`GraphSnapshot`].
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    revision: Revision,
    nodes: HashMap<DocumentVersionId, GraphNode>,
    edges: Vec<Dependency>,
    outgoing: HashMap<DocumentVersionId, Vec<usize>>,
    incoming: HashMap<DocumentVersionId, Vec<usize>>,
}

impl DependencyGraph {
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let nodes = snapshot
            .nodes
            .into_iter()
            .map(|node| (node.id, node))
            .collect();
        let mut graph = Self {
            revision: snapshot.revision,
            nodes,
            edges: snapshot.edges,
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
        };
        graph.reindex();
        graph
    }

    /// Edge-set revision this graph was loaded at.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn node(&self, id: DocumentVersionId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge(&self, id: DependencyId) -> Option<&Dependency> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn active_edges(&self) -> impl Iterator<Item = &Dependency> {
        self.edges.iter().filter(|edge| edge.is_active)
    }

    /// Active edges leaving `id` (what `id` depends on).
    pub fn outgoing(&self, id: DocumentVersionId) -> Vec<&Dependency> {
        self.indexed(&self.outgoing, id)
    }

    /// Active edges arriving at `id` (who depends on `id`).
    pub fn incoming(&self, id: DocumentVersionId) -> Vec<&Dependency> {
        self.indexed(&self.incoming, id)
    }

    /// All known versions of a family, newest first.
    pub fn family(&self, base_number: &BaseNumber) -> Vec<&GraphNode> {
        let mut members: Vec<&GraphNode> = self
            .nodes
            .values()
            .filter(|node| &node.base_number == base_number)
            .collect();
        members.sort_by(|a, b| b.version.cmp(&a.version));
        members
    }

    /// Highest-numbered EFFECTIVE version of a family, if any.
    pub fn latest_effective(&self, base_number: &BaseNumber) -> Option<&GraphNode> {
        self.family(base_number)
            .into_iter()
            .find(|node| node.status == DocumentStatus::Effective)
    }

    /// Adds or replaces a node. Used when planning against versions not yet stored.
    pub fn insert_node(&mut self, node: GraphNode) {
        self.nodes.insert(node.id, node);
    }

    /// Adds an edge without validation. Call [`Self::check_new_edge`] first.
    pub fn insert_edge(&mut self, edge: Dependency) {
        let index = self.edges.len();
        if edge.is_active {
            self.outgoing
                .entry(edge.document_version_id)
                .or_default()
                .push(index);
            self.incoming
                .entry(edge.depends_on_version_id)
                .or_default()
                .push(index);
        }
        self.edges.push(edge);
    }

    /// Replaces a stored edge with its soft-deleted form.
    pub fn replace_edge(&mut self, edge: Dependency) -> Result<(), DependencyError> {
        let slot = self
            .edges
            .iter_mut()
            .find(|existing| existing.id == edge.id)
            .ok_or(DependencyError::NotFound(edge.id))?;
        *slot = edge;
        self.reindex();
        Ok(())
    }

    /// Validates a prospective edge `from -> to` against the active graph.
    pub fn check_new_edge(
        &self,
        from: DocumentVersionId,
        to: DocumentVersionId,
    ) -> Result<(), DependencyError> {
        if from == to {
            return Err(DependencyError::SelfReference { version_id: from });
        }

        let dependent = self
            .node(from)
            .ok_or_else(|| DependencyError::invalid_endpoint(from, "unknown document version"))?;
        let target = self
            .node(to)
            .ok_or_else(|| DependencyError::invalid_endpoint(to, "unknown document version"))?;

        if dependent.status.is_terminal() {
            return Err(DependencyError::invalid_endpoint(
                from,
                format!("dependent is {}", dependent.status),
            ));
        }
        if !target.status.accepts_dependents() {
            return Err(DependencyError::invalid_endpoint(
                to,
                format!("target is {}", target.status),
            ));
        }

        if let Some(existing) = self.outgoing(from).into_iter().find(|e| e.connects(from, to)) {
            return Err(DependencyError::Duplicate {
                from,
                to,
                existing: existing.id,
            });
        }

        if let Some(path) = self.path_to_family(to, &dependent.base_number) {
            let mut cycle = Vec::with_capacity(path.len() + 1);
            cycle.push(from);
            cycle.extend(path);
            return Err(DependencyError::CycleDetected { path: cycle });
        }

        Ok(())
    }

    /// Breadth-first search from `start` over active edges for any version
    /// of `base_number`. Returns the path, `start` first.
    pub fn path_to_family(
        &self,
        start: DocumentVersionId,
        base_number: &BaseNumber,
    ) -> Option<Vec<DocumentVersionId>> {
        let mut parents: HashMap<DocumentVersionId, DocumentVersionId> = HashMap::new();
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let in_family = self
                .node(current)
                .map(|node| &node.base_number == base_number)
                .unwrap_or(false);
            if in_family {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(parent) = parents.get(&cursor) {
                    path.push(*parent);
                    cursor = *parent;
                }
                path.reverse();
                return Some(path);
            }

            for edge in self.outgoing(current) {
                let next = edge.depends_on_version_id;
                if seen.insert(next) {
                    parents.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    /// Every cycle in the active subgraph, found by depth-first search.
    pub fn detect_cycles(&self) -> Vec<Vec<DocumentVersionId>> {
        let mut adjacency: HashMap<DocumentVersionId, Vec<DocumentVersionId>> = HashMap::new();
        for edge in self.active_edges() {
            adjacency
                .entry(edge.document_version_id)
                .or_default()
                .push(edge.depends_on_version_id);
        }

        let mut starts: Vec<DocumentVersionId> = adjacency.keys().copied().collect();
        starts.sort();

        let mut visiting = HashSet::new();
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let mut cycles = Vec::new();

        for start in starts {
            if !visited.contains(&start) {
                collect_cycles(
                    start,
                    &adjacency,
                    &mut visiting,
                    &mut visited,
                    &mut path,
                    &mut cycles,
                );
            }
        }

        cycles
    }

    /// Active edges with an endpoint that is not a known version.
    pub fn dangling_edges(&self) -> Vec<DependencyId> {
        self.active_edges()
            .filter(|edge| {
                !self.nodes.contains_key(&edge.document_version_id)
                    || !self.nodes.contains_key(&edge.depends_on_version_id)
            })
            .map(|edge| edge.id)
            .collect()
    }

    pub fn integrity_report(&self) -> IntegrityReport {
        IntegrityReport {
            revision: self.revision,
            node_count: self.nodes.len(),
            active_edge_count: self.active_edges().count(),
            cycles: self.detect_cycles(),
            dangling_edges: self.dangling_edges(),
        }
    }

    /// Family-wide retirement check.
    ///
    /// Scans every member of the family, superseded ones included, for
    /// active incoming edges whose dependent is EFFECTIVE or
    /// APPROVED_PENDING_EFFECTIVE.
    pub fn can_retire_family(&self, base_number: &BaseNumber) -> RetirementCheck {
        let blocking = self
            .family(base_number)
            .into_iter()
            .filter_map(|member| {
                let dependents: Vec<BlockingDependent> = self
                    .incoming(member.id)
                    .into_iter()
                    .filter_map(|edge| {
                        let dependent = self.node(edge.document_version_id)?;
                        dependent.status.is_live_dependent().then(|| BlockingDependent {
                            dependency_id: edge.id,
                            dependent_id: dependent.id,
                            base_number: dependent.base_number.clone(),
                            version: dependent.version,
                            status: dependent.status,
                            dependency_type: edge.dependency_type,
                        })
                    })
                    .collect();

                (!dependents.is_empty()).then(|| BlockedVersion {
                    version_id: member.id,
                    version: member.version,
                    status: member.status,
                    dependents,
                })
            })
            .collect();

        RetirementCheck::new(base_number.clone(), blocking)
    }

    fn indexed(
        &self,
        index: &HashMap<DocumentVersionId, Vec<usize>>,
        id: DocumentVersionId,
    ) -> Vec<&Dependency> {
        index
            .get(&id)
            .map(|positions| positions.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    fn reindex(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
        for (index, edge) in self.edges.iter().enumerate() {
            if edge.is_active {
                self.outgoing
                    .entry(edge.document_version_id)
                    .or_default()
                    .push(index);
                self.incoming
                    .entry(edge.depends_on_version_id)
                    .or_default()
                    .push(index);
            }
        }
    }
}

fn collect_cycles(
    node: DocumentVersionId,
    adjacency: &HashMap<DocumentVersionId, Vec<DocumentVersionId>>,
    visiting: &mut HashSet<DocumentVersionId>,
    visited: &mut HashSet<DocumentVersionId>,
    path: &mut Vec<DocumentVersionId>,
    cycles: &mut Vec<Vec<DocumentVersionId>>,
) {
    if visiting.contains(&node) {
        if let Some(cycle_start) = path.iter().position(|&n| n == node) {
            cycles.push(path[cycle_start..].to_vec());
        }
        return;
    }

    if visited.contains(&node) {
        return;
    }

    visiting.insert(node);
    path.push(node);

    if let Some(neighbors) = adjacency.get(&node) {
        for &next in neighbors {
            collect_cycles(next, adjacency, visiting, visited, path, cycles);
        }
    }

    path.pop();
    visiting.remove(&node);
    visited.insert(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};

    fn node(base: &str, major: u32, status: DocumentStatus) -> GraphNode {
        GraphNode {
            id: DocumentVersionId::new(),
            base_number: BaseNumber::new(base).unwrap(),
            version: VersionNumber::new(major, 0),
            status,
        }
    }

    fn edge(from: &GraphNode, to: &GraphNode) -> Dependency {
        Dependency::new(
            from.id,
            to.id,
            DependencyType::Reference,
            UserId::new("author-1").unwrap(),
            Timestamp::now(),
        )
    }

    fn graph(nodes: &[&GraphNode], edges: Vec<Dependency>) -> DependencyGraph {
        DependencyGraph::from_snapshot(GraphSnapshot {
            revision: Revision::initial(),
            nodes: nodes.iter().map(|n| (*n).clone()).collect(),
            edges,
        })
    }

    #[test]
    fn rejects_self_edges() {
        let a = node("A", 1, DocumentStatus::Effective);
        let g = graph(&[&a], vec![]);
        assert_eq!(
            g.check_new_edge(a.id, a.id),
            Err(DependencyError::SelfReference { version_id: a.id })
        );
    }

    #[test]
    fn rejects_direct_cycle_with_path() {
        let a = node("A", 1, DocumentStatus::Effective);
        let b = node("B", 1, DocumentStatus::Effective);
        let g = graph(&[&a, &b], vec![edge(&a, &b)]);

        match g.check_new_edge(b.id, a.id) {
            Err(DependencyError::CycleDetected { path }) => assert_eq!(path, vec![b.id, a.id, b.id]),
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn rejects_edge_that_loops_back_through_another_family_version() {
        // B v1 -> A v1 exists, so A v2 -> B v1 would close A -> B -> A.
        let a1 = node("A", 1, DocumentStatus::Superseded);
        let a2 = node("A", 2, DocumentStatus::Draft);
        let b1 = node("B", 1, DocumentStatus::Effective);
        let g = graph(&[&a1, &a2, &b1], vec![edge(&b1, &a1)]);

        assert!(matches!(
            g.check_new_edge(a2.id, b1.id),
            Err(DependencyError::CycleDetected { .. })
        ));
    }

    #[test]
    fn depending_on_an_older_version_of_another_family_is_fine() {
        let a1 = node("A", 1, DocumentStatus::Effective);
        let b1 = node("B", 1, DocumentStatus::Superseded);
        let b2 = node("B", 2, DocumentStatus::Effective);
        let g = graph(&[&a1, &b1, &b2], vec![edge(&b2, &a1)]);

        assert_eq!(g.check_new_edge(a1.id, b1.id), Ok(()));
    }

    #[test]
    fn rejects_edges_within_one_family() {
        let a1 = node("A", 1, DocumentStatus::Effective);
        let a2 = node("A", 2, DocumentStatus::Draft);
        let g = graph(&[&a1, &a2], vec![]);
        assert!(matches!(
            g.check_new_edge(a2.id, a1.id),
            Err(DependencyError::CycleDetected { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_active_edge() {
        let a = node("A", 1, DocumentStatus::Draft);
        let b = node("B", 1, DocumentStatus::Effective);
        let existing = edge(&a, &b);
        let existing_id = existing.id;
        let g = graph(&[&a, &b], vec![existing]);

        assert_eq!(
            g.check_new_edge(a.id, b.id),
            Err(DependencyError::Duplicate {
                from: a.id,
                to: b.id,
                existing: existing_id,
            })
        );
    }

    #[test]
    fn inactive_edges_do_not_count() {
        let a = node("A", 1, DocumentStatus::Effective);
        let b = node("B", 1, DocumentStatus::Effective);
        let old = edge(&a, &b).deactivated(Timestamp::now());
        let g = graph(&[&a, &b], vec![old]);

        assert_eq!(g.check_new_edge(b.id, a.id), Ok(()));
        assert_eq!(g.check_new_edge(a.id, b.id), Ok(()));
    }

    #[test]
    fn rejects_terminal_endpoints_and_unknown_versions() {
        let live = node("A", 1, DocumentStatus::Draft);
        let obsolete = node("B", 1, DocumentStatus::Obsolete);
        let terminated = node("C", 1, DocumentStatus::Terminated);
        let g = graph(&[&live, &obsolete, &terminated], vec![]);

        assert!(matches!(
            g.check_new_edge(live.id, obsolete.id),
            Err(DependencyError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            g.check_new_edge(terminated.id, live.id),
            Err(DependencyError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            g.check_new_edge(live.id, DocumentVersionId::new()),
            Err(DependencyError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn retirement_check_scans_superseded_members() {
        let a1 = node("A", 1, DocumentStatus::Superseded);
        let a2 = node("A", 2, DocumentStatus::Effective);
        let b = node("B", 1, DocumentStatus::Effective);
        let c = node("C", 1, DocumentStatus::Draft);
        let blocking = edge(&b, &a1);
        let blocking_id = blocking.id;
        let g = graph(&[&a1, &a2, &b, &c], vec![blocking, edge(&c, &a2)]);

        let check = g.can_retire_family(&a2.base_number);
        assert!(!check.is_clear());
        assert_eq!(check.blocking.len(), 1);
        assert_eq!(check.blocking[0].version_id, a1.id);
        assert_eq!(check.blocking[0].dependents[0].dependency_id, blocking_id);
        assert_eq!(check.blocking[0].dependents[0].status, DocumentStatus::Effective);
    }

    #[test]
    fn retirement_check_serializes_ok_with_blocking_list() {
        let a = node("A", 1, DocumentStatus::Effective);
        let b = node("B", 1, DocumentStatus::Effective);
        let c = node("C", 1, DocumentStatus::Effective);
        let g = graph(&[&a, &b, &c], vec![edge(&b, &a)]);

        let blocked = serde_json::to_value(g.can_retire_family(&a.base_number)).unwrap();
        assert_eq!(blocked["ok"], serde_json::json!(false));
        assert_eq!(blocked["blocking"].as_array().map(Vec::len), Some(1));

        let clear = serde_json::to_value(g.can_retire_family(&c.base_number)).unwrap();
        assert_eq!(clear["ok"], serde_json::json!(true));
        assert_eq!(clear["blocking"], serde_json::json!([]));
    }

    #[test]
    fn loops_through_other_versions_are_accepted_at_family_level() {
        let a1 = node("A", 1, DocumentStatus::Effective);
        let a2 = node("A", 2, DocumentStatus::Draft);
        let b1 = node("B", 1, DocumentStatus::Effective);
        let b2 = node("B", 2, DocumentStatus::Draft);
        let c1 = node("C", 1, DocumentStatus::Effective);
        let mut g = graph(&[&a1, &a2, &b1, &b2, &c1], vec![]);

        for (from, to) in [(&a1, &b1), (&c1, &a2), (&b2, &c1)] {
            assert_eq!(g.check_new_edge(from.id, to.id), Ok(()));
            g.insert_edge(edge(from, to));
        }

        assert!(g.detect_cycles().is_empty());
        assert_eq!(
            g.check_new_edge(a2.id, b2.id),
            Err(DependencyError::CycleDetected {
                path: vec![a2.id, b2.id, c1.id, a2.id]
            })
        );
    }

    #[test]
    fn approved_pending_effective_dependents_block() {
        let a = node("A", 1, DocumentStatus::Effective);
        let b = node("B", 1, DocumentStatus::ApprovedPendingEffective);
        let g = graph(&[&a, &b], vec![edge(&b, &a)]);
        assert_eq!(g.can_retire_family(&a.base_number).blocking_dependent_count(), 1);
    }

    #[test]
    fn detect_cycles_finds_planted_cycle_and_dangling_edges() {
        let a = node("A", 1, DocumentStatus::Effective);
        let b = node("B", 1, DocumentStatus::Effective);
        let ghost = node("GHOST", 1, DocumentStatus::Effective);
        let dangling = edge(&a, &ghost);
        let dangling_id = dangling.id;
        let g = graph(&[&a, &b], vec![edge(&a, &b), edge(&b, &a), dangling]);

        let report = g.integrity_report();
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].len(), 2);
        assert_eq!(report.dangling_edges, vec![dangling_id]);
        assert!(!report.is_healthy());
    }

    #[test]
    fn replace_edge_removes_it_from_adjacency() {
        let a = node("A", 1, DocumentStatus::Effective);
        let b = node("B", 1, DocumentStatus::Effective);
        let e = edge(&a, &b);
        let mut g = graph(&[&a, &b], vec![e.clone()]);

        g.replace_edge(e.deactivated(Timestamp::now())).unwrap();
        assert!(g.outgoing(a.id).is_empty());
        assert!(g.incoming(b.id).is_empty());
        assert!(g.edge(e.id).is_some());
    }

    #[test]
    fn latest_effective_skips_newer_drafts() {
        let a1 = node("A", 1, DocumentStatus::Effective);
        let a2 = node("A", 2, DocumentStatus::Draft);
        let g = graph(&[&a1, &a2], vec![]);
        assert_eq!(g.latest_effective(&a1.base_number).map(|n| n.id), Some(a1.id));
    }
}
