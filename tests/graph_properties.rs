//! Property tests for the dependency graph: any sequence of accepted edge
//! insertions leaves the version-level graph acyclic, and every rejected
//! edge is reported with a path that loops back into its own family.
//!
//! Loops across families through different versions are allowed.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use doc_lifecycle::domain::dependency::{
    Dependency, DependencyError, DependencyGraph, DependencyType, GraphNode, GraphSnapshot,
};
use doc_lifecycle::domain::document::{DocumentStatus, Revision, VersionNumber};
use doc_lifecycle::domain::foundation::{BaseNumber, DocumentVersionId, Timestamp, UserId};

const NODES: usize = 12;
const FAMILIES: usize = 5;

fn nodes() -> Vec<GraphNode> {
    (0..NODES)
        .map(|i| GraphNode {
            id: DocumentVersionId::new(),
            base_number: BaseNumber::new(format!("DOC-{}", i % FAMILIES)).unwrap(),
            version: VersionNumber::new((i / FAMILIES) as u32 + 1, 0),
            status: DocumentStatus::Draft,
        })
        .collect()
}

fn empty_graph(nodes: &[GraphNode]) -> DependencyGraph {
    DependencyGraph::from_snapshot(GraphSnapshot {
        revision: Revision::initial(),
        nodes: nodes.to_vec(),
        edges: Vec::new(),
    })
}

fn edge(from: DocumentVersionId, to: DocumentVersionId) -> Dependency {
    Dependency::new(
        from,
        to,
        DependencyType::Reference,
        UserId::new("prop").unwrap(),
        Timestamp::now(),
    )
}

/// Kahn's algorithm over active version-to-version edges.
fn versions_are_acyclic(graph: &DependencyGraph, nodes: &[GraphNode]) -> bool {
    let mut out: HashMap<DocumentVersionId, HashSet<DocumentVersionId>> = HashMap::new();
    let mut in_degree: HashMap<DocumentVersionId, usize> =
        nodes.iter().map(|n| (n.id, 0)).collect();
    for e in graph.active_edges() {
        if out
            .entry(e.document_version_id)
            .or_default()
            .insert(e.depends_on_version_id)
        {
            *in_degree.entry(e.depends_on_version_id).or_default() += 1;
        }
    }

    let mut ready: Vec<DocumentVersionId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut removed = 0;
    while let Some(id) = ready.pop() {
        removed += 1;
        for next in out.get(&id).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(*next);
                }
            }
        }
    }
    removed == in_degree.len()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn accepted_edges_never_form_a_version_cycle(
        pairs in prop::collection::vec((0..NODES, 0..NODES), 0..60),
    ) {
        let nodes = nodes();
        let mut graph = empty_graph(&nodes);

        for (from, to) in pairs {
            let (from, to) = (nodes[from].id, nodes[to].id);
            if graph.check_new_edge(from, to).is_ok() {
                graph.insert_edge(edge(from, to));
            }
        }

        prop_assert!(graph.detect_cycles().is_empty());
        prop_assert!(versions_are_acyclic(&graph, &nodes));
    }

    #[test]
    fn reported_cycle_path_follows_active_edges(
        pairs in prop::collection::vec((0..NODES, 0..NODES), 1..60),
    ) {
        let nodes = nodes();
        let family_of: HashMap<DocumentVersionId, BaseNumber> =
            nodes.iter().map(|n| (n.id, n.base_number.clone())).collect();
        let mut graph = empty_graph(&nodes);

        for (from, to) in pairs {
            let (from, to) = (nodes[from].id, nodes[to].id);
            match graph.check_new_edge(from, to) {
                Ok(()) => graph.insert_edge(edge(from, to)),
                Err(DependencyError::CycleDetected { path }) => {
                    prop_assert_eq!(path.first(), Some(&from));
                    prop_assert_eq!(path.get(1), Some(&to));
                    let last = path.last().map(|id| &family_of[id]);
                    prop_assert_eq!(last, Some(&family_of[&from]));
                    for hop in path[1..].windows(2) {
                        prop_assert!(graph
                            .outgoing(hop[0])
                            .iter()
                            .any(|e| e.depends_on_version_id == hop[1]));
                    }
                }
                Err(DependencyError::SelfReference { version_id }) => {
                    prop_assert_eq!(version_id, from);
                    prop_assert_eq!(from, to);
                }
                Err(DependencyError::Duplicate { existing, .. }) => {
                    prop_assert!(graph.edge(existing).map(|e| e.is_active).unwrap_or(false));
                }
                Err(other) => prop_assert!(false, "unexpected rejection: {}", other),
            }
        }
    }

    #[test]
    fn deactivating_edges_keeps_the_graph_acyclic(
        pairs in prop::collection::vec((0..NODES, 0..NODES), 1..40),
        drop_every in 1usize..4,
    ) {
        let nodes = nodes();
        let mut graph = empty_graph(&nodes);
        let mut accepted = Vec::new();

        for (from, to) in pairs {
            let (from, to) = (nodes[from].id, nodes[to].id);
            if graph.check_new_edge(from, to).is_ok() {
                let e = edge(from, to);
                accepted.push(e.clone());
                graph.insert_edge(e);
            }
        }
        for e in accepted.iter().step_by(drop_every) {
            graph.replace_edge(e.deactivated(Timestamp::now())).unwrap();
        }

        let report = graph.integrity_report();
        prop_assert!(report.is_healthy());
        prop_assert_eq!(
            report.active_edge_count,
            accepted.len() - accepted.iter().step_by(drop_every).count()
        );
    }
}
