//! Dependency module - "version depends on version" edges and graph checks.
//!
//! The active-edge subgraph is kept acyclic and is consulted before any
//! version family is retired.

mod edge;
mod errors;
mod graph;

pub use edge::{Dependency, DependencyType};
pub use errors::DependencyError;
pub use graph::{
    BlockedVersion, BlockingDependent, DependencyGraph, GraphNode, GraphSnapshot,
    IntegrityReport, RetirementCheck,
};
