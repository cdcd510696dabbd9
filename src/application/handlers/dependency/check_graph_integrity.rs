//! CheckGraphIntegrityHandler - System-wide cycle and dangling-edge scan.
//!
//! Inserts are validated one at a time, so a healthy store never reports
//! anything here. A non-empty report means data was written around the
//! handlers and is logged at error level.

use std::sync::Arc;

use crate::domain::dependency::IntegrityReport;
use crate::domain::workflow::WorkflowError;
use crate::ports::DocumentStore;

use super::super::support::load_graph;

pub struct CheckGraphIntegrityHandler {
    store: Arc<dyn DocumentStore>,
}

impl CheckGraphIntegrityHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<IntegrityReport, WorkflowError> {
        let graph = load_graph(self.store.as_ref()).await?;
        let report = graph.integrity_report();

        if report.is_healthy() {
            tracing::info!(
                revision = %report.revision,
                nodes = report.node_count,
                active_edges = report.active_edge_count,
                "Dependency graph integrity check passed"
            );
        } else {
            tracing::error!(
                revision = %report.revision,
                cycles = report.cycles.len(),
                dangling_edges = report.dangling_edges.len(),
                "Dependency graph integrity check failed"
            );
        }
        Ok(report)
    }
}
