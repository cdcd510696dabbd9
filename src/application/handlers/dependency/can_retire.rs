//! CanRetireHandler - Reports what blocks retiring a version's family.

use std::sync::Arc;

use crate::domain::dependency::RetirementCheck;
use crate::domain::foundation::DocumentVersionId;
use crate::domain::workflow::WorkflowError;
use crate::ports::DocumentStore;

use super::super::support::{load_graph, load_version};

#[derive(Debug, Clone)]
pub struct CanRetireQuery {
    pub version_id: DocumentVersionId,
}

pub struct CanRetireHandler {
    store: Arc<dyn DocumentStore>,
}

impl CanRetireHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every family member, superseded ones included, is checked for
    /// active dependents that are EFFECTIVE or APPROVED_PENDING_EFFECTIVE.
    pub async fn handle(&self, query: CanRetireQuery) -> Result<RetirementCheck, WorkflowError> {
        let version = load_version(self.store.as_ref(), query.version_id).await?;
        let graph = load_graph(self.store.as_ref()).await?;
        let check = graph.can_retire_family(version.base_number());

        tracing::debug!(
            version_id = %query.version_id,
            base_number = %check.base_number,
            blocking = check.blocking_dependent_count(),
            "Retirement check"
        );
        Ok(check)
    }
}
