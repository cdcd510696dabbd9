//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! - `workflow` - Guarded workflow actions and status
//! - `document` - New families and new versions
//! - `dependency` - Edge mutations, retirement checks, integrity scans
//! - `scheduler` - Date-driven sweep

pub mod dependency;
pub mod document;
pub mod scheduler;
mod support;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use dependency::{
    AddDependencyCommand, AddDependencyHandler, AddDependencyResult, CanRetireHandler,
    CanRetireQuery, CheckGraphIntegrityHandler, RemoveDependencyCommand,
    RemoveDependencyHandler, RemoveDependencyResult,
};
pub use document::{
    CreateDocumentCommand, CreateDocumentHandler, CreateDocumentResult, CreateNewVersionCommand,
    CreateNewVersionHandler, CreateNewVersionResult,
};
pub use scheduler::{RunSweepHandler, SweepFailure, SweepReport};
pub use workflow::{
    ExecuteActionCommand, ExecuteActionHandler, ExecuteActionResult, GetWorkflowStatusHandler,
    GetWorkflowStatusQuery, WorkflowStatusView,
};
