//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers plan through the domain and commit one change set;
//! query handlers only read.

pub mod handlers;

pub use handlers::{
    // Workflow
    ExecuteActionCommand, ExecuteActionHandler, ExecuteActionResult,
    GetWorkflowStatusHandler, GetWorkflowStatusQuery, WorkflowStatusView,
    // Documents
    CreateDocumentCommand, CreateDocumentHandler, CreateDocumentResult,
    CreateNewVersionCommand, CreateNewVersionHandler, CreateNewVersionResult,
    // Dependencies
    AddDependencyCommand, AddDependencyHandler, AddDependencyResult,
    CanRetireHandler, CanRetireQuery, CheckGraphIntegrityHandler,
    RemoveDependencyCommand, RemoveDependencyHandler, RemoveDependencyResult,
    // Scheduler
    RunSweepHandler, SweepFailure, SweepReport,
};
