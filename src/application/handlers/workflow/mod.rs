//! Workflow handlers - Guarded actions and status queries.

mod execute_action;
mod get_workflow_status;

pub use execute_action::{ExecuteActionCommand, ExecuteActionHandler, ExecuteActionResult};
pub use get_workflow_status::{
    GetWorkflowStatusHandler, GetWorkflowStatusQuery, WorkflowStatusView,
};
