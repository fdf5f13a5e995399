//! Application services for the task approval workflow.

mod error;
mod reporting;
mod workflow;

pub use error::{
    ApprovalWorkflowError, ApprovalWorkflowResult, WorkflowErrorKind, WorkflowOperation,
};
pub use reporting::{ReportingError, ReportingResult, ReportingService};
pub use workflow::{ApprovalWorkflowService, CreateTaskRequest, UpdateTaskRequest};
