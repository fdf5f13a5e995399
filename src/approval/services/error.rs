//! Error taxonomy of the approval workflow service.

use crate::approval::{
    domain::{TaskDomainError, TaskId},
    ports::{NotifierError, TaskStorageError, TelemetryError},
};
use std::fmt;
use thiserror::Error;

/// Workflow operation during which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowOperation {
    /// `create_task`.
    Create,
    /// `update_task`.
    Update,
    /// `delete_task`.
    Delete,
    /// `get_task_by_id`.
    Get,
    /// `get_all_tasks`.
    List,
    /// `approve_task`.
    Approve,
    /// `decline_task`.
    Decline,
}

impl WorkflowOperation {
    /// Returns the operation name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create task",
            Self::Update => "update task",
            Self::Delete => "delete task",
            Self::Get => "get task",
            Self::List => "list tasks",
            Self::Approve => "approve task",
            Self::Decline => "decline task",
        }
    }
}

impl fmt::Display for WorkflowOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of workflow errors for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowErrorKind {
    /// The task does not exist.
    NotFound,
    /// The caller does not own the task.
    InitiatorInvalid,
    /// The caller is not the current approver.
    ApprovalInvalid,
    /// The task is not in progress.
    TaskStatusInvalid,
    /// The request carried invalid values.
    InvalidInput,
    /// A collaborator failed, possibly after the task was mutated.
    Infrastructure,
}

/// Service-level errors for approval workflow operations.
#[derive(Debug, Error)]
pub enum ApprovalWorkflowError {
    /// Domain validation or a guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// The storage collaborator failed.
    #[error("{operation}: storage failed: {source}")]
    Storage {
        /// Operation that issued the call.
        operation: WorkflowOperation,
        /// Storage failure.
        source: TaskStorageError,
    },

    /// The notification collaborator failed.
    #[error("{operation}: notification failed: {source}")]
    Notification {
        /// Operation that issued the call.
        operation: WorkflowOperation,
        /// Notification failure.
        source: NotifierError,
    },

    /// The telemetry collaborator failed.
    #[error("{operation}: telemetry failed: {source}")]
    Telemetry {
        /// Operation that issued the call.
        operation: WorkflowOperation,
        /// Telemetry failure.
        source: TelemetryError,
    },
}

impl ApprovalWorkflowError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> WorkflowErrorKind {
        match self {
            Self::NotFound(_) => WorkflowErrorKind::NotFound,
            Self::Domain(TaskDomainError::InitiatorInvalid { .. }) => {
                WorkflowErrorKind::InitiatorInvalid
            }
            Self::Domain(TaskDomainError::ApprovalInvalid { .. }) => {
                WorkflowErrorKind::ApprovalInvalid
            }
            Self::Domain(TaskDomainError::TaskStatusInvalid { .. }) => {
                WorkflowErrorKind::TaskStatusInvalid
            }
            Self::Domain(TaskDomainError::ApprovalCursorOutOfRange { .. })
            | Self::Storage { .. }
            | Self::Notification { .. }
            | Self::Telemetry { .. } => WorkflowErrorKind::Infrastructure,
            Self::Domain(_) => WorkflowErrorKind::InvalidInput,
        }
    }

    /// Returns `true` when the caller can fix the request and retry.
    #[must_use]
    pub const fn is_client_fault(&self) -> bool {
        !matches!(self.kind(), WorkflowErrorKind::Infrastructure)
    }

    /// Returns the operation during which a collaborator failed.
    #[must_use]
    pub const fn failed_operation(&self) -> Option<WorkflowOperation> {
        match self {
            Self::Storage { operation, .. }
            | Self::Notification { operation, .. }
            | Self::Telemetry { operation, .. } => Some(*operation),
            Self::Domain(_) | Self::NotFound(_) => None,
        }
    }
}

/// Result type for approval workflow operations.
pub type ApprovalWorkflowResult<T> = Result<T, ApprovalWorkflowError>;
