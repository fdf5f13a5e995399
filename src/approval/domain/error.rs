//! Error types for approval domain validation and guards.

use super::{Login, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing domain values or applying task
/// transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The login is empty after trimming.
    #[error("login must not be empty")]
    EmptyLogin,

    /// The approval chain has no approvers.
    #[error("approval chain must contain at least one approver")]
    EmptyApprovalChain,

    /// The task identifier could not be parsed.
    #[error("invalid task identifier '{0}'")]
    InvalidTaskId(String),

    /// The routing base cannot be used to compose action links.
    #[error("invalid routing base '{0}', expected a non-empty URL prefix")]
    InvalidRoutingBase(String),

    /// A persisted approval cursor points outside the approval chain.
    #[error("approval cursor {cursor} is out of range for a chain of {chain_len} approvers")]
    ApprovalCursorOutOfRange {
        /// Persisted cursor value.
        cursor: usize,
        /// Length of the persisted approval chain.
        chain_len: usize,
    },

    /// The caller does not own the task.
    #[error("invalid initiator login '{caller}' for task {task_id}")]
    InitiatorInvalid {
        /// Task being modified.
        task_id: TaskId,
        /// Identity that attempted the modification.
        caller: Login,
    },

    /// The caller is not the approver whose action is awaited.
    #[error("invalid approval login '{caller}' for task {task_id}")]
    ApprovalInvalid {
        /// Task being acted upon.
        task_id: TaskId,
        /// Identity that attempted the action.
        caller: Login,
    },

    /// The task is not in progress.
    #[error("task {task_id} is not in progress (status: {status})")]
    TaskStatusInvalid {
        /// Task being acted upon.
        task_id: TaskId,
        /// Status found on the task.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing telemetry window kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown event type: {0}")]
pub struct ParseEventTypeError(pub String);
