//! Mail payloads and approval link composition.

use super::{Login, Task, TaskDomainError, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public URL prefix under which approve/decline actions are served.
///
/// Supplied by the caller on every operation that composes links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutingBase(String);

impl RoutingBase {
    /// Creates a routing base, dropping trailing slashes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRoutingBase`] when the value is
    /// blank or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim().trim_end_matches('/');
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(TaskDomainError::InvalidRoutingBase(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the routing base as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Composes the approve and decline links for `approver` on `task_id`.
    #[must_use]
    pub fn links_for(&self, task_id: TaskId, approver: &Login) -> ApprovalLinks {
        ApprovalLinks {
            approve: format!("{}/tasks/{task_id}/approve/{approver}", self.0),
            decline: format!("{}/tasks/{task_id}/decline/{approver}", self.0),
        }
    }
}

impl TryFrom<String> for RoutingBase {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoutingBase> for String {
    fn from(base: RoutingBase) -> Self {
        base.0
    }
}

impl fmt::Display for RoutingBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Approve and decline action links for one approver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalLinks {
    /// Link that records an approval.
    pub approve: String,
    /// Link that records a decline.
    pub decline: String,
}

/// Mail asking the current approver to act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalNotice {
    /// Approver receiving the mail.
    pub destination: Login,
    /// Approve action link.
    pub approve_link: String,
    /// Decline action link.
    pub decline_link: String,
}

impl ApprovalNotice {
    /// Composes the notice for the task's current approver.
    #[must_use]
    pub fn for_current_approver(task: &Task, routing: &RoutingBase) -> Self {
        let destination = task.current_approver().clone();
        let ApprovalLinks { approve, decline } = routing.links_for(task.id(), &destination);
        Self {
            destination,
            approve_link: approve,
            decline_link: decline,
        }
    }
}

/// Outcome announced to every participant of an approval chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultMessage {
    /// The initiator replaced the approval chain.
    #[serde(rename = "task was updated")]
    Updated,
    /// The initiator deleted the task.
    #[serde(rename = "task was deleted")]
    Deleted,
    /// The last approver approved the task.
    #[serde(rename = "task was approved")]
    Approved,
    /// An approver declined the task.
    #[serde(rename = "task was declined")]
    Declined,
}

impl ResultMessage {
    /// Returns the human-readable message text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "task was updated",
            Self::Deleted => "task was deleted",
            Self::Approved => "task was approved",
            Self::Declined => "task was declined",
        }
    }
}

impl fmt::Display for ResultMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mail announcing a result to the approval chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultNotice {
    /// Every approver in the chain at the time the notice was composed.
    pub destinations: Vec<Login>,
    /// Task the result refers to.
    pub task_id: TaskId,
    /// Announced result.
    pub message: ResultMessage,
}

impl ResultNotice {
    /// Composes a notice addressed to the task's current approval chain.
    #[must_use]
    pub fn to_chain(task: &Task, message: ResultMessage) -> Self {
        Self {
            destinations: task.approval_logins().to_vec(),
            task_id: task.id(),
            message,
        }
    }
}

/// Mail payload selected by a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Request for the current approver to act.
    Approval(ApprovalNotice),
    /// Announcement of a result to the chain.
    Result(ResultNotice),
}
