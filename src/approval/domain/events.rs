//! Telemetry records emitted on task transitions.

use super::{Login, ParseEventTypeError, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of window a timestamp event opens or closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The task as a whole, from creation to its final outcome.
    Task,
    /// A single approver's turn.
    Approve,
}

impl EventType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Approve => "approve",
        }
    }
}

impl TryFrom<&str> for EventType {
    type Error = ParseEventTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "task" => Ok(Self::Task),
            "approve" => Ok(Self::Approve),
            _ => Err(ParseEventTypeError(value.to_owned())),
        }
    }
}

/// Start or end mark of a task or approver window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampEvent {
    /// Task the event belongs to.
    pub task_id: TaskId,
    /// Approver whose window this is; `None` for task windows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver: Option<Login>,
    /// Window kind.
    pub event_type: EventType,
    /// Window start, when the event opens a window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Window end, when the event closes a window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl TimestampEvent {
    /// Marks the start of the task window.
    #[must_use]
    pub const fn task_started(task_id: TaskId, at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            approver: None,
            event_type: EventType::Task,
            start: Some(at),
            end: None,
        }
    }

    /// Marks the end of the task window.
    #[must_use]
    pub const fn task_finished(task_id: TaskId, at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            approver: None,
            event_type: EventType::Task,
            start: None,
            end: Some(at),
        }
    }

    /// Marks the moment an approver was asked to act.
    #[must_use]
    pub const fn approval_requested(task_id: TaskId, approver: Login, at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            approver: Some(approver),
            event_type: EventType::Approve,
            start: Some(at),
            end: None,
        }
    }

    /// Marks the moment an approver acted.
    #[must_use]
    pub const fn approval_answered(task_id: TaskId, approver: Login, at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            approver: Some(approver),
            event_type: EventType::Approve,
            start: None,
            end: Some(at),
        }
    }
}

/// Final outcome of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEvent {
    /// Task that reached a terminal status.
    pub task_id: TaskId,
    /// `true` when approved, `false` when declined.
    pub approved: bool,
}

impl ResultEvent {
    /// Outcome of an approved task.
    #[must_use]
    pub const fn approved(task_id: TaskId) -> Self {
        Self {
            task_id,
            approved: true,
        }
    }

    /// Outcome of a declined task.
    #[must_use]
    pub const fn declined(task_id: TaskId) -> Self {
        Self {
            task_id,
            approved: false,
        }
    }
}
