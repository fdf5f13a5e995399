//! Task aggregate root and approval status types.

use super::{ApprovalChain, Login, ParseTaskStatusError, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Approval status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting for the current approver to act.
    InProgress,
    /// Every approver in the chain approved the task.
    Approved,
    /// An approver declined the task.
    Declined,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }

    /// Returns `true` for statuses that accept no approval or decline.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Declined)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "in_progress" => Ok(Self::InProgress),
            "approved" => Ok(Self::Approved),
            "declined" => Ok(Self::Declined),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalProgress {
    /// The cursor moved to the next approver, who is now awaited.
    Advanced {
        /// The approver that is now current.
        next_approver: Login,
    },
    /// The last approver approved and the task is closed.
    Completed,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PersistedTaskData")]
pub struct Task {
    id: TaskId,
    initiator_login: Login,
    approval_logins: ApprovalChain,
    current_approval_number: usize,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted initiator.
    pub initiator_login: Login,
    /// Persisted approval chain.
    pub approval_logins: ApprovalChain,
    /// Persisted approval cursor.
    pub current_approval_number: usize,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PersistedTaskData> for Task {
    type Error = TaskDomainError;

    fn try_from(data: PersistedTaskData) -> Result<Self, Self::Error> {
        Self::from_persisted(data)
    }
}

impl Task {
    /// Creates a new in-progress task awaiting the first approver.
    #[must_use]
    pub fn new(initiator_login: Login, approval_logins: ApprovalChain, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            initiator_login,
            approval_logins,
            current_approval_number: 0,
            status: TaskStatus::InProgress,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ApprovalCursorOutOfRange`] when the stored
    /// cursor does not name an approver in the stored chain.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        let chain_len = data.approval_logins.len();
        if data.current_approval_number >= chain_len {
            return Err(TaskDomainError::ApprovalCursorOutOfRange {
                cursor: data.current_approval_number,
                chain_len,
            });
        }

        Ok(Self {
            id: data.id,
            initiator_login: data.initiator_login,
            approval_logins: data.approval_logins,
            current_approval_number: data.current_approval_number,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the identity that created the task.
    #[must_use]
    pub const fn initiator_login(&self) -> &Login {
        &self.initiator_login
    }

    /// Returns the ordered approval chain.
    #[must_use]
    pub const fn approval_logins(&self) -> &ApprovalChain {
        &self.approval_logins
    }

    /// Returns the zero-based position of the awaited approver.
    #[must_use]
    pub const fn current_approval_number(&self) -> usize {
        self.current_approval_number
    }

    /// Returns the approval status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the approver whose action is awaited.
    ///
    /// For terminal tasks this is the approver that acted last.
    #[must_use]
    pub fn current_approver(&self) -> &Login {
        // The cursor is kept inside the chain by every constructor and
        // transition, so the fallback is never taken.
        self.approval_logins
            .get(self.current_approval_number)
            .unwrap_or_else(|| self.approval_logins.first())
    }

    /// Checks that `caller` owns the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InitiatorInvalid`] for any other identity.
    pub fn ensure_initiator(&self, caller: &Login) -> Result<(), TaskDomainError> {
        if &self.initiator_login != caller {
            return Err(TaskDomainError::InitiatorInvalid {
                task_id: self.id,
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    /// Checks that the task is in progress and awaits `caller`.
    ///
    /// The status is checked before the approver.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskStatusInvalid`] for terminal tasks and
    /// [`TaskDomainError::ApprovalInvalid`] when `caller` is not the current
    /// approver.
    pub fn ensure_awaiting(&self, caller: &Login) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::InProgress {
            return Err(TaskDomainError::TaskStatusInvalid {
                task_id: self.id,
                status: self.status,
            });
        }
        if self.current_approver() != caller {
            return Err(TaskDomainError::ApprovalInvalid {
                task_id: self.id,
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    /// Records an approval by `caller`.
    ///
    /// Advances the cursor by one, or marks the task approved when `caller`
    /// is the last approver in the chain.
    ///
    /// # Errors
    ///
    /// Returns the guard errors of [`Task::ensure_awaiting`].
    pub fn approve(
        &mut self,
        caller: &Login,
        clock: &impl Clock,
    ) -> Result<ApprovalProgress, TaskDomainError> {
        self.ensure_awaiting(caller)?;

        let progress = if self.approval_logins.is_last(self.current_approval_number) {
            self.status = TaskStatus::Approved;
            ApprovalProgress::Completed
        } else {
            self.current_approval_number += 1;
            ApprovalProgress::Advanced {
                next_approver: self.current_approver().clone(),
            }
        };
        self.touch(clock);
        Ok(progress)
    }

    /// Records a decline by `caller`, closing the task.
    ///
    /// # Errors
    ///
    /// Returns the guard errors of [`Task::ensure_awaiting`].
    pub fn decline(&mut self, caller: &Login, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_awaiting(caller)?;
        self.status = TaskStatus::Declined;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the approval chain and restarts approval from the first
    /// approver.
    ///
    /// Allowed from any status, including terminal ones.
    pub fn reopen(&mut self, approval_logins: ApprovalChain, clock: &impl Clock) {
        self.approval_logins = approval_logins;
        self.current_approval_number = 0;
        self.status = TaskStatus::InProgress;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
