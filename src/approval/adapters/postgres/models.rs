//! Diesel row models for approval persistence and telemetry.

use super::schema::{approval_tasks, task_results, task_timestamps};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = approval_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Identity that created the task.
    pub initiator_login: String,
    /// Approver logins as a JSON array.
    pub approval_logins: Value,
    /// Approval cursor.
    pub current_approval_number: i32,
    /// Approval status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = approval_tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Identity that created the task.
    pub initiator_login: String,
    /// Approver logins as a JSON array.
    pub approval_logins: Value,
    /// Approval cursor.
    pub current_approval_number: i32,
    /// Approval status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when an existing task record is overwritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = approval_tasks)]
pub struct TaskChangeset {
    /// Identity that created the task.
    pub initiator_login: String,
    /// Approver logins as a JSON array.
    pub approval_logins: Value,
    /// Approval cursor.
    pub current_approval_number: i32,
    /// Approval status.
    pub status: String,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&NewTaskRow> for TaskChangeset {
    fn from(row: &NewTaskRow) -> Self {
        Self {
            initiator_login: row.initiator_login.clone(),
            approval_logins: row.approval_logins.clone(),
            current_approval_number: row.current_approval_number,
            status: row.status.clone(),
            updated_at: row.updated_at,
        }
    }
}

/// Insert model for window marks.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = task_timestamps)]
pub struct NewTimestampRow {
    /// Task the mark belongs to.
    pub task_id: uuid::Uuid,
    /// Approver whose window is marked, if any.
    pub approver: Option<String>,
    /// Window kind.
    pub event_type: String,
    /// Window start.
    pub start_time: Option<DateTime<Utc>>,
    /// Window end.
    pub end_time: Option<DateTime<Utc>>,
}

/// Insert model for task outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = task_results)]
pub struct NewResultRow {
    /// Task that reached a terminal status.
    pub task_id: uuid::Uuid,
    /// `true` when approved.
    pub approved: bool,
}

/// Query result row for window marks.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = task_timestamps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TimestampRow {
    /// Task the mark belongs to.
    pub task_id: uuid::Uuid,
    /// Approver whose window is marked, if any.
    pub approver: Option<String>,
    /// Window kind.
    pub event_type: String,
    /// Window start.
    pub start_time: Option<DateTime<Utc>>,
    /// Window end.
    pub end_time: Option<DateTime<Utc>>,
}

/// Query result row for task outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = task_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ResultRow {
    /// Task that reached a terminal status.
    pub task_id: uuid::Uuid,
    /// `true` when approved.
    pub approved: bool,
}
