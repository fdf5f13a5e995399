//! `PostgreSQL` storage implementation for task aggregates.

use super::{
    SignoffPgPool,
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::approval_tasks,
};
use crate::approval::{
    domain::{ApprovalChain, Login, PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{TaskStorage, TaskStorageError, TaskStorageResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task storage.
#[derive(Debug, Clone)]
pub struct PostgresTaskStorage {
    pool: SignoffPgPool,
}

impl PostgresTaskStorage {
    /// Creates a new storage adapter from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: SignoffPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStorageResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStorageError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStorageError::persistence)?
    }
}

#[async_trait]
impl TaskStorage for PostgresTaskStorage {
    async fn insert(&self, task: &Task) -> TaskStorageResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(approval_tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskStorageError::DuplicateTask(task_id)
                    }
                    _ => TaskStorageError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskStorageResult<()> {
        let new_row = to_new_row(task)?;
        let changeset = TaskChangeset::from(&new_row);

        self.run_blocking(move |connection| {
            diesel::insert_into(approval_tasks::table)
                .values(&new_row)
                .on_conflict(approval_tasks::id)
                .do_update()
                .set(&changeset)
                .execute(connection)
                .map_err(TaskStorageError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskStorageResult<()> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                approval_tasks::table.filter(approval_tasks::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(TaskStorageError::persistence)?;
            if removed == 0 {
                return Err(TaskStorageError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStorageResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = approval_tasks::table
                .filter(approval_tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStorageError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_all(&self) -> TaskStorageResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = approval_tasks::table
                .order((approval_tasks::created_at.asc(), approval_tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStorageError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

pub(super) fn to_new_row(task: &Task) -> TaskStorageResult<NewTaskRow> {
    let approval_logins =
        serde_json::to_value(task.approval_logins()).map_err(TaskStorageError::persistence)?;
    let current_approval_number =
        i32::try_from(task.current_approval_number()).map_err(TaskStorageError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        initiator_login: task.initiator_login().as_str().to_owned(),
        approval_logins,
        current_approval_number,
        status: task.status().as_str().to_owned(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

pub(super) fn row_to_task(row: TaskRow) -> TaskStorageResult<Task> {
    let TaskRow {
        id,
        initiator_login,
        approval_logins: persisted_logins,
        current_approval_number,
        status: persisted_status,
        created_at,
        updated_at,
    } = row;

    let initiator_login =
        Login::new(initiator_login).map_err(TaskStorageError::invalid_persisted_data)?;
    let approval_logins = serde_json::from_value::<ApprovalChain>(persisted_logins)
        .map_err(TaskStorageError::invalid_persisted_data)?;
    let current_approval_number = usize::try_from(current_approval_number)
        .map_err(TaskStorageError::invalid_persisted_data)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskStorageError::invalid_persisted_data)?;

    Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        initiator_login,
        approval_logins,
        current_approval_number,
        status,
        created_at,
        updated_at,
    })
    .map_err(TaskStorageError::invalid_persisted_data)
}
