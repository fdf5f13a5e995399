//! Approval workflow service.
//!
//! Every operation loads the task, checks its guards, applies the transition,
//! persists it, and then issues the mail and telemetry calls of that
//! transition in a fixed order. Calls are sequential; the first failing call
//! ends the operation and earlier calls are not undone.

use super::error::{ApprovalWorkflowError, ApprovalWorkflowResult, WorkflowOperation};
use crate::approval::{
    domain::{
        ApprovalChain, ApprovalNotice, ApprovalProgress, Login, Notice, ResultEvent,
        ResultMessage, ResultNotice, RoutingBase, Task, TaskDomainError, TaskId, TimestampEvent,
    },
    ports::{Notifier, TaskStorage, TaskStorageError, TelemetrySink},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    initiator_login: String,
    approval_logins: Vec<String>,
}

impl CreateTaskRequest {
    /// Creates a request for `initiator_login` with the given approvers in
    /// approval order.
    #[must_use]
    pub fn new<I, S>(initiator_login: impl Into<String>, approval_logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            initiator_login: initiator_login.into(),
            approval_logins: approval_logins.into_iter().map(Into::into).collect(),
        }
    }
}

/// Request payload for replacing a task's approval chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    task_id: TaskId,
    approval_logins: Vec<String>,
}

impl UpdateTaskRequest {
    /// Creates a request replacing the approvers of `task_id`.
    #[must_use]
    pub fn new<I, S>(task_id: TaskId, approval_logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            task_id,
            approval_logins: approval_logins.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the target task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }
}

/// Task approval orchestration service.
pub struct ApprovalWorkflowService<S, N, T, C>
where
    S: TaskStorage,
    N: Notifier,
    T: TelemetrySink,
    C: Clock + Send + Sync,
{
    storage: Arc<S>,
    notifier: Arc<N>,
    telemetry: Arc<T>,
    clock: Arc<C>,
}

impl<S, N, T, C> Clone for ApprovalWorkflowService<S, N, T, C>
where
    S: TaskStorage,
    N: Notifier,
    T: TelemetrySink,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            notifier: Arc::clone(&self.notifier),
            telemetry: Arc::clone(&self.telemetry),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, N, T, C> ApprovalWorkflowService<S, N, T, C>
where
    S: TaskStorage,
    N: Notifier,
    T: TelemetrySink,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow service.
    #[must_use]
    pub const fn new(storage: Arc<S>, notifier: Arc<N>, telemetry: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            storage,
            notifier,
            telemetry,
            clock,
        }
    }

    /// Creates a task and asks its first approver to act.
    ///
    /// Sequence: insert, task-start mark, approval mail to the first
    /// approver, approver-start mark.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalWorkflowError::Domain`] when the request is invalid
    /// (no call is made), or a collaborator error. A failure after the insert
    /// leaves the task stored.
    #[tracing::instrument(name = "create_task", skip_all, fields(initiator = %request.initiator_login))]
    pub async fn create_task(
        &self,
        request: CreateTaskRequest,
        routing: &RoutingBase,
    ) -> ApprovalWorkflowResult<Task> {
        let operation = WorkflowOperation::Create;
        let initiator = Login::new(request.initiator_login)?;
        let approval_logins = ApprovalChain::parse(request.approval_logins)?;

        let task = Task::new(initiator, approval_logins, &*self.clock);
        self.storage
            .insert(&task)
            .await
            .map_err(|source| storage_error(operation, source))?;

        self.record_timestamp(
            operation,
            TimestampEvent::task_started(task.id(), self.clock.utc()),
        )
        .await?;
        self.announce_current_approver(operation, &task, routing)
            .await?;

        info!(task_id = %task.id(), approvers = task.approval_logins().len(), "task created");
        Ok(task)
    }

    /// Replaces the approval chain and restarts approval from the first
    /// approver, whatever the current status.
    ///
    /// Sequence: upsert, "task was updated" mail to the previous chain,
    /// approval mail to the new first approver.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalWorkflowError::NotFound`] when the task does not
    /// exist, [`ApprovalWorkflowError::Domain`] when the chain is invalid or
    /// `caller` is not the initiator, or a collaborator error.
    #[tracing::instrument(name = "update_task", skip_all, fields(task_id = %request.task_id, caller = %caller))]
    pub async fn update_task(
        &self,
        request: UpdateTaskRequest,
        caller: &Login,
        routing: &RoutingBase,
    ) -> ApprovalWorkflowResult<Task> {
        let operation = WorkflowOperation::Update;
        let approval_logins = ApprovalChain::parse(request.approval_logins)?;
        let mut task = self.fetch(operation, request.task_id).await?;
        guard(task.ensure_initiator(caller))?;

        let updated = Notice::Result(ResultNotice::to_chain(&task, ResultMessage::Updated));
        task.reopen(approval_logins, &*self.clock);
        self.save(operation, &task).await?;
        self.notify(operation, &updated).await?;
        self.notify(
            operation,
            &Notice::Approval(ApprovalNotice::for_current_approver(&task, routing)),
        )
        .await?;

        info!(task_id = %task.id(), "task reopened with a new approval chain");
        Ok(task)
    }

    /// Deletes a task and tells its approval chain.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalWorkflowError::NotFound`] when the task does not
    /// exist, [`ApprovalWorkflowError::Domain`] when `caller` is not the
    /// initiator, or a collaborator error.
    #[tracing::instrument(name = "delete_task", skip_all, fields(task_id = %task_id, caller = %caller))]
    pub async fn delete_task(&self, task_id: TaskId, caller: &Login) -> ApprovalWorkflowResult<()> {
        let operation = WorkflowOperation::Delete;
        let task = self.fetch(operation, task_id).await?;
        guard(task.ensure_initiator(caller))?;

        let deleted = Notice::Result(ResultNotice::to_chain(&task, ResultMessage::Deleted));
        self.storage
            .delete(task_id)
            .await
            .map_err(|source| storage_error(operation, source))?;
        self.notify(operation, &deleted).await?;

        info!(task_id = %task_id, "task deleted");
        Ok(())
    }

    /// Returns a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalWorkflowError::NotFound`] when the task does not
    /// exist, or a storage error.
    pub async fn get_task_by_id(&self, task_id: TaskId) -> ApprovalWorkflowResult<Task> {
        self.fetch(WorkflowOperation::Get, task_id).await
    }

    /// Returns every stored task.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the lookup fails.
    pub async fn get_all_tasks(&self) -> ApprovalWorkflowResult<Vec<Task>> {
        self.storage
            .list_all()
            .await
            .map_err(|source| storage_error(WorkflowOperation::List, source))
    }

    /// Records an approval by the current approver.
    ///
    /// Sequence: approver-end mark, then either (upsert, approval mail to the
    /// next approver, approver-start mark) or, for the last approver, (upsert,
    /// approved result event, "task was approved" mail, task-end mark).
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalWorkflowError::NotFound`] when the task does not
    /// exist, [`ApprovalWorkflowError::Domain`] when the task is not in
    /// progress or `caller` is not the current approver (no further call is
    /// made), or a collaborator error.
    #[tracing::instrument(name = "approve_task", skip_all, fields(task_id = %task_id, caller = %caller))]
    pub async fn approve_task(
        &self,
        task_id: TaskId,
        caller: &Login,
        routing: &RoutingBase,
    ) -> ApprovalWorkflowResult<Task> {
        let operation = WorkflowOperation::Approve;
        let mut task = self.fetch(operation, task_id).await?;
        guard(task.ensure_awaiting(caller))?;

        self.record_timestamp(
            operation,
            TimestampEvent::approval_answered(task.id(), caller.clone(), self.clock.utc()),
        )
        .await?;

        let progress = task.approve(caller, &*self.clock)?;
        let notice = match progress {
            ApprovalProgress::Advanced { .. } => {
                Notice::Approval(ApprovalNotice::for_current_approver(&task, routing))
            }
            ApprovalProgress::Completed => {
                Notice::Result(ResultNotice::to_chain(&task, ResultMessage::Approved))
            }
        };
        self.save(operation, &task).await?;

        match progress {
            ApprovalProgress::Advanced { next_approver } => {
                self.notify(operation, &notice).await?;
                self.record_timestamp(
                    operation,
                    TimestampEvent::approval_requested(task.id(), next_approver, self.clock.utc()),
                )
                .await?;
                info!(
                    task_id = %task.id(),
                    position = task.current_approval_number(),
                    "approval passed to next approver"
                );
            }
            ApprovalProgress::Completed => {
                self.close(operation, &task, ResultEvent::approved(task.id()), &notice)
                    .await?;
                info!(task_id = %task.id(), "task approved");
            }
        }
        Ok(task)
    }

    /// Records a decline by the current approver, closing the task.
    ///
    /// Sequence: approver-end mark, upsert, declined result event,
    /// "task was declined" mail, task-end mark.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalWorkflowError::NotFound`] when the task does not
    /// exist, [`ApprovalWorkflowError::Domain`] when the task is not in
    /// progress or `caller` is not the current approver (no further call is
    /// made), or a collaborator error.
    #[tracing::instrument(name = "decline_task", skip_all, fields(task_id = %task_id, caller = %caller))]
    pub async fn decline_task(
        &self,
        task_id: TaskId,
        caller: &Login,
    ) -> ApprovalWorkflowResult<Task> {
        let operation = WorkflowOperation::Decline;
        let mut task = self.fetch(operation, task_id).await?;
        guard(task.ensure_awaiting(caller))?;

        self.record_timestamp(
            operation,
            TimestampEvent::approval_answered(task.id(), caller.clone(), self.clock.utc()),
        )
        .await?;

        task.decline(caller, &*self.clock)?;
        self.save(operation, &task).await?;
        let notice = Notice::Result(ResultNotice::to_chain(&task, ResultMessage::Declined));
        self.close(operation, &task, ResultEvent::declined(task.id()), &notice)
            .await?;

        info!(task_id = %task.id(), "task declined");
        Ok(task)
    }

    async fn fetch(
        &self,
        operation: WorkflowOperation,
        task_id: TaskId,
    ) -> ApprovalWorkflowResult<Task> {
        self.storage
            .find_by_id(task_id)
            .await
            .map_err(|source| storage_error(operation, source))?
            .ok_or(ApprovalWorkflowError::NotFound(task_id))
    }

    async fn save(&self, operation: WorkflowOperation, task: &Task) -> ApprovalWorkflowResult<()> {
        self.storage
            .update(task)
            .await
            .map_err(|source| storage_error(operation, source))
    }

    /// Sends the approval mail for the current approver and opens their
    /// window.
    async fn announce_current_approver(
        &self,
        operation: WorkflowOperation,
        task: &Task,
        routing: &RoutingBase,
    ) -> ApprovalWorkflowResult<()> {
        let notice = Notice::Approval(ApprovalNotice::for_current_approver(task, routing));
        self.notify(operation, &notice).await?;
        self.record_timestamp(
            operation,
            TimestampEvent::approval_requested(
                task.id(),
                task.current_approver().clone(),
                self.clock.utc(),
            ),
        )
        .await
    }

    /// Emits the terminal sequence: result event, result mail, task-end mark.
    async fn close(
        &self,
        operation: WorkflowOperation,
        task: &Task,
        outcome: ResultEvent,
        notice: &Notice,
    ) -> ApprovalWorkflowResult<()> {
        self.telemetry
            .send_result(&outcome)
            .await
            .map_err(|source| {
                warn!(%operation, error = %source, "telemetry result failed after task was stored");
                ApprovalWorkflowError::Telemetry { operation, source }
            })?;
        self.notify(operation, notice).await?;
        self.record_timestamp(
            operation,
            TimestampEvent::task_finished(task.id(), self.clock.utc()),
        )
        .await
    }

    async fn notify(
        &self,
        operation: WorkflowOperation,
        notice: &Notice,
    ) -> ApprovalWorkflowResult<()> {
        let sent = match notice {
            Notice::Approval(approval) => self.notifier.send_approval_mail(approval).await,
            Notice::Result(result) => self.notifier.send_result_mail(result).await,
        };
        sent.map_err(|source| {
            warn!(%operation, error = %source, "mail delivery failed");
            ApprovalWorkflowError::Notification { operation, source }
        })
    }

    async fn record_timestamp(
        &self,
        operation: WorkflowOperation,
        event: TimestampEvent,
    ) -> ApprovalWorkflowResult<()> {
        self.telemetry
            .send_timestamp(&event)
            .await
            .map_err(|source| {
                warn!(%operation, error = %source, "telemetry timestamp failed");
                ApprovalWorkflowError::Telemetry { operation, source }
            })
    }
}

fn storage_error(operation: WorkflowOperation, source: TaskStorageError) -> ApprovalWorkflowError {
    if let TaskStorageError::NotFound(task_id) = source {
        return ApprovalWorkflowError::NotFound(task_id);
    }
    warn!(%operation, error = %source, "storage call failed");
    ApprovalWorkflowError::Storage { operation, source }
}

fn guard(check: Result<(), TaskDomainError>) -> ApprovalWorkflowResult<()> {
    check.map_err(|err| {
        debug!(error = %err, "precondition rejected");
        ApprovalWorkflowError::Domain(err)
    })
}
