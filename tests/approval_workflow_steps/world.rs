//! Shared world state for approval workflow BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use signoff::approval::{
    adapters::memory::{InMemoryTaskStorage, RecordingNotifier, RecordingTelemetrySink},
    domain::{Login, RoutingBase, Task, TaskId},
    services::{ApprovalWorkflowError, ApprovalWorkflowService},
};

/// Service type used by the BDD world.
pub type TestApprovalService = ApprovalWorkflowService<
    InMemoryTaskStorage,
    RecordingNotifier,
    RecordingTelemetrySink,
    DefaultClock,
>;

/// Scenario world for approval workflow behaviour tests.
pub struct ApprovalWorld {
    pub service: TestApprovalService,
    pub notifier: RecordingNotifier,
    pub telemetry: RecordingTelemetrySink,
    pub routing: RoutingBase,
    pub task_id: Option<TaskId>,
    pub last_task: Option<Task>,
    pub last_error: Option<ApprovalWorkflowError>,
}

impl ApprovalWorld {
    /// Creates a world with fresh in-memory adapters.
    #[must_use]
    pub fn new() -> Self {
        let notifier = RecordingNotifier::new();
        let telemetry = RecordingTelemetrySink::new();
        let service = ApprovalWorkflowService::new(
            Arc::new(InMemoryTaskStorage::new()),
            Arc::new(notifier.clone()),
            Arc::new(telemetry.clone()),
            Arc::new(DefaultClock),
        );
        let routing = RoutingBase::new("https://signoff.example.org")
            .expect("static routing base should be valid");

        Self {
            service,
            notifier,
            telemetry,
            routing,
            task_id: None,
            last_task: None,
            last_error: None,
        }
    }

    /// Returns the identifier of the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error when no task was created yet.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Records the outcome of a workflow call.
    pub fn record(&mut self, result: Result<Option<Task>, ApprovalWorkflowError>) {
        match result {
            Ok(task) => {
                self.last_task = task;
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err),
        }
    }
}

impl Default for ApprovalWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ApprovalWorld {
    ApprovalWorld::default()
}

/// Parses a login from scenario text.
///
/// # Errors
///
/// Returns an error when the login is blank.
pub fn login(value: &str) -> Result<Login, eyre::Report> {
    Ok(Login::new(value)?)
}

/// Splits a comma-separated approver list from scenario text.
#[must_use]
pub fn approver_list(value: &str) -> Vec<String> {
    value.split(',').map(|item| item.trim().to_owned()).collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
