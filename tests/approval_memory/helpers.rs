//! Shared helpers for in-memory approval workflow integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use signoff::approval::{
    adapters::memory::{InMemoryTaskStorage, RecordingNotifier, RecordingTelemetrySink},
    domain::{ApprovalChain, Login, RoutingBase, Task},
    services::ApprovalWorkflowService,
};

/// Workflow service wired to in-memory adapters.
pub type MemoryService = ApprovalWorkflowService<
    InMemoryTaskStorage,
    RecordingNotifier,
    RecordingTelemetrySink,
    DefaultClock,
>;

/// Service together with handles on its recording adapters.
pub struct Workflow {
    pub service: MemoryService,
    pub storage: InMemoryTaskStorage,
    pub notifier: RecordingNotifier,
    pub telemetry: RecordingTelemetrySink,
    pub routing: RoutingBase,
}

/// Provides a workflow over fresh in-memory adapters.
///
/// # Errors
///
/// Returns an error if the routing base is rejected.
#[fixture]
pub fn workflow() -> Result<Workflow, eyre::Report> {
    let storage = InMemoryTaskStorage::new();
    let notifier = RecordingNotifier::new();
    let telemetry = RecordingTelemetrySink::new();
    let service = ApprovalWorkflowService::new(
        Arc::new(storage.clone()),
        Arc::new(notifier.clone()),
        Arc::new(telemetry.clone()),
        Arc::new(DefaultClock),
    );
    Ok(Workflow {
        service,
        storage,
        notifier,
        telemetry,
        routing: RoutingBase::new("https://signoff.example.org/")?,
    })
}

/// Provides a fresh in-memory storage.
#[fixture]
pub fn storage() -> InMemoryTaskStorage {
    InMemoryTaskStorage::new()
}

/// Builds an in-progress task for `initiator` and `approvers`.
///
/// # Errors
///
/// Returns an error if a login or the chain is invalid.
pub fn sample_task(initiator: &str, approvers: &[&str]) -> Result<Task, eyre::Report> {
    Ok(Task::new(
        Login::new(initiator)?,
        ApprovalChain::parse(approvers.iter().copied())?,
        &DefaultClock,
    ))
}

/// Parses a login, turning validation failures into reports.
///
/// # Errors
///
/// Returns an error if `value` is blank.
pub fn login(value: &str) -> Result<Login, eyre::Report> {
    Ok(Login::new(value)?)
}
