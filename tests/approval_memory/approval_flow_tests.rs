//! End-to-end approval flows over in-memory adapters.

use super::helpers::{Workflow, login, workflow};
use eyre::ensure;
use rstest::rstest;
use signoff::approval::{
    adapters::memory::TelemetryRecord,
    ports::TaskStorage,
    domain::{EventType, Notice, ResultMessage, TaskStatus},
    services::{CreateTaskRequest, UpdateTaskRequest, WorkflowErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn three_step_chain_is_approved_in_order(
    workflow: Result<Workflow, eyre::Report>,
) -> Result<(), eyre::Report> {
    let wf = workflow?;
    let task = wf
        .service
        .create_task(CreateTaskRequest::new("author", ["a1", "a2", "a3"]), &wf.routing)
        .await?;

    for approver in ["a1", "a2", "a3"] {
        wf.service
            .approve_task(task.id(), &login(approver)?, &wf.routing)
            .await?;
    }

    let stored = wf.service.get_task_by_id(task.id()).await?;
    ensure!(stored.status() == TaskStatus::Approved);
    ensure!(stored.current_approval_number() == 2);

    let approval_destinations: Vec<String> = wf
        .notifier
        .sent()?
        .iter()
        .filter_map(|notice| match notice {
            Notice::Approval(approval) => Some(approval.destination.to_string()),
            Notice::Result(_) => None,
        })
        .collect();
    ensure!(approval_destinations == ["a1", "a2", "a3"]);

    let records = wf.telemetry.records()?;
    let task_marks = records
        .iter()
        .filter(|record| {
            matches!(record, TelemetryRecord::Timestamp(event) if event.event_type == EventType::Task)
        })
        .count();
    ensure!(task_marks == 2, "expected start and end marks");
    ensure!(wf.telemetry.results()?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn links_use_normalised_routing_base(
    workflow: Result<Workflow, eyre::Report>,
) -> Result<(), eyre::Report> {
    let wf = workflow?;
    let task = wf
        .service
        .create_task(CreateTaskRequest::new("author", ["reviewer"]), &wf.routing)
        .await?;

    let sent = wf.notifier.sent()?;
    let Some(Notice::Approval(approval)) = sent.first() else {
        eyre::bail!("expected an approval notice, got {sent:?}");
    };
    ensure!(
        approval.approve_link
            == format!("https://signoff.example.org/tasks/{}/approve/reviewer", task.id())
    );
    ensure!(
        approval.decline_link
            == format!("https://signoff.example.org/tasks/{}/decline/reviewer", task.id())
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopened_task_can_be_approved_by_new_chain(
    workflow: Result<Workflow, eyre::Report>,
) -> Result<(), eyre::Report> {
    let wf = workflow?;
    let author = login("author")?;
    let task = wf
        .service
        .create_task(CreateTaskRequest::new("author", ["a1", "a2"]), &wf.routing)
        .await?;
    wf.service.decline_task(task.id(), &login("a1")?).await?;

    wf.service
        .update_task(UpdateTaskRequest::new(task.id(), ["b1"]), &author, &wf.routing)
        .await?;
    let stale = wf
        .service
        .approve_task(task.id(), &login("a1")?, &wf.routing)
        .await;
    let approved = wf
        .service
        .approve_task(task.id(), &login("b1")?, &wf.routing)
        .await?;

    ensure!(
        matches!(&stale, Err(err) if err.kind() == WorkflowErrorKind::ApprovalInvalid),
        "old approver should be rejected, got {stale:?}"
    );
    ensure!(approved.status() == TaskStatus::Approved);
    let results = wf.telemetry.results()?;
    ensure!(results.len() == 2);
    ensure!(results.iter().map(|r| r.approved).eq([false, true]));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_disappears_from_listing(
    workflow: Result<Workflow, eyre::Report>,
) -> Result<(), eyre::Report> {
    let wf = workflow?;
    let kept = wf
        .service
        .create_task(CreateTaskRequest::new("author", ["a1"]), &wf.routing)
        .await?;
    let removed = wf
        .service
        .create_task(CreateTaskRequest::new("author", ["a2", "a3"]), &wf.routing)
        .await?;

    wf.service.delete_task(removed.id(), &login("author")?).await?;

    let listed = wf.service.get_all_tasks().await?;
    ensure!(listed.len() == 1);
    ensure!(listed.first().map(|t| t.id()) == Some(kept.id()));
    let last = wf.notifier.sent()?.pop();
    ensure!(
        matches!(&last, Some(Notice::Result(notice)) if notice.message == ResultMessage::Deleted),
        "expected deletion notice, got {last:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cloned_service_shares_state(
    workflow: Result<Workflow, eyre::Report>,
) -> Result<(), eyre::Report> {
    let wf = workflow?;
    let clone = wf.service.clone();

    let task = clone
        .create_task(CreateTaskRequest::new("author", ["a1"]), &wf.routing)
        .await?;

    ensure!(wf.service.get_task_by_id(task.id()).await?.id() == task.id());
    ensure!(wf.storage.list_all().await?.len() == 1);
    Ok(())
}
