//! Then steps for approval workflow BDD scenarios.

use super::world::{ApprovalWorld, run_async};
use rstest_bdd_macros::then;
use signoff::approval::{
    domain::{Notice, Task, TaskStatus},
    services::WorkflowErrorKind,
};

fn stored_task(world: &ApprovalWorld) -> Result<Task, eyre::Report> {
    let task_id = world.task_id()?;
    Ok(run_async(world.service.get_task_by_id(task_id))?)
}

fn kind_from_text(kind: &str) -> Result<WorkflowErrorKind, eyre::Report> {
    match kind {
        "not_found" => Ok(WorkflowErrorKind::NotFound),
        "initiator_invalid" => Ok(WorkflowErrorKind::InitiatorInvalid),
        "approval_invalid" => Ok(WorkflowErrorKind::ApprovalInvalid),
        "task_status_invalid" => Ok(WorkflowErrorKind::TaskStatusInvalid),
        "invalid_input" => Ok(WorkflowErrorKind::InvalidInput),
        other => Err(eyre::eyre!("unknown error kind in scenario: {other}")),
    }
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &ApprovalWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = stored_task(world)?;
    eyre::ensure!(
        task.status() == expected,
        "expected status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the task is awaiting "{approver}""#)]
fn task_is_awaiting(world: &ApprovalWorld, approver: String) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.status() == TaskStatus::InProgress,
        "task is {}, not in progress",
        task.status()
    );
    eyre::ensure!(
        task.current_approver().as_str() == approver,
        "expected {approver} to be awaited, found {}",
        task.current_approver()
    );
    Ok(())
}

#[then(r#"the request fails with "{kind}""#)]
fn request_fails_with(world: &ApprovalWorld, kind: String) -> Result<(), eyre::Report> {
    let expected = kind_from_text(&kind)?;
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the last request to fail"))?;
    eyre::ensure!(
        err.kind() == expected,
        "expected {expected:?}, got {err:?}"
    );
    Ok(())
}

#[then(r#"the approval chain was told "{message}""#)]
fn chain_was_told(world: &ApprovalWorld, message: String) -> Result<(), eyre::Report> {
    let sent = world.notifier.sent()?;
    let told = sent.iter().any(|notice| {
        matches!(notice, Notice::Result(result) if result.message.as_str() == message)
    });
    eyre::ensure!(told, "no \"{message}\" notice among {sent:?}");
    Ok(())
}

#[then(r#"an approval mail was sent to "{approver}""#)]
fn approval_mail_sent(world: &ApprovalWorld, approver: String) -> Result<(), eyre::Report> {
    let sent = world.notifier.sent()?;
    let last = sent.last();
    eyre::ensure!(
        matches!(last, Some(Notice::Approval(mail)) if mail.destination.as_str() == approver),
        "expected approval mail to {approver}, last notice was {last:?}"
    );
    Ok(())
}

#[then("an approved result was recorded")]
fn approved_result_recorded(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let results = world.telemetry.results()?;
    eyre::ensure!(
        results.iter().map(|event| event.approved).eq([true]),
        "expected a single approved result, got {results:?}"
    );
    Ok(())
}

#[then("a declined result was recorded")]
fn declined_result_recorded(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let results = world.telemetry.results()?;
    eyre::ensure!(
        results.iter().map(|event| event.approved).eq([false]),
        "expected a single declined result, got {results:?}"
    );
    Ok(())
}

#[then("the task no longer exists")]
fn task_no_longer_exists(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.last_error.is_none(), "delete failed: {:?}", world.last_error);
    let task_id = world.task_id()?;
    let result = run_async(world.service.get_task_by_id(task_id));
    eyre::ensure!(
        matches!(&result, Err(err) if err.kind() == WorkflowErrorKind::NotFound),
        "expected not found, got {result:?}"
    );
    Ok(())
}
