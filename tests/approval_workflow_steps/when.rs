//! When steps for approval workflow BDD scenarios.

use super::world::{ApprovalWorld, approver_list, login, run_async};
use rstest_bdd_macros::when;
use signoff::approval::services::UpdateTaskRequest;

#[when(r#""{approver}" approves the task"#)]
fn approve(world: &mut ApprovalWorld, approver: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let caller = login(&approver)?;
    let result = run_async(
        world
            .service
            .approve_task(task_id, &caller, &world.routing),
    );
    world.record(result.map(Some));
    Ok(())
}

#[when(r#""{approver}" declines the task"#)]
fn decline(world: &mut ApprovalWorld, approver: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let caller = login(&approver)?;
    let result = run_async(world.service.decline_task(task_id, &caller));
    world.record(result.map(Some));
    Ok(())
}

#[when(r#""{caller}" replaces the approvers with "{approvers}""#)]
fn replace_approvers(
    world: &mut ApprovalWorld,
    caller: String,
    approvers: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let caller_login = login(&caller)?;
    let request = UpdateTaskRequest::new(task_id, approver_list(&approvers));
    let result = run_async(
        world
            .service
            .update_task(request, &caller_login, &world.routing),
    );
    world.record(result.map(Some));
    Ok(())
}

#[when(r#""{caller}" deletes the task"#)]
fn delete(world: &mut ApprovalWorld, caller: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let caller_login = login(&caller)?;
    let result = run_async(world.service.delete_task(task_id, &caller_login));
    world.record(result.map(|()| None));
    Ok(())
}
