//! Given steps for approval workflow BDD scenarios.

use super::world::{ApprovalWorld, approver_list, login, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use signoff::approval::services::CreateTaskRequest;

#[given(r#"a task created by "{initiator}" for approvers "{approvers}""#)]
fn task_created(
    world: &mut ApprovalWorld,
    initiator: String,
    approvers: String,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(initiator, approver_list(&approvers));
    let created = run_async(world.service.create_task(request, &world.routing))
        .wrap_err("create task for approval scenario")?;
    world.task_id = Some(created.id());
    world.last_task = Some(created);
    Ok(())
}

#[given(r#""{approver}" has declined the task"#)]
fn task_declined(world: &mut ApprovalWorld, approver: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let declined = run_async(world.service.decline_task(task_id, &login(&approver)?))
        .wrap_err("decline task in scenario setup")?;
    world.last_task = Some(declined);
    Ok(())
}
