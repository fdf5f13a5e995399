//! Reports read back from in-memory telemetry after complete flows.

use std::sync::Arc;

use super::helpers::{Workflow, login, workflow};
use eyre::ensure;
use rstest::rstest;
use signoff::approval::{
    domain::ResultsReport,
    services::{CreateTaskRequest, ReportingService, UpdateTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopened_task_counts_each_outcome_but_reports_time_once(
    workflow: Result<Workflow, eyre::Report>,
) -> Result<(), eyre::Report> {
    let wf = workflow?;
    let reporting = ReportingService::new(Arc::new(wf.telemetry.clone()));
    let author = login("author")?;
    let task = wf
        .service
        .create_task(CreateTaskRequest::new("author", ["a1"]), &wf.routing)
        .await?;
    wf.service.decline_task(task.id(), &login("a1")?).await?;
    wf.service
        .update_task(UpdateTaskRequest::new(task.id(), ["b1"]), &author, &wf.routing)
        .await?;
    wf.service
        .approve_task(task.id(), &login("b1")?, &wf.routing)
        .await?;

    let results = reporting.results_report().await?;
    let expected = ResultsReport {
        approved_tasks: 1,
        declined_tasks: 1,
    };
    ensure!(results == expected, "unexpected counts {results:?}");

    let times = reporting.time_report().await?;
    ensure!(times.len() == 1, "expected one report, got {times:?}");
    let report = times.first().ok_or_else(|| eyre::eyre!("missing report"))?;
    ensure!(report.task_id == task.id());
    ensure!(report.approve_time <= report.total_time);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_tasks_stay_out_of_reports(
    workflow: Result<Workflow, eyre::Report>,
) -> Result<(), eyre::Report> {
    let wf = workflow?;
    let reporting = ReportingService::new(Arc::new(wf.telemetry.clone()));
    wf.service
        .create_task(CreateTaskRequest::new("author", ["a1", "a2"]), &wf.routing)
        .await?;

    ensure!(reporting.results_report().await?.total() == 0);
    ensure!(reporting.time_report().await?.is_empty());
    Ok(())
}
