//! Logs outcome and duration reports from the approval telemetry tables.
//!
//! Usage:
//!
//! ```text
//! SIGNOFF__DATABASE__URL=postgres://... signoff_report
//! ```
//!
//! Settings come from an optional `signoff.toml` in the working directory
//! and `SIGNOFF__*` environment variables. Reports are written to the
//! structured log under the `signoff::report` target.

use signoff::{config::Settings, logging, runtime::ApprovalRuntime};
use tracing::info;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let settings = Settings::load()?;
    logging::init(&settings.logging)?;
    let runtime = ApprovalRuntime::from_settings(&settings)?;
    let reporting = runtime.reporting();

    let results = reporting.results_report().await?;
    info!(
        target: "signoff::report",
        approved = results.approved_tasks,
        declined = results.declined_tasks,
        total = results.total(),
        "results report"
    );

    for report in reporting.time_report().await? {
        info!(
            target: "signoff::report",
            task_id = %report.task_id,
            approve_time_ms = report.approve_time.num_milliseconds(),
            total_time_ms = report.total_time.num_milliseconds(),
            "time report"
        );
    }
    Ok(())
}
