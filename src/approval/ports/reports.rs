//! Read side of recorded telemetry.

use super::TelemetryResult;
use crate::approval::domain::{ResultsReport, TimeReport};
use async_trait::async_trait;

/// Source of reports computed from recorded telemetry.
#[async_trait]
pub trait TelemetryReports: Send + Sync {
    /// Counts recorded outcomes by approval result.
    async fn results_report(&self) -> TelemetryResult<ResultsReport>;

    /// Returns approve and total time for every task with a recorded
    /// outcome.
    async fn time_reports(&self) -> TelemetryResult<Vec<TimeReport>>;
}
