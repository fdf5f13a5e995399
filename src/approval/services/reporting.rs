//! Reporting over recorded telemetry.

use crate::approval::{
    domain::{ResultsReport, TimeReport},
    ports::{TelemetryError, TelemetryReports},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors returned by [`ReportingService`].
#[derive(Debug, Clone, Error)]
pub enum ReportingError {
    /// The outcome counts could not be read.
    #[error("failed to build results report: {0}")]
    Results(#[source] TelemetryError),

    /// The time spent on closed tasks could not be read.
    #[error("failed to build time report: {0}")]
    Time(#[source] TelemetryError),
}

/// Result type for reporting operations.
pub type ReportingResult<T> = Result<T, ReportingError>;

/// Builds outcome and duration reports from a telemetry store.
pub struct ReportingService<R: TelemetryReports> {
    reports: Arc<R>,
}

impl<R: TelemetryReports> Clone for ReportingService<R> {
    fn clone(&self) -> Self {
        Self {
            reports: Arc::clone(&self.reports),
        }
    }
}

impl<R: TelemetryReports> ReportingService<R> {
    /// Creates a reporting service over `reports`.
    #[must_use]
    pub const fn new(reports: Arc<R>) -> Self {
        Self { reports }
    }

    /// Counts closed tasks by outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::Results`] when the telemetry store fails.
    #[tracing::instrument(name = "results_report", skip_all)]
    pub async fn results_report(&self) -> ReportingResult<ResultsReport> {
        let report = self
            .reports
            .results_report()
            .await
            .map_err(ReportingError::Results)?;
        debug!(
            approved = report.approved_tasks,
            declined = report.declined_tasks,
            "results report built"
        );
        Ok(report)
    }

    /// Returns approve and total time for every closed task.
    ///
    /// # Errors
    ///
    /// Returns [`ReportingError::Time`] when the telemetry store fails.
    #[tracing::instrument(name = "time_report", skip_all)]
    pub async fn time_report(&self) -> ReportingResult<Vec<TimeReport>> {
        let reports = self
            .reports
            .time_reports()
            .await
            .map_err(ReportingError::Time)?;
        debug!(tasks = reports.len(), "time report built");
        Ok(reports)
    }
}
