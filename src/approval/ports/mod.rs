//! Port contracts for the approval workflow.
//!
//! Ports define infrastructure-agnostic interfaces used by the workflow
//! service: task storage, mail notification, telemetry, and the reports
//! read back from telemetry.

mod notifier;
mod reports;
mod storage;
mod telemetry;

pub use notifier::{Notifier, NotifierError, NotifierResult};
pub use reports::TelemetryReports;
pub use storage::{TaskStorage, TaskStorageError, TaskStorageResult};
pub use telemetry::{TelemetryError, TelemetryResult, TelemetrySink};
