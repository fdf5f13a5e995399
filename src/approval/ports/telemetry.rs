//! Telemetry port for lifecycle timing and outcomes.

use crate::approval::domain::{ResultEvent, TimestampEvent};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Sink for task lifecycle telemetry.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Records the final outcome of a task.
    async fn send_result(&self, event: &ResultEvent) -> TelemetryResult<()>;

    /// Records the start or end of a task or approver window.
    async fn send_timestamp(&self, event: &TimestampEvent) -> TelemetryResult<()>;
}

/// Errors returned by telemetry adapters.
#[derive(Debug, Clone, Error)]
pub enum TelemetryError {
    /// The sink refused the event.
    #[error("telemetry event rejected: {0}")]
    Rejected(String),

    /// The sink transport failed.
    #[error("telemetry transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl TelemetryError {
    /// Wraps a transport failure from the telemetry adapter.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
