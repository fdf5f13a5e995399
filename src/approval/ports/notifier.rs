//! Notification port for approval mail.

use crate::approval::domain::{ApprovalNotice, ResultNotice};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification operations.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Delivery contract for approval and result mail.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a request to act to the current approver.
    async fn send_approval_mail(&self, notice: &ApprovalNotice) -> NotifierResult<()>;

    /// Announces a result to the approval chain.
    async fn send_result_mail(&self, notice: &ResultNotice) -> NotifierResult<()>;
}

/// Errors returned by notification adapters.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The channel refused the message.
    #[error("mail rejected: {0}")]
    Rejected(String),

    /// The channel failed while delivering the message.
    #[error("mail delivery error: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a delivery failure from the mail adapter.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
