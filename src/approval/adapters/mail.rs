//! Mail adapter that writes outgoing mail to the structured log.
//!
//! Each notice is serialised to JSON and emitted as a `tracing` event on the
//! `signoff::mail` target, where a log shipper or mail relay can pick it up.

use crate::approval::{
    domain::{ApprovalNotice, ResultNotice},
    ports::{Notifier, NotifierError, NotifierResult},
};
use async_trait::async_trait;
use serde::Serialize;

/// Log target used for outgoing mail.
pub const MAIL_LOG_TARGET: &str = "signoff::mail";

/// Notifier that logs mail payloads through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingMailer {
    sender: Option<String>,
}

impl TracingMailer {
    /// Creates a mailer without a sender address.
    #[must_use]
    pub const fn new() -> Self {
        Self { sender: None }
    }

    /// Sets the sender address attached to every logged mail.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Returns the configured sender address.
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }
}

/// Renders a mail payload as the JSON body that is logged.
///
/// # Errors
///
/// Returns [`NotifierError::Delivery`] when serialisation fails.
pub fn render_mail(payload: &impl Serialize) -> NotifierResult<String> {
    serde_json::to_string(payload).map_err(NotifierError::delivery)
}

#[async_trait]
impl Notifier for TracingMailer {
    async fn send_approval_mail(&self, notice: &ApprovalNotice) -> NotifierResult<()> {
        let body = render_mail(notice)?;
        tracing::info!(
            target: MAIL_LOG_TARGET,
            kind = "approval",
            sender = self.sender().unwrap_or_default(),
            destination = %notice.destination,
            body = %body,
            "send approval mail"
        );
        Ok(())
    }

    async fn send_result_mail(&self, notice: &ResultNotice) -> NotifierResult<()> {
        let body = render_mail(notice)?;
        tracing::info!(
            target: MAIL_LOG_TARGET,
            kind = "result",
            sender = self.sender().unwrap_or_default(),
            task_id = %notice.task_id,
            recipients = notice.destinations.len(),
            body = %body,
            "send result mail"
        );
        Ok(())
    }
}
