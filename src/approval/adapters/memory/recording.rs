//! Recording notifier and telemetry adapters.
//!
//! Both adapters keep every accepted call in order and can be switched into
//! a failing mode, which makes them suitable for exercising partial-failure
//! paths of the workflow. The telemetry sink also answers report queries
//! from its journal.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::approval::{
    domain::{
        ApprovalNotice, Notice, ResultEvent, ResultNotice, ResultsReport, TimeReport,
        TimestampEvent,
    },
    ports::{
        Notifier, NotifierError, NotifierResult, TelemetryError, TelemetryReports,
        TelemetryResult, TelemetrySink,
    },
};

/// Telemetry call captured by [`RecordingTelemetrySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryRecord {
    /// A `send_timestamp` call.
    Timestamp(TimestampEvent),
    /// A `send_result` call.
    Result(ResultEvent),
}

#[derive(Debug)]
struct Journal<T> {
    entries: Vec<T>,
    failing: bool,
}

impl<T> Default for Journal<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            failing: false,
        }
    }
}

/// Notifier that records mail instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    journal: Arc<RwLock<Journal<Notice>>>,
}

impl RecordingNotifier {
    /// Creates an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (or succeed again).
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Delivery`] when lock acquisition fails.
    pub fn set_failing(&self, failing: bool) -> NotifierResult<()> {
        let mut journal = self.journal.write().map_err(notifier_lock_error)?;
        journal.failing = failing;
        Ok(())
    }

    /// Returns every accepted notice in send order.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Delivery`] when lock acquisition fails.
    pub fn sent(&self) -> NotifierResult<Vec<Notice>> {
        let journal = self.journal.read().map_err(notifier_lock_error)?;
        Ok(journal.entries.clone())
    }

    fn record(&self, notice: Notice) -> NotifierResult<()> {
        let mut journal = self.journal.write().map_err(notifier_lock_error)?;
        if journal.failing {
            return Err(NotifierError::Rejected("recording notifier is failing".to_owned()));
        }
        journal.entries.push(notice);
        Ok(())
    }
}

fn notifier_lock_error(err: impl std::fmt::Display) -> NotifierError {
    NotifierError::delivery(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_approval_mail(&self, notice: &ApprovalNotice) -> NotifierResult<()> {
        self.record(Notice::Approval(notice.clone()))
    }

    async fn send_result_mail(&self, notice: &ResultNotice) -> NotifierResult<()> {
        self.record(Notice::Result(notice.clone()))
    }
}

/// Telemetry sink that records events instead of exporting them.
#[derive(Debug, Clone, Default)]
pub struct RecordingTelemetrySink {
    journal: Arc<RwLock<Journal<TelemetryRecord>>>,
}

impl RecordingTelemetrySink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (or succeed again).
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Transport`] when lock acquisition fails.
    pub fn set_failing(&self, failing: bool) -> TelemetryResult<()> {
        let mut journal = self.journal.write().map_err(telemetry_lock_error)?;
        journal.failing = failing;
        Ok(())
    }

    /// Returns every accepted event in send order.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Transport`] when lock acquisition fails.
    pub fn records(&self) -> TelemetryResult<Vec<TelemetryRecord>> {
        let journal = self.journal.read().map_err(telemetry_lock_error)?;
        Ok(journal.entries.clone())
    }

    /// Returns the accepted result events.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Transport`] when lock acquisition fails.
    pub fn results(&self) -> TelemetryResult<Vec<ResultEvent>> {
        Ok(self
            .records()?
            .into_iter()
            .filter_map(|record| match record {
                TelemetryRecord::Result(event) => Some(event),
                TelemetryRecord::Timestamp(_) => None,
            })
            .collect())
    }

    fn record(&self, record: TelemetryRecord) -> TelemetryResult<()> {
        let mut journal = self.journal.write().map_err(telemetry_lock_error)?;
        if journal.failing {
            return Err(sink_failing());
        }
        journal.entries.push(record);
        Ok(())
    }

    fn split_journal(&self) -> TelemetryResult<(Vec<ResultEvent>, Vec<TimestampEvent>)> {
        let journal = self.journal.read().map_err(telemetry_lock_error)?;
        if journal.failing {
            return Err(sink_failing());
        }
        let mut results = Vec::new();
        let mut marks = Vec::new();
        for record in &journal.entries {
            match record {
                TelemetryRecord::Result(event) => results.push(*event),
                TelemetryRecord::Timestamp(event) => marks.push(event.clone()),
            }
        }
        Ok((results, marks))
    }
}

fn sink_failing() -> TelemetryError {
    TelemetryError::Rejected("recording telemetry sink is failing".to_owned())
}

fn telemetry_lock_error(err: impl std::fmt::Display) -> TelemetryError {
    TelemetryError::transport(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TelemetrySink for RecordingTelemetrySink {
    async fn send_result(&self, event: &ResultEvent) -> TelemetryResult<()> {
        self.record(TelemetryRecord::Result(*event))
    }

    async fn send_timestamp(&self, event: &TimestampEvent) -> TelemetryResult<()> {
        self.record(TelemetryRecord::Timestamp(event.clone()))
    }
}

#[async_trait]
impl TelemetryReports for RecordingTelemetrySink {
    async fn results_report(&self) -> TelemetryResult<ResultsReport> {
        let (results, _) = self.split_journal()?;
        Ok(ResultsReport::tally(&results))
    }

    async fn time_reports(&self) -> TelemetryResult<Vec<TimeReport>> {
        let (results, marks) = self.split_journal()?;
        Ok(TimeReport::for_closed_tasks(&results, &marks))
    }
}
