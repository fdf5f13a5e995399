//! `PostgreSQL` telemetry sink appending window marks and outcomes, and
//! reading them back as reports.

use super::{
    SignoffPgPool,
    models::{NewResultRow, NewTimestampRow, ResultRow, TimestampRow},
    schema::{task_results, task_timestamps},
};
use crate::approval::{
    domain::{
        EventType, Login, ResultEvent, ResultsReport, TaskId, TimeReport, TimestampEvent,
    },
    ports::{TelemetryError, TelemetryReports, TelemetryResult, TelemetrySink},
};
use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// Telemetry sink writing to the `task_timestamps` and `task_results` tables.
#[derive(Debug, Clone)]
pub struct PostgresTelemetrySink {
    pool: SignoffPgPool,
}

impl PostgresTelemetrySink {
    /// Creates a sink from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: SignoffPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TelemetryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TelemetryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TelemetryError::transport)?;
            f(&mut connection)
        })
        .await
        .map_err(TelemetryError::transport)?
    }
}

pub(super) fn timestamp_row(event: &TimestampEvent) -> NewTimestampRow {
    NewTimestampRow {
        task_id: event.task_id.into_inner(),
        approver: event.approver.as_ref().map(|login| login.as_str().to_owned()),
        event_type: event.event_type.as_str().to_owned(),
        start_time: event.start,
        end_time: event.end,
    }
}

pub(super) const fn result_row(event: &ResultEvent) -> NewResultRow {
    NewResultRow {
        task_id: event.task_id.into_inner(),
        approved: event.approved,
    }
}

pub(super) fn row_to_mark(row: TimestampRow) -> TelemetryResult<TimestampEvent> {
    let approver = row
        .approver
        .map(Login::new)
        .transpose()
        .map_err(TelemetryError::transport)?;
    let kind = EventType::try_from(row.event_type.as_str()).map_err(TelemetryError::transport)?;
    Ok(TimestampEvent {
        task_id: TaskId::from_uuid(row.task_id),
        approver,
        event_type: kind,
        start: row.start_time,
        end: row.end_time,
    })
}

pub(super) const fn row_to_result(row: ResultRow) -> ResultEvent {
    ResultEvent {
        task_id: TaskId::from_uuid(row.task_id),
        approved: row.approved,
    }
}

pub(super) fn counts_to_report(counts: &[(bool, i64)]) -> TelemetryResult<ResultsReport> {
    counts
        .iter()
        .try_fold(ResultsReport::default(), |mut report, &(approved, raw)| {
            let count = u64::try_from(raw).map_err(TelemetryError::transport)?;
            if approved {
                report.approved_tasks += count;
            } else {
                report.declined_tasks += count;
            }
            Ok(report)
        })
}

#[async_trait]
impl TelemetrySink for PostgresTelemetrySink {
    async fn send_result(&self, event: &ResultEvent) -> TelemetryResult<()> {
        let row = result_row(event);
        self.run_blocking(move |connection| {
            diesel::insert_into(task_results::table)
                .values(&row)
                .execute(connection)
                .map(drop)
                .map_err(TelemetryError::transport)
        })
        .await
    }

    async fn send_timestamp(&self, event: &TimestampEvent) -> TelemetryResult<()> {
        let row = timestamp_row(event);
        self.run_blocking(move |connection| {
            diesel::insert_into(task_timestamps::table)
                .values(&row)
                .execute(connection)
                .map(drop)
                .map_err(TelemetryError::transport)
        })
        .await
    }
}

#[async_trait]
impl TelemetryReports for PostgresTelemetrySink {
    async fn results_report(&self) -> TelemetryResult<ResultsReport> {
        self.run_blocking(move |connection| {
            let counts = task_results::table
                .group_by(task_results::approved)
                .select((task_results::approved, count_star()))
                .load::<(bool, i64)>(connection)
                .map_err(TelemetryError::transport)?;
            counts_to_report(&counts)
        })
        .await
    }

    async fn time_reports(&self) -> TelemetryResult<Vec<TimeReport>> {
        self.run_blocking(move |connection| {
            let results: Vec<ResultEvent> = task_results::table
                .order(task_results::id.asc())
                .select(ResultRow::as_select())
                .load::<ResultRow>(connection)
                .map_err(TelemetryError::transport)?
                .into_iter()
                .map(row_to_result)
                .collect();
            let closed: Vec<uuid::Uuid> = results
                .iter()
                .map(|event| event.task_id.into_inner())
                .collect();
            let marks = task_timestamps::table
                .filter(task_timestamps::task_id.eq_any(closed))
                .order(task_timestamps::id.asc())
                .select(TimestampRow::as_select())
                .load::<TimestampRow>(connection)
                .map_err(TelemetryError::transport)?
                .into_iter()
                .map(row_to_mark)
                .collect::<TelemetryResult<Vec<_>>>()?;
            Ok(TimeReport::for_closed_tasks(&results, &marks))
        })
        .await
    }
}
