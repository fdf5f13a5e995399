//! Reports derived from recorded telemetry.

use super::{EventType, Login, ResultEvent, TaskId, TimestampEvent};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{HashMap, HashSet};

/// Number of closed tasks by outcome.
///
/// A task reopened and closed again is counted once per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsReport {
    /// Outcomes recorded as approved.
    pub approved_tasks: u64,
    /// Outcomes recorded as declined.
    pub declined_tasks: u64,
}

impl ResultsReport {
    /// Tallies recorded outcomes.
    #[must_use]
    pub fn tally<'a>(results: impl IntoIterator<Item = &'a ResultEvent>) -> Self {
        results
            .into_iter()
            .fold(Self::default(), |mut report, event| {
                if event.approved {
                    report.approved_tasks += 1;
                } else {
                    report.declined_tasks += 1;
                }
                report
            })
    }

    /// Returns the number of recorded outcomes.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.approved_tasks + self.declined_tasks
    }
}

/// Time spent on one closed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeReport {
    /// Task the report describes.
    pub task_id: TaskId,
    /// Sum of every closed approver window, in milliseconds when serialised.
    #[serde(rename = "approveTimeMs", serialize_with = "serialize_millis")]
    pub approve_time: TimeDelta,
    /// Span from the first task start to the last task end, in milliseconds
    /// when serialised.
    #[serde(rename = "totalTimeMs", serialize_with = "serialize_millis")]
    pub total_time: TimeDelta,
}

fn serialize_millis<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(value.num_milliseconds())
}

impl TimeReport {
    /// Builds the report for `task_id` from its marks in recording order.
    ///
    /// An approver window counts once both its start and end marks are
    /// present; an end mark without an open window is ignored. Without a
    /// task start and end mark the total time is zero.
    #[must_use]
    pub fn from_marks<'a>(
        task_id: TaskId,
        marks: impl IntoIterator<Item = &'a TimestampEvent>,
    ) -> Self {
        let mut open: HashMap<&Login, DateTime<Utc>> = HashMap::new();
        let mut approve_time = TimeDelta::zero();
        let mut first_start: Option<DateTime<Utc>> = None;
        let mut last_end: Option<DateTime<Utc>> = None;

        for mark in marks.into_iter().filter(|mark| mark.task_id == task_id) {
            match (mark.event_type, mark.approver.as_ref()) {
                (EventType::Task, _) => {
                    if let Some(start) = mark.start {
                        first_start = Some(first_start.map_or(start, |seen| seen.min(start)));
                    }
                    if let Some(end) = mark.end {
                        last_end = Some(last_end.map_or(end, |seen| seen.max(end)));
                    }
                }
                (EventType::Approve, Some(approver)) => {
                    if let Some(start) = mark.start {
                        open.insert(approver, start);
                    }
                    if let Some(end) = mark.end {
                        if let Some(start) = open.remove(approver) {
                            approve_time += end - start;
                        }
                    }
                }
                (EventType::Approve, None) => {}
            }
        }

        let total_time = match (first_start, last_end) {
            (Some(start), Some(end)) if end >= start => end - start,
            _ => TimeDelta::zero(),
        };
        Self {
            task_id,
            approve_time,
            total_time,
        }
    }

    /// Builds one report per closed task, in the order the tasks first
    /// closed.
    ///
    /// Tasks without a recorded outcome are skipped.
    #[must_use]
    pub fn for_closed_tasks(results: &[ResultEvent], marks: &[TimestampEvent]) -> Vec<Self> {
        let mut seen = HashSet::new();
        results
            .iter()
            .map(|event| event.task_id)
            .filter(|task_id| seen.insert(*task_id))
            .map(|task_id| Self::from_marks(task_id, marks))
            .collect()
    }
}
