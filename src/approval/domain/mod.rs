//! Domain model for task approval.
//!
//! The approval domain models the task aggregate, its approval chain and
//! status machine, the transient mail and telemetry records produced by each
//! transition, and the reports derived from that telemetry. Infrastructure
//! concerns stay outside this boundary.

mod chain;
mod error;
mod events;
mod ids;
mod notice;
mod reports;
mod task;

pub use chain::ApprovalChain;
pub use error::{ParseEventTypeError, ParseTaskStatusError, TaskDomainError};
pub use events::{EventType, ResultEvent, TimestampEvent};
pub use ids::{Login, TaskId};
pub use notice::{ApprovalLinks, ApprovalNotice, Notice, ResultMessage, ResultNotice, RoutingBase};
pub use reports::{ResultsReport, TimeReport};
pub use task::{ApprovalProgress, PersistedTaskData, Task, TaskStatus};
