//! Task approval workflow.
//!
//! A task is created by an initiator and routed through an ordered chain of
//! approvers. Each approver in turn either approves, passing the task on, or
//! declines, closing it. The last approval closes the task as approved. The
//! initiator may replace the chain at any time, which restarts approval, or
//! delete the task. Every transition is persisted, announced by mail, and
//! recorded as telemetry. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
