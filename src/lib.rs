//! Signoff: multi-party task approval workflow.
//!
//! A task is created by an initiator, routed through an ordered chain of
//! approvers, and closes as either approved or declined. Each transition is
//! persisted, announced by mail, and recorded as telemetry.
//!
//! # Architecture
//!
//! Signoff follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, mail, etc.)
//!
//! # Modules
//!
//! - [`approval`]: Task aggregate, approval state machine, workflow service
//!   and telemetry reports
//! - [`config`]: Layered settings
//! - [`logging`]: `tracing` subscriber setup
//! - [`runtime`]: `PostgreSQL`-backed service wiring

pub mod approval;
pub mod config;
pub mod logging;
pub mod runtime;
