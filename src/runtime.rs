//! Wiring of a `PostgreSQL`-backed approval workflow from settings.

use crate::{
    approval::{
        adapters::{
            TracingMailer,
            postgres::{PostgresTaskStorage, PostgresTelemetrySink},
        },
        domain::RoutingBase,
        services::{ApprovalWorkflowService, ReportingService},
    },
    config::{Settings, SettingsError},
};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use std::sync::Arc;

/// Workflow service backed by `PostgreSQL` storage and telemetry, with mail
/// written to the structured log.
pub type PostgresApprovalService =
    ApprovalWorkflowService<PostgresTaskStorage, TracingMailer, PostgresTelemetrySink, DefaultClock>;

/// Reporting service reading the `PostgreSQL` telemetry tables.
pub type PostgresReportingService = ReportingService<PostgresTelemetrySink>;

/// Assembled workflow and reporting services plus the default routing base
/// for links.
#[derive(Clone)]
pub struct ApprovalRuntime {
    service: PostgresApprovalService,
    reporting: PostgresReportingService,
    routing: RoutingBase,
}

impl ApprovalRuntime {
    /// Builds the service from settings.
    ///
    /// Connections are opened lazily, so this succeeds even when the
    /// database is not reachable yet.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Routing`] when the routing base is invalid.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let routing = settings.routing.routing_base()?;
        let manager = ConnectionManager::<PgConnection>::new(settings.database.url.as_str());
        let pool = Pool::builder()
            .max_size(settings.database.max_connections.max(1))
            .build_unchecked(manager);

        let mailer = settings
            .mail
            .sender
            .as_deref()
            .map_or_else(TracingMailer::new, |sender| {
                TracingMailer::new().with_sender(sender)
            });

        let telemetry = Arc::new(PostgresTelemetrySink::new(pool.clone()));
        let service = ApprovalWorkflowService::new(
            Arc::new(PostgresTaskStorage::new(pool)),
            Arc::new(mailer),
            Arc::clone(&telemetry),
            Arc::new(DefaultClock),
        );
        Ok(Self {
            service,
            reporting: ReportingService::new(telemetry),
            routing,
        })
    }

    /// Returns the workflow service.
    #[must_use]
    pub const fn service(&self) -> &PostgresApprovalService {
        &self.service
    }

    /// Returns the reporting service.
    #[must_use]
    pub const fn reporting(&self) -> &PostgresReportingService {
        &self.reporting
    }

    /// Returns the configured routing base.
    #[must_use]
    pub const fn routing(&self) -> &RoutingBase {
        &self.routing
    }
}
