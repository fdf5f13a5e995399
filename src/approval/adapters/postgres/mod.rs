//! `PostgreSQL` adapters for approval storage and telemetry.

mod models;
mod schema;
mod storage;
mod telemetry;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub use storage::PostgresTaskStorage;
pub use telemetry::PostgresTelemetrySink;

/// `PostgreSQL` connection pool type shared by the approval adapters.
pub type SignoffPgPool = Pool<ConnectionManager<PgConnection>>;
