//! In-memory adapters for the approval workflow ports.

mod recording;
mod storage;

pub use recording::{RecordingNotifier, RecordingTelemetrySink, TelemetryRecord};
pub use storage::InMemoryTaskStorage;
