//! Dependency telemetry for storage calls.
//!
//! Every call through an [`InstrumentedCollection`] produces exactly one
//! [`DependencyTelemetry`] record, handed to a [`TelemetrySink`] and then
//! dropped. Two sinks ship with the crate:
//!
//! - [`TracingTelemetrySink`] - Emits each record as a `tracing` event on the
//!   `dependency` target (the default)
//! - [`MemoryTelemetrySink`] - Keeps records in memory for inspection

pub mod instrumented;

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{info, warn};

pub use instrumented::InstrumentedCollection;

/// Result code of a dependency call: `0` on success, the error text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultCode {
    /// Numeric code.
    Code(i64),
    /// Serialized failure.
    Error(String),
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCode::Code(code) => write!(f, "{}", code),
            ResultCode::Error(message) => write!(f, "{}", message),
        }
    }
}

/// One storage call as reported to telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyTelemetry {
    /// Database name.
    pub name: String,
    /// Collection name.
    pub target: String,
    /// Kind of dependency (the backend name, e.g. "memory").
    pub dependency_type_name: String,
    /// Structural description of the call; never contains document contents.
    pub data: String,
    /// Wall time spent in the call.
    pub duration: Duration,
    /// When the call completed.
    pub time: DateTime<Utc>,
    /// `0` or the serialized error.
    pub result_code: ResultCode,
    /// Whether the call succeeded.
    pub success: bool,
}

impl DependencyTelemetry {
    /// Duration in fractional milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Receives dependency telemetry.
pub trait TelemetrySink: Send + Sync {
    /// Records one dependency call.
    fn track_dependency(&self, telemetry: DependencyTelemetry);
}

/// Reports telemetry as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn track_dependency(&self, telemetry: DependencyTelemetry) {
        if telemetry.success {
            info!(
                target: "dependency",
                name = %telemetry.name,
                collection = %telemetry.target,
                dependency_type = %telemetry.dependency_type_name,
                data = %telemetry.data,
                duration_ms = telemetry.duration_ms(),
                result_code = %telemetry.result_code,
                success = telemetry.success,
                "dependency call"
            );
        } else {
            warn!(
                target: "dependency",
                name = %telemetry.name,
                collection = %telemetry.target,
                dependency_type = %telemetry.dependency_type_name,
                data = %telemetry.data,
                duration_ms = telemetry.duration_ms(),
                result_code = %telemetry.result_code,
                success = telemetry.success,
                "dependency call failed"
            );
        }
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemoryTelemetrySink {
    records: Mutex<Vec<DependencyTelemetry>>,
}

impl MemoryTelemetrySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the records so far.
    pub fn records(&self) -> Vec<DependencyTelemetry> {
        self.records.lock().clone()
    }

    /// Removes and returns the records so far.
    pub fn take(&self) -> Vec<DependencyTelemetry> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Number of records so far.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl TelemetrySink for MemoryTelemetrySink {
    fn track_dependency(&self, telemetry: DependencyTelemetry) {
        self.records.lock().push(telemetry);
    }
}
