//! Run telemetry events, sinks, and log initialisation.
//!
//! Diagnostic logging goes through `tracing`. The binary installs a
//! `tracing-subscriber` formatter on stderr; library code never installs one.
//! Telemetry events are a separate, structured record of run results.

use std::io;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::pipeline::RunReport;

/// A structured telemetry event emitted by prbot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Records the outcome counts of a finished discovery run.
    RunCompleted {
        /// Candidates attempted, skips included.
        attempted: usize,
        /// Candidates forked and cloned.
        forked: usize,
        /// Candidates skipped because an equivalent pull request exists.
        skipped_duplicate: usize,
        /// Candidates skipped because the content was not found.
        skipped_no_content_match: usize,
        /// Candidates that failed.
        failed: usize,
    },
}

impl From<&RunReport> for TelemetryEvent {
    fn from(report: &RunReport) -> Self {
        Self::RunCompleted {
            attempted: report.attempted(),
            forked: report.forked(),
            skipped_duplicate: report.skipped_duplicate(),
            skipped_no_content_match: report.skipped_no_content_match(),
            failed: report.failed(),
        }
    }
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
///
/// This is intended for local debugging and is not transmitted anywhere.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Log filter used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "prbot=debug,info" } else { "info" }
}

/// Installs a stderr log formatter. `RUST_LOG` overrides the default filter.
///
/// Returns `false` when a global subscriber was already installed.
#[must_use]
pub fn init_tracing(verbose: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

/// Telemetry helpers shared with integration tests.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::Mutex;

    use super::{TelemetryEvent, TelemetrySink};

    /// Sink that keeps every recorded event in memory.
    #[derive(Debug, Default)]
    pub struct RecordingTelemetrySink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingTelemetrySink {
        /// Removes and returns the recorded events.
        #[must_use]
        pub fn take(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .map(|mut events| events.drain(..).collect())
                .unwrap_or_default()
        }
    }

    impl TelemetrySink for RecordingTelemetrySink {
        fn record(&self, event: TelemetryEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event);
            }
        }
    }
}
