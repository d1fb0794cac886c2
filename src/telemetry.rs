//! Telemetry utilities for handler timing.

use std::time::Instant;

/// Guard for timing a handler and recording its latency.
///
/// Records when dropped, so a handler that panics is still measured.
pub struct HandlerTimer {
    command: String,
    start: Instant,
}

impl HandlerTimer {
    /// Start timing a handler of `command`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for HandlerTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_handler(&self.command, duration);
    }
}
