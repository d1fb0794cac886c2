//! Prometheus metrics collection for chatcmd.
//!
//! - `chatcmd_messages_received_total` - messages that reached the pipeline
//! - `chatcmd_outcome_total{command,outcome}` - terminal outcomes per command
//! - `chatcmd_handler_duration_seconds{command}` - handler latency histogram
//!
//! Recording is a no-op until [`init`] has run, so library users that never
//! enable metrics pay nothing beyond a `OnceLock` check.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{Once, OnceLock};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Messages handed to the pipeline.
pub static MESSAGES_RECEIVED: OnceLock<IntCounter> = OnceLock::new();

/// Terminal outcomes by command and outcome label.
pub static OUTCOMES: OnceLock<IntCounterVec> = OnceLock::new();

/// Handler latency by command.
pub static HANDLER_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Safe to call more than once, from any thread; only the first call registers.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(register_all);
}

fn register_all() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                match $init {
                    Ok(m) => {
                        if let Err(e) = r.register(Box::new(m.clone())) {
                            tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                        }
                        let _ = $metric.set(m);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                    }
                }
            }
        };
    }

    register!(MESSAGES_RECEIVED, IntCounter::new("chatcmd_messages_received_total", "Messages handed to the dispatch pipeline"));
    register!(OUTCOMES, IntCounterVec::new(Opts::new("chatcmd_outcome_total", "Terminal dispatch outcomes"), &["command", "outcome"]));
    register!(HANDLER_LATENCY, HistogramVec::new(
        HistogramOpts::new("chatcmd_handler_duration_seconds", "Pattern handler latency by command")
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["command"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&registry().gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

#[inline]
pub fn record_received() {
    if let Some(c) = MESSAGES_RECEIVED.get() {
        c.inc();
    }
}

/// Record the terminal outcome of one message.
#[inline]
pub fn record_outcome(command: &str, outcome: &str) {
    if let Some(c) = OUTCOMES.get() {
        c.with_label_values(&[command, outcome]).inc();
    }
}

/// Record a handler execution with latency.
#[inline]
pub fn record_handler(command: &str, duration_secs: f64) {
    if let Some(h) = HANDLER_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}
