//! Prometheus metrics collection for wschatd.
//!
//! Metrics are exposed on the `/metrics` HTTP endpoint when
//! `server.metrics_port` is configured.
//!
//! - `wschat_command_total{command}` - Commands processed by verb
//! - `wschat_command_duration_seconds{command}` - Command latency histogram
//! - `wschat_command_errors_total{command, kind}` - Rejected commands
//! - `wschat_message_fanout` - Recipients per broadcast event (histogram)

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use std::sync::OnceLock;

use crate::error::ErrorKind;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters
// ========================================================================

/// Total WebSocket connections accepted.
pub static CONNECTIONS_ACCEPTED: OnceLock<IntCounter> = OnceLock::new();

/// Frames that could not be decoded.
pub static PROTOCOL_ERRORS: OnceLock<IntCounter> = OnceLock::new();

/// Commands processed by verb.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command errors by verb and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges
// ========================================================================

/// Currently connected sessions.
pub static CONNECTED_SESSIONS: OnceLock<IntGauge> = OnceLock::new();

/// Channels with at least one member.
pub static ACTIVE_CHANNELS: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Histograms
// ========================================================================

/// Command processing latency by verb.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// How many sessions received a broadcast event.
pub static MESSAGE_FANOUT: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at server startup before any metrics are recorded.
/// Recording before `init` is a no-op.
pub fn init() {
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

    register!(CONNECTIONS_ACCEPTED, IntCounter::new("wschat_connections_total", "WebSocket connections accepted"));
    register!(PROTOCOL_ERRORS, IntCounter::new("wschat_protocol_errors_total", "Frames that could not be decoded"));
    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("wschat_command_total", "Commands processed by verb"), &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("wschat_command_errors_total", "Command errors by verb and kind"), &["command", "kind"]));
    register!(CONNECTED_SESSIONS, IntGauge::new("wschat_connected_sessions", "Currently connected sessions"));
    register!(ACTIVE_CHANNELS, IntGauge::new("wschat_active_channels", "Channels with at least one member"));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("wschat_command_duration_seconds", "Command latency by verb")
            .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["command"]));
    register!(MESSAGE_FANOUT, Histogram::with_opts(
        HistogramOpts::new("wschat_message_fanout", "Recipients per broadcast event")
            .buckets(vec![1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0])));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
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

// ============================================================================
// Helper functions
// ============================================================================

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a rejected command.
#[inline]
pub fn record_command_error(command: &str, kind: ErrorKind) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, kind.as_str()]).inc();
    }
}

/// Record an undecodable frame.
#[inline]
pub fn record_protocol_error() {
    if let Some(c) = PROTOCOL_ERRORS.get() {
        c.inc();
    }
}

#[inline]
pub fn record_connection() {
    if let Some(c) = CONNECTIONS_ACCEPTED.get() {
        c.inc();
    }
}

/// Update the session and channel gauges.
#[inline]
pub fn set_population(sessions: usize, channels: usize) {
    if let Some(g) = CONNECTED_SESSIONS.get() {
        g.set(sessions as i64);
    }
    if let Some(g) = ACTIVE_CHANNELS.get() {
        g.set(channels as i64);
    }
}

/// Record event fan-out (how many sessions received a broadcast).
#[inline]
pub fn record_fanout(recipients: usize) {
    if let Some(h) = MESSAGE_FANOUT.get() {
        h.observe(recipients as f64);
    }
}
