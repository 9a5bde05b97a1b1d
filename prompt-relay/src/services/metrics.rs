//! Prometheus metrics for prompt-relay.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;
use std::time::Duration;

static METRICS: OnceLock<RelayMetrics> = OnceLock::new();

struct RelayMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    upstream_duration: Histogram,
}

impl RelayMetrics {
    fn new() -> Self {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("relay_requests_total", "Total generate requests by outcome"),
            &["outcome"],
        )
        .expect("metric can be created");

        let upstream_duration = Histogram::with_opts(
            HistogramOpts::new(
                "relay_upstream_duration_seconds",
                "Gemini API call duration in seconds",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )
        .expect("metric can be created");

        registry
            .register(Box::new(requests_total.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(upstream_duration.clone()))
            .expect("collector can be registered");

        Self {
            registry,
            requests_total,
            upstream_duration,
        }
    }
}

fn metrics() -> &'static RelayMetrics {
    METRICS.get_or_init(RelayMetrics::new)
}

/// Register collectors. Safe to call more than once.
pub fn init_metrics() {
    metrics();
}

pub fn record_outcome(outcome: &str) {
    metrics()
        .requests_total
        .with_label_values(&[outcome])
        .inc();
}

pub fn observe_upstream(elapsed: Duration) {
    metrics()
        .upstream_duration
        .observe(elapsed.as_secs_f64());
}

/// Render all metrics in the Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = metrics().registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}
