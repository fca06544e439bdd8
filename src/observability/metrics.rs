//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method and status
//! - `http_request_duration_seconds` (histogram): latency distribution
//! - `db_replica_acquire_failures_total` (counter): failed replica leases,
//!   by replica label
//! - `db_primary_fallback_total` (counter): reads that exhausted every
//!   replica and fell back to the primary
//! - `db_router_errors_total` (counter): acquisitions that failed outright,
//!   by kind

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to install is logged, not fatal: the service can run without
/// metrics, but never without a database.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(error = %error, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, started: Instant) {
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_replica_failure(replica: &str) {
    metrics::counter!(
        "db_replica_acquire_failures_total",
        "replica" => replica.to_string(),
    )
    .increment(1);
}

pub fn record_primary_fallback() {
    metrics::counter!("db_primary_fallback_total").increment(1);
}

pub fn record_router_error(kind: &'static str) {
    metrics::counter!("db_router_errors_total", "kind" => kind).increment(1);
}
