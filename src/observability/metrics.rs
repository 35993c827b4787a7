//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route, method, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_upstream_failures_total` (counter): local failures by route, kind
//! - `gateway_loader_fallbacks_total` (counter): loaders that returned empty
//!
//! Without an installed recorder every call is a no-op, so tests and
//! metrics-disabled deployments pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed route.
pub fn record_request(route: &'static str, method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "route" => route,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record a local route failure.
pub fn record_upstream_failure(route: &'static str, kind: &'static str) {
    counter!("gateway_upstream_failures_total", "route" => route, "kind" => kind).increment(1);
}

/// Record a loader collapsing to its empty value.
pub fn record_loader_fallback(loader: &'static str, reason: &'static str) {
    counter!("gateway_loader_fallbacks_total", "loader" => loader, "reason" => reason).increment(1);
}
