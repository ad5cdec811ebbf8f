//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency, upstream failures)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, route
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_upstream_failures_total` (counter): failures by route, kind
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are bounded: route names, failure kinds and methods are fixed
//!   sets, with extension methods folded into `other`

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Label value for `method`.
fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "HEAD" => "HEAD",
        "OPTIONS" => "OPTIONS",
        "PATCH" => "PATCH",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => "other",
    }
}

/// Record a completed request.
pub fn record_request(method: &Method, status: u16, route: &'static str, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method_label(method),
        "status" => status.to_string(),
        "route" => route
    )
    .increment(1);

    metrics::histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed upstream call.
pub fn record_upstream_failure(route: &'static str, kind: &'static str) {
    metrics::counter!(
        "gateway_upstream_failures_total",
        "route" => route,
        "kind" => kind
    )
    .increment(1);
}
