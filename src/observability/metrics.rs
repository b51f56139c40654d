//! Metrics collection and exposition.
//!
//! # Metrics
//! - `harvest_api_requests_total` (counter): requests by endpoint, status
//! - `harvest_api_rate_limited_total` (counter): rejected requests by endpoint
//! - `harvest_api_redirects_total` (counter): scanner deflections by endpoint
//! - `harvest_api_engine_errors_total` (counter): engine failures by kind
//! - `harvest_api_engine_duration_seconds` (histogram): harvest latency

use std::net::SocketAddr;
use std::time::Duration;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(endpoint: &str, status: u16) {
    metrics::counter!(
        "harvest_api_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_rate_limited(endpoint: &str) {
    metrics::counter!("harvest_api_rate_limited_total", "endpoint" => endpoint.to_string())
        .increment(1);
}

pub fn record_redirect(endpoint: &str) {
    metrics::counter!("harvest_api_redirects_total", "endpoint" => endpoint.to_string())
        .increment(1);
}

pub fn record_engine_run(elapsed: Duration, error_kind: Option<&'static str>) {
    metrics::histogram!("harvest_api_engine_duration_seconds").record(elapsed.as_secs_f64());
    if let Some(kind) = error_kind {
        metrics::counter!("harvest_api_engine_errors_total", "kind" => kind).increment(1);
    }
}

/// Route-level middleware counting responses by matched route.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&endpoint, response.status().as_u16());
    response
}
