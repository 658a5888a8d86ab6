//! Prometheus scrape endpoint

use axum::{extract::State, http::header, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

pub const HTTP_REQUESTS: &str = "ama_http_requests_total";
pub const HTTP_DURATION: &str = "ama_http_request_duration_seconds";
pub const LIVE_SOCKETS: &str = "ama_live_sockets";
pub const LOGINS: &str = "ama_logins_total";

/// Register help texts once the recorder is installed
pub fn describe_metrics() {
    metrics::describe_counter!(HTTP_REQUESTS, "HTTP requests by method, route and status");
    metrics::describe_histogram!(
        HTTP_DURATION,
        metrics::Unit::Seconds,
        "HTTP request latency by method and route"
    );
    metrics::describe_gauge!(LIVE_SOCKETS, "Open live-view WebSockets by screen");
    metrics::describe_counter!(LOGINS, "Login attempts by outcome");
}

/// `GET /metrics`, unauthenticated
pub async fn prometheus_metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}
