//! Prometheus metrics for yatube-api.
//!
//! HTTP request collectors recorded by `MetricsMiddleware`, resource counters
//! bumped by the services, and the `/metrics` handler.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Total HTTP requests by method, route pattern and status.
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests segmented by method, path and status",
        &["method", "path", "status"]
    )
    .expect("failed to register http_requests_total");

    /// HTTP request latency by method and route pattern.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration segmented by method and path",
        &["method", "path"]
    )
    .expect("failed to register http_request_duration_seconds");

    /// Successful writes by resource (post, comment, follow) and action.
    pub static ref RESOURCE_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "yatube_resource_writes_total",
        "Successful resource writes segmented by resource and action",
        &["resource", "action"]
    )
    .expect("failed to register yatube_resource_writes_total");
}

pub fn record_write(resource: &str, action: &str) {
    RESOURCE_WRITES_TOTAL
        .with_label_values(&[resource, action])
        .inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
