//! Prometheus metrics for blog-service.
//!
//! Exposes page-cache collectors and an HTTP handler for the `/metrics`
//! endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Page cache events (hit/miss/error/bypass).
    pub static ref PAGE_CACHE_EVENTS: IntCounterVec = register_int_counter_vec!(
        "page_cache_events_total",
        "Page cache events segmented by outcome",
        &["event"]
    )
    .expect("failed to register page_cache_events_total");

    /// Follow actions segmented by outcome (created/duplicate/self/removed).
    pub static ref FOLLOW_ACTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "follow_actions_total",
        "Follow and unfollow actions segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register follow_actions_total");
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
