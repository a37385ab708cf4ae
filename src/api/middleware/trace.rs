use super::request_id::REQUEST_ID_HEADER;
use axum::{
    body::Body,
    http::{Request, Response},
};
use std::time::Duration;
use tracing::{Span, info};

/// Span for one request. Runs after `request_id_middleware`, so the id is
/// always present on the request.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri().path(),
        request_id = %request_id,
    )
}

pub fn log_request(request: &Request<Body>, _span: &Span) {
    info!("📥 {} {}", request.method(), request.uri().path());
}

pub fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    info!(
        "📤 Finished in {:?} with status {}",
        latency,
        response.status()
    );
}
